//! Night resolution.
//!
//! All night actions are collected first and resolved here in one pass,
//! ordered by stage and then by seat:
//!
//! | stage | kinds                    |
//! |-------|--------------------------|
//! | 0     | jail (applied by [`prepare_night`]) |
//! | 1     | protect, vest            |
//! | 2     | investigate, watch       |
//! | 3     | disguise                 |
//! | 4     | clean                    |
//! | 5     | kill, douse              |
//!
//! Investigation and watch results are computed once every stage ran, so
//! they see every visit and disguise of the night.

use mafia_protocol::{Audience, Notice, PlayerId};
use rand::Rng;

use crate::{Action, ActionKind, Alignment, GameState, NightAbility, Submissions, Succession, Tier};

/// A player who died tonight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub victim: PlayerId,
    pub killer: PlayerId,
    pub cleaned_by: Option<PlayerId>,
}

/// Everything a night produced.
#[derive(Debug, Clone)]
pub struct NightOutcome {
    /// In seat order.
    pub deaths: Vec<Death>,
    /// Deliver now.
    pub notices: Vec<(Audience, Notice)>,
    /// Deliver after the night (investigation and watch results).
    pub reports: Vec<(PlayerId, Notice)>,
    pub succession: Succession,
}

impl NightOutcome {
    /// Returns `true` if nobody died where everyone could see it.
    pub fn is_quiet(&self) -> bool {
        self.deaths.iter().all(|d| d.cleaned_by.is_some())
    }
}

#[derive(Debug, Clone, Copy)]
struct Attack {
    attacker: PlayerId,
    target: PlayerId,
    tier: Tier,
    /// The godfather's kill, reported to the whole mafia.
    mafia: bool,
}

fn stage(kind: ActionKind) -> Option<u8> {
    match kind {
        ActionKind::Protect | ActionKind::Vest => Some(1),
        ActionKind::Investigate | ActionKind::Watch => Some(2),
        ActionKind::Disguise => Some(3),
        ActionKind::Clean => Some(4),
        ActionKind::Kill | ActionKind::Douse => Some(5),
        ActionKind::Jail | ActionKind::Nominate | ActionKind::Vote | ActionKind::None => None,
    }
}

/// Applies the day's jails before night actions are requested.
///
/// A jailed player is role-blocked, protected and visited by the jailor.
/// Jails from a jailor who died during the day, or on a dead target, are
/// dropped.
pub fn prepare_night<'a, I>(state: &mut GameState, jails: I) -> Vec<(Audience, Notice)>
where
    I: IntoIterator<Item = &'a Action>,
{
    let mut notices = Vec::new();
    let mut jails: Vec<&Action> = jails
        .into_iter()
        .filter(|a| a.kind == ActionKind::Jail)
        .collect();
    jails.sort_by_key(|a| state.seat(a.actor));

    for jail in jails {
        let jailor = jail.actor;
        let Some(prisoner) = jail.target() else { continue };
        let usable = state.player(jailor).is_some_and(|p| p.alive && p.has_uses());
        if !usable || !state.is_alive(prisoner) || state.ledger.get(prisoner).is_some_and(|e| e.is_jailed()) {
            tracing::debug!(%jailor, %prisoner, "jail dropped");
            continue;
        }

        if let Some(player) = state.player_mut(jailor) {
            player.spend_use();
        }
        let entry = state.ledger.entry(prisoner);
        entry.jailed_by = Some(jailor);
        entry.role_blocked = true;
        state.ledger.visit(prisoner, jailor);
        state.protect(prisoner, jailor);

        tracing::info!(%jailor, %prisoner, "player jailed");
        notices.push((Audience::Player(jailor), Notice::Jailed { prisoner }));
        notices.push((Audience::Player(prisoner), Notice::Jailed { prisoner }));
        if state.godfather == Some(prisoner) {
            notices.push((Audience::Mafia, Notice::GodfatherBlocked));
        }
    }
    notices
}

/// Resolves one night's submissions against `state`.
pub fn resolve<R: Rng + ?Sized>(state: &mut GameState, submissions: Submissions, rng: &mut R) -> NightOutcome {
    let godfather = state.godfather;

    let mut actions: Vec<(u8, Action)> = submissions
        .into_iter()
        .filter(|a| state.is_alive(a.actor) && !state.ledger.is_role_blocked(a.actor))
        .filter(|a| a.targets.iter().all(|&t| state.is_alive(t)))
        .filter_map(|a| match stage(a.kind) {
            Some(stage) => Some((stage, a)),
            None => {
                tracing::debug!(actor = %a.actor, kind = ?a.kind, "not a night action");
                None
            }
        })
        .collect();
    actions.sort_by_key(|(stage, a)| (*stage, state.seat(a.actor)));

    let mut attacks: Vec<Attack> = Vec::new();
    let mut investigations: Vec<(PlayerId, PlayerId, PlayerId)> = Vec::new();
    let mut watches: Vec<(PlayerId, PlayerId)> = Vec::new();

    for (_, action) in &actions {
        let actor = action.actor;
        match (action.kind, action.targets.as_slice()) {
            (ActionKind::Protect, &[target, ..]) => {
                state.protect(target, actor);
                state.ledger.visit(target, actor);
            }
            (ActionKind::Vest, _) if action.approve => {
                let Some(player) = state.player_mut(actor) else { continue };
                if !player.has_uses() {
                    continue;
                }
                player.spend_use();
                state.protect(actor, actor);
            }
            (ActionKind::Investigate, &[first, second, ..]) if first != second => {
                investigations.push((actor, first, second));
            }
            (ActionKind::Watch, &[target, ..]) => watches.push((actor, target)),
            (ActionKind::Disguise, &[member, cover, ..]) => {
                let jailed = |id| state.ledger.get(id).is_some_and(|e| e.is_jailed());
                if jailed(member) || jailed(cover) {
                    tracing::debug!(%actor, %member, %cover, "disguise ignored, jailed");
                    continue;
                }
                state.ledger.entry(member).disguised_as = Some(cover);
                state.ledger.visit(member, actor);
            }
            (ActionKind::Clean, &[target, ..]) => {
                let Some(player) = state.player_mut(actor) else { continue };
                if !player.has_uses() {
                    continue;
                }
                player.spend_use();
                state.ledger.entry(target).cleaned_by = Some(actor);
                state.ledger.visit(target, actor);
            }
            (ActionKind::Kill, &[target, ..]) => {
                if let Some(attack) = kill(state, action, target, godfather) {
                    attacks.push(attack);
                }
            }
            (ActionKind::Douse, &[target, ..]) if target == actor => {
                let tier = state.role(actor).attack;
                let doused: Vec<PlayerId> = state
                    .living()
                    .filter(|p| p.doused && p.id != actor)
                    .map(|p| p.id)
                    .collect();
                tracing::info!(arsonist = %actor, count = doused.len(), "ignite");
                for target in doused {
                    state.ledger.visit(target, actor);
                    attacks.push(Attack {
                        attacker: actor,
                        target,
                        tier,
                        mafia: false,
                    });
                }
            }
            (ActionKind::Douse, &[target, ..]) => {
                if let Some(player) = state.player_mut(target) {
                    player.doused = true;
                }
                state.ledger.visit(target, actor);
            }
            (kind, targets) => {
                tracing::debug!(%actor, ?kind, ?targets, "action skipped");
            }
        }
    }

    let mut notices = Vec::new();

    // Decide who dies before anyone is marked dead, so attack order within
    // the stage never matters.
    let mut dying: Vec<Attack> = Vec::new();
    let mut repelled: Vec<Attack> = Vec::new();
    for attack in attacks {
        if dying.iter().any(|d| d.target == attack.target) {
            continue;
        }
        if attack.tier.pierces(state.defense(attack.target)) {
            state.ledger.entry(attack.target).killed_by = Some(attack.attacker);
            dying.push(attack);
        } else {
            repelled.push(attack);
        }
    }
    repelled.retain(|r| !dying.iter().any(|d| d.target == r.target));

    let mut saved: Vec<PlayerId> = Vec::new();
    for attack in &repelled {
        if !saved.contains(&attack.target) {
            saved.push(attack.target);
            let protector_role = match state.ledger.protector(attack.target) {
                Some(protector) => state.role(protector).name.clone(),
                None => state.role(attack.target).name.clone(),
            };
            notices.push((Audience::Player(attack.target), Notice::Saved { protector_role }));
        }
        if attack.attacker != attack.target {
            let audience = if attack.mafia {
                Audience::Mafia
            } else {
                Audience::Player(attack.attacker)
            };
            notices.push((audience, Notice::AttackRepelled { target: attack.target }));
        }
    }

    dying.sort_by_key(|a| state.seat(a.target));
    let mut deaths = Vec::with_capacity(dying.len());
    for attack in dying {
        let victim = attack.target;
        state.kill(victim);
        let role = state.role(victim).name.clone();
        let cleaned_by = state.ledger.cleaner(victim);
        tracing::info!(%victim, killer = %attack.attacker, cleaned = cleaned_by.is_some(), "night death");

        notices.push((Audience::Player(victim), Notice::YouDied));
        match cleaned_by {
            Some(cleaner) => {
                notices.push((Audience::Player(cleaner), Notice::CleanedReport { victim, role }));
            }
            None => {
                let killer_role = state.role(attack.attacker).name.clone();
                notices.push((
                    Audience::Public,
                    Notice::Killed {
                        victim,
                        role,
                        killer_role,
                    },
                ));
            }
        }
        if attack.attacker != victim {
            let audience = if attack.mafia {
                Audience::Mafia
            } else {
                Audience::Player(attack.attacker)
            };
            notices.push((audience, Notice::KillConfirmed { victim }));
        }

        deaths.push(Death {
            victim,
            killer: attack.attacker,
            cleaned_by,
        });
    }

    let succession = state.ensure_godfather(rng);
    if let Succession::Promoted(player) = succession {
        notices.push((Audience::Mafia, Notice::GodfatherAssigned { player }));
    }

    let mut outcome = NightOutcome {
        deaths,
        notices,
        reports: Vec::new(),
        succession,
    };
    if outcome.is_quiet() {
        outcome.notices.push((Audience::Public, Notice::QuietNight));
    }

    for (pi, first, second) in investigations {
        let same = matches!(
            (state.apparent_alignment(first), state.apparent_alignment(second)),
            (Alignment::Citizen, Alignment::Citizen) | (Alignment::Mafia, Alignment::Mafia)
        );
        outcome.reports.push((pi, Notice::AlignmentReport { first, second, same }));
    }
    for (lookout, target) in watches {
        let visitors = state.ledger.visitors(target).to_vec();
        outcome.reports.push((lookout, Notice::VisitorReport { target, visitors }));
    }

    outcome
}

/// Turns a kill action into an attack, or `None` if it does nothing.
fn kill(state: &mut GameState, action: &Action, target: PlayerId, godfather: Option<PlayerId>) -> Option<Attack> {
    let actor = action.actor;
    let (tier, ability) = {
        let role = state.role(actor);
        (role.attack, role.night)
    };

    if godfather == Some(actor) {
        state.ledger.visit(target, actor);
        return Some(Attack {
            attacker: actor,
            target,
            tier,
            mafia: true,
        });
    }

    match ability {
        NightAbility::Shoot => {
            state.ledger.visit(target, actor);
            let victim = if state.apparent_alignment(target) == Alignment::Citizen {
                tracing::debug!(sheriff = %actor, %target, "shot backfires");
                actor
            } else {
                target
            };
            Some(Attack {
                attacker: actor,
                target: victim,
                tier,
                mafia: false,
            })
        }
        NightAbility::Execute if action.approve && state.ledger.jailor_of(target) == Some(actor) => Some(Attack {
            attacker: actor,
            target,
            tier,
            mafia: false,
        }),
        _ => None,
    }
}
