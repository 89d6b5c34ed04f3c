//! Turns role abilities into the requests a phase solicits.
//!
//! Options are computed from committed state before the phase opens, so
//! every solicitation in a phase sees the same roster.

use mafia_protocol::{PlayerId, Prompt};

use crate::{ActionKind, ActionRequest, DayAbility, GameState, NightAbility, Step};

/// Day abilities for living players (the jailor's jail).
pub fn day_requests(state: &GameState) -> Vec<ActionRequest> {
    state
        .living()
        .filter_map(|player| match state.role(player.id).day {
            DayAbility::Jail if player.has_uses() => Some(ActionRequest::pick(
                player.id,
                ActionKind::Jail,
                Prompt::Jail {
                    jails_left: player.uses_left.unwrap_or(0),
                },
                others(state, player.id),
            )),
            DayAbility::Jail | DayAbility::None => None,
        })
        .collect()
}

/// Nomination requests for every living player.
pub fn nomination_requests(state: &GameState) -> Vec<ActionRequest> {
    state
        .living()
        .map(|player| {
            ActionRequest::pick(
                player.id,
                ActionKind::Nominate,
                Prompt::Nominate,
                others(state, player.id),
            )
        })
        .collect()
}

/// Vote requests on `nominee` for every living player.
pub fn vote_requests(state: &GameState, nominee: PlayerId) -> Vec<ActionRequest> {
    state
        .living()
        .map(|player| {
            ActionRequest::confirm(
                player.id,
                ActionKind::Vote,
                Prompt::Vote { nominee },
                vec![nominee],
            )
        })
        .collect()
}

/// Night requests: every living, unblocked player's own ability, with the
/// godfather's ability replaced by the mafia kill.
pub fn night_requests(state: &GameState) -> Vec<ActionRequest> {
    state
        .living()
        .filter(|player| !state.ledger.is_role_blocked(player.id))
        .filter_map(|player| {
            if state.godfather == Some(player.id) {
                return Some(mafia_kill(state, player.id));
            }
            night_request(state, player.id)
        })
        .collect()
}

fn mafia_kill(state: &GameState, godfather: PlayerId) -> ActionRequest {
    let options = state
        .living()
        .filter(|p| !state.is_mafia(p.id))
        .map(|p| p.id)
        .collect();
    ActionRequest::pick(godfather, ActionKind::Kill, Prompt::MafiaKill, options)
}

fn night_request(state: &GameState, actor: PlayerId) -> Option<ActionRequest> {
    let player = state.player(actor)?;
    let uses_left = player.uses_left.unwrap_or(0);

    let request = match state.role(actor).night {
        NightAbility::None => return None,
        // Jailing spends the use, so the execution that follows is free.
        NightAbility::Execute => {
            let prisoner = state
                .living()
                .find(|p| state.ledger.jailor_of(p.id) == Some(actor))?
                .id;
            ActionRequest::confirm(
                actor,
                ActionKind::Kill,
                Prompt::Execute { prisoner },
                vec![prisoner],
            )
        }
        _ if !player.has_uses() => return None,
        NightAbility::Protect => {
            ActionRequest::pick(actor, ActionKind::Protect, Prompt::Protect, others(state, actor))
        }
        NightAbility::Shoot => {
            ActionRequest::pick(actor, ActionKind::Kill, Prompt::Shoot, others(state, actor))
        }
        NightAbility::Watch => {
            ActionRequest::pick(actor, ActionKind::Watch, Prompt::Watch, others(state, actor))
        }
        NightAbility::Clean => ActionRequest::pick(
            actor,
            ActionKind::Clean,
            Prompt::Clean {
                cleans_left: uses_left,
            },
            others(state, actor),
        ),
        NightAbility::Investigate => ActionRequest {
            actor,
            kind: ActionKind::Investigate,
            targets: Vec::new(),
            steps: vec![
                Step::Pick {
                    prompt: Prompt::Investigate { step: 1 },
                    options: others(state, actor),
                },
                Step::Pick {
                    prompt: Prompt::Investigate { step: 2 },
                    options: others(state, actor),
                },
            ],
        },
        NightAbility::Disguise => {
            let members: Vec<PlayerId> = state
                .living()
                .filter(|p| state.is_mafia(p.id))
                .map(|p| p.id)
                .collect();
            let covers: Vec<PlayerId> = state
                .living()
                .filter(|p| !state.is_mafia(p.id))
                .map(|p| p.id)
                .collect();
            if covers.is_empty() {
                return None;
            }
            ActionRequest {
                actor,
                kind: ActionKind::Disguise,
                targets: Vec::new(),
                steps: vec![
                    Step::Pick {
                        prompt: Prompt::DisguiseMember,
                        options: members,
                    },
                    Step::Pick {
                        prompt: Prompt::DisguiseAs,
                        options: covers,
                    },
                ],
            }
        }
        NightAbility::Douse => {
            let doused: Vec<PlayerId> = state.living().filter(|p| p.doused).map(|p| p.id).collect();
            let mut options: Vec<PlayerId> = state
                .living()
                .filter(|p| p.id != actor && !p.doused)
                .map(|p| p.id)
                .collect();
            options.push(actor);
            ActionRequest::pick(actor, ActionKind::Douse, Prompt::Douse { doused }, options)
        }
        NightAbility::Vest => ActionRequest::confirm(
            actor,
            ActionKind::Vest,
            Prompt::Vest {
                vests_left: uses_left,
            },
            vec![actor],
        ),
    };
    Some(request)
}

/// Living players other than `actor`, in seat order.
fn others(state: &GameState, actor: PlayerId) -> Vec<PlayerId> {
    state
        .living()
        .filter(|p| p.id != actor)
        .map(|p| p.id)
        .collect()
}
