//! The game engine: one task per game, driving the day/night cycle.
//!
//! ```text
//! Preparation ─► Day 1 ─► Night 1 ─► Day 2 ─► ... ─► Resolution
//!                  │          │
//!                  └── win? ──┴──► Resolution
//! ```
//!
//! The engine owns the [`GameState`] for the whole game. Solicitation
//! tasks only produce actions; every mutation happens here, between
//! phases, through the rules crate.

use std::collections::HashSet;
use std::sync::Arc;

use mafia_coordinator::{ActionCoordinator, ChatSurface, PhaseTimer};
use mafia_protocol::{Audience, GameId, Notice, Phase, PlayerId, Reveal};
use mafia_rules::{
    GameState, RoleCatalog, Succession, Trigger, WinRule, abilities, assign_roles, night, win,
};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::day::run_day;
use crate::{EngineError, GameConfig, TaskSupervisor};

/// How a finished game turned out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub game: GameId,
    pub trigger: Trigger,
    /// Human-readable trigger, e.g. "The Citizens win".
    pub reason: String,
    pub winners: Vec<PlayerId>,
    /// The cycle the game ended in.
    pub cycles: u32,
    /// Every player's role and fate, in seat order.
    pub reveal: Vec<Reveal>,
    /// Setup token to replay the same setup.
    pub token: String,
}

/// Runs one game against a [`ChatSurface`].
pub struct GameEngine<S> {
    id: GameId,
    config: GameConfig,
    catalog: Arc<RoleCatalog>,
    coordinator: ActionCoordinator<S>,
    tasks: TaskSupervisor,
    rng: StdRng,
    side_wins: HashSet<PlayerId>,
}

impl<S: ChatSurface> GameEngine<S> {
    pub fn new(
        id: GameId,
        config: GameConfig,
        catalog: Arc<RoleCatalog>,
        surface: Arc<S>,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            config: config.validated(),
            catalog,
            coordinator: ActionCoordinator::new(surface),
            tasks: TaskSupervisor::new(id),
            rng,
            side_wins: HashSet::new(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    fn surface(&self) -> &S {
        self.coordinator.surface().as_ref()
    }

    /// Plays a full game with `members`, in join order.
    ///
    /// Sending on `stop` ends the game early; dropping the sender does
    /// not. Either way every background task is aborted and every
    /// provisioned channel torn down before this returns.
    ///
    /// # Errors
    /// - [`EngineError::Config`] if the setup does not fit the members.
    /// - [`EngineError::Cancelled`] if the game was stopped.
    pub async fn run(
        mut self,
        members: Vec<PlayerId>,
        stop: oneshot::Receiver<()>,
    ) -> Result<GameReport, EngineError> {
        self.config.setup.validate(&self.catalog)?;
        let mut state = assign_roles(
            &members,
            &self.config.setup,
            Arc::clone(&self.catalog),
            &mut self.rng,
        )?;
        info!(
            game_id = %self.id,
            players = members.len(),
            mafia = state.total_mafia(),
            "game started"
        );

        let result = tokio::select! {
            report = self.play(&mut state) => Ok(report),
            Ok(()) = stop => Err(EngineError::Cancelled),
        };

        self.tasks.shutdown().await;
        for player in &state.players {
            self.surface().teardown_channel(player.id).await;
        }

        match &result {
            Ok(report) => info!(
                game_id = %self.id,
                trigger = %report.trigger,
                winners = report.winners.len(),
                "game finished"
            ),
            Err(e) => info!(game_id = %self.id, cycle = state.cycle, reason = %e, "game ended early"),
        }
        result
    }

    async fn play(&mut self, state: &mut GameState) -> GameReport {
        self.introduce(state).await;

        loop {
            // -- Day --
            state.phase = Phase::Day;
            self.morning(state).await;
            let living = state.living_ids();
            state.ledger.reset(living);

            let day = run_day(&self.coordinator, state, &self.config).await;
            let succession = match day.ballot {
                Some(ballot) if ballot.passes() => self.lynch(state, ballot.nominee).await,
                Some(ballot) => {
                    self.surface()
                        .notify(
                            Audience::Public,
                            Notice::VoteFailed {
                                nominee: ballot.nominee,
                                yes: ballot.yes,
                                no: ballot.no,
                            },
                        )
                        .await;
                    Succession::Unchanged
                }
                None => Succession::Unchanged,
            };
            if let Some(trigger) = self.verdict(state, Phase::Day, succession).await {
                return self.conclude(state, trigger, Phase::Day).await;
            }

            // -- Night --
            state.phase = Phase::Night;
            let jailed = night::prepare_night(state, day.jails.iter());
            self.dispatch(jailed).await;
            info!(game_id = %self.id, cycle = state.cycle, "night falls");
            self.surface()
                .notify(Audience::AllLiving, Notice::NightFalls { cycle: state.cycle })
                .await;

            let timer = PhaseTimer::start(Phase::Night, self.config.night_length, self.config.closing_window);
            let collection = self
                .coordinator
                .open(timer.deadline(), abilities::night_requests(state));
            let (submissions, ()) = tokio::join!(
                collection.finish(),
                timer.run(self.surface(), Audience::AllLiving),
            );

            let outcome = night::resolve(state, submissions, &mut self.rng);
            info!(
                game_id = %self.id,
                cycle = state.cycle,
                deaths = outcome.deaths.len(),
                "night resolved"
            );
            self.dispatch(outcome.notices).await;
            if let Some(trigger) = self.verdict(state, Phase::Night, outcome.succession).await {
                return self.conclude(state, trigger, Phase::Night).await;
            }
            self.schedule_reports(outcome.reports);

            if state.cycle >= self.config.max_cycles {
                return self.conclude(state, Trigger::Stalemate, Phase::Night).await;
            }
            state.cycle += 1;
        }
    }

    /// Opens every player's channel and tells them their role.
    async fn introduce(&self, state: &GameState) {
        for player in &state.players {
            let role = state.role(player.id);
            self.surface()
                .provision_player_channel(player.id, &role.name)
                .await;
            self.surface()
                .notify(
                    Audience::Player(player.id),
                    Notice::RoleAssigned {
                        role: role.name.clone(),
                        summary: role.summary.clone(),
                        target: player.target,
                    },
                )
                .await;
        }
        if let Some(godfather) = state.godfather {
            self.surface()
                .notify(Audience::Mafia, Notice::GodfatherAssigned { player: godfather })
                .await;
        }
    }

    async fn morning(&self, state: &GameState) {
        let alive_roles = state
            .alive_role_counts()
            .into_iter()
            .map(|(kind, n)| (self.catalog.get(kind).name.clone(), n))
            .collect();
        info!(game_id = %self.id, cycle = state.cycle, alive = state.total_alive(), "day begins");
        self.surface()
            .notify(
                Audience::Public,
                Notice::DayBegins {
                    cycle: state.cycle,
                    alive_roles,
                    nominations_open: state.cycle > 1,
                },
            )
            .await;
    }

    async fn lynch(&mut self, state: &mut GameState, nominee: PlayerId) -> Succession {
        let Some(lynch) = mafia_rules::day::apply_lynch(state, nominee, &mut self.rng) else {
            return Succession::Unchanged;
        };
        self.surface()
            .notify(
                Audience::Public,
                Notice::Lynched {
                    player: lynch.player,
                    role: lynch.role,
                },
            )
            .await;
        if let Succession::Promoted(player) = lynch.succession {
            self.surface()
                .notify(Audience::Mafia, Notice::GodfatherAssigned { player })
                .await;
        }
        lynch.succession
    }

    /// Announces new side wins and returns the trigger that ends the game
    /// after `phase`, if any.
    async fn verdict(&mut self, state: &GameState, phase: Phase, succession: Succession) -> Option<Trigger> {
        for player in win::side_winners(state, phase) {
            // Survival only counts once the game is over.
            if state.role(player).win == WinRule::Survive || !self.side_wins.insert(player) {
                continue;
            }
            let role = state.role(player).name.clone();
            info!(game_id = %self.id, %player, %role, "side win");
            self.surface()
                .notify(Audience::Public, Notice::SideWin { player, role })
                .await;
        }

        if succession == Succession::Extinct {
            return Some(Trigger::MafiaExtinct);
        }
        win::check(state, phase)
    }

    async fn conclude(&self, state: &GameState, trigger: Trigger, phase: Phase) -> GameReport {
        let winners = win::winners(state, phase);
        let reveal: Vec<Reveal> = state
            .players
            .iter()
            .map(|p| Reveal {
                player: p.id,
                role: state.role(p.id).name.clone(),
                alive: p.alive,
                winner: winners.contains(&p.id),
            })
            .collect();
        let reason = trigger.describe(&self.catalog);

        info!(game_id = %self.id, cycle = state.cycle, %trigger, %reason, "game over");
        self.surface()
            .notify(
                Audience::Public,
                Notice::GameOver {
                    winners: winners.clone(),
                    reason: reason.clone(),
                    reveal: reveal.clone(),
                },
            )
            .await;

        GameReport {
            game: self.id,
            trigger,
            reason,
            winners,
            cycles: state.cycle,
            reveal,
            token: self.config.to_token(&self.catalog),
        }
    }

    async fn dispatch(&self, notices: Vec<(Audience, Notice)>) {
        for (audience, notice) in notices {
            self.surface().notify(audience, notice).await;
        }
    }

    /// Delivers investigation and watch results in the background.
    fn schedule_reports(&mut self, reports: Vec<(PlayerId, Notice)>) {
        if reports.is_empty() {
            return;
        }
        debug!(game_id = %self.id, reports = reports.len(), "scheduling night reports");
        let surface = Arc::clone(self.coordinator.surface());
        self.tasks.spawn("night reports", async move {
            for (player, notice) in reports {
                surface.notify(Audience::Player(player), notice).await;
            }
        });
    }
}
