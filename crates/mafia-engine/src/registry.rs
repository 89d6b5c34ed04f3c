//! Game registry: starts, tracks, and stops games by group.
//!
//! At most one game runs per [`GameId`]. The registry also remembers the
//! last setup token used in each group so a group can replay its setup.

use std::collections::HashMap;
use std::sync::Arc;

use mafia_coordinator::ChatSurface;
use mafia_protocol::{GameId, PlayerId};
use mafia_rules::RoleCatalog;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{EngineError, GameConfig, GameEngine, GameReport, RegistryError};

/// A running game's stop signal and task.
struct GameHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<GameReport, EngineError>>,
}

/// Tracks every running game on one surface.
///
/// This is the entry point for the chat adapter's start, stop, and redo
/// commands.
pub struct GameRegistry<S> {
    surface: Arc<S>,
    catalog: Arc<RoleCatalog>,
    /// Timing used for games started from a token.
    defaults: GameConfig,
    games: HashMap<GameId, GameHandle>,
    /// Last setup token per group.
    last_setup: HashMap<GameId, String>,
}

impl<S: ChatSurface> GameRegistry<S> {
    pub fn new(surface: Arc<S>, catalog: Arc<RoleCatalog>) -> Self {
        Self {
            surface,
            catalog,
            defaults: GameConfig::default(),
            games: HashMap::new(),
            last_setup: HashMap::new(),
        }
    }

    /// Sets the timing used by [`start_from_token`](Self::start_from_token)
    /// and [`redo`](Self::redo). The setup part of `defaults` is ignored.
    pub fn with_defaults(mut self, defaults: GameConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn catalog(&self) -> &Arc<RoleCatalog> {
        &self.catalog
    }

    /// Starts a game in group `id`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - [`RegistryError::AlreadyRunning`] if the group has a live game.
    /// - [`RegistryError::Config`] if the setup or member count is invalid.
    pub fn start(&mut self, id: GameId, config: GameConfig, members: Vec<PlayerId>) -> Result<(), RegistryError> {
        self.start_with_rng(id, config, members, StdRng::from_os_rng())
    }

    /// Like [`start`](Self::start) with a caller-supplied RNG, for
    /// reproducible games.
    pub fn start_with_rng(
        &mut self,
        id: GameId,
        config: GameConfig,
        members: Vec<PlayerId>,
        rng: StdRng,
    ) -> Result<(), RegistryError> {
        self.reap();
        if self.games.contains_key(&id) {
            return Err(RegistryError::AlreadyRunning(id));
        }
        config.setup.validate(&self.catalog)?;
        config.setup.check_players(members.len(), &self.catalog)?;

        let token = config.to_token(&self.catalog);
        info!(game_id = %id, players = members.len(), %token, "starting game");
        self.last_setup.insert(id, token);

        let (stop_tx, stop_rx) = oneshot::channel();
        let engine = GameEngine::new(
            id,
            config,
            Arc::clone(&self.catalog),
            Arc::clone(&self.surface),
            rng,
        );
        let task = tokio::spawn(engine.run(members, stop_rx));
        self.games.insert(id, GameHandle { stop: stop_tx, task });
        Ok(())
    }

    /// Starts a game from a setup token with the registry's default timing.
    ///
    /// # Errors
    /// Same as [`start`](Self::start), plus token decoding errors.
    pub fn start_from_token(&mut self, id: GameId, token: &str, members: Vec<PlayerId>) -> Result<(), RegistryError> {
        let setup = GameConfig::from_token(token, &self.catalog)?.setup;
        let config = GameConfig {
            setup,
            ..self.defaults.clone()
        };
        self.start(id, config, members)
    }

    /// Replays the last setup used in group `id`.
    ///
    /// # Errors
    /// [`RegistryError::NoPreviousSetup`] if the group never started a
    /// game, otherwise as [`start`](Self::start).
    pub fn redo(&mut self, id: GameId, members: Vec<PlayerId>) -> Result<(), RegistryError> {
        let token = self
            .last_setup
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NoPreviousSetup(id))?;
        self.start_from_token(id, &token, members)
    }

    /// The token of the last setup started in group `id`.
    pub fn last_token(&self, id: GameId) -> Option<&str> {
        self.last_setup.get(&id).map(String::as_str)
    }

    /// Returns `true` if a game in group `id` has not finished yet.
    pub fn is_running(&self, id: GameId) -> bool {
        self.games.get(&id).is_some_and(|g| !g.task.is_finished())
    }

    /// Groups with a game still in progress.
    ///
    /// A finished game stays waitable until [`wait`](Self::wait) or the
    /// next [`start`](Self::start) collects it, but is not listed here.
    pub fn game_ids(&self) -> Vec<GameId> {
        self.running().map(|(&id, _)| id).collect()
    }

    pub fn game_count(&self) -> usize {
        self.running().count()
    }

    fn running(&self) -> impl Iterator<Item = (&GameId, &GameHandle)> {
        self.games.iter().filter(|(_, game)| !game.task.is_finished())
    }

    /// Waits for the game in group `id` to finish and returns its report.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no game is tracked for the group, or
    /// whatever the game ended with.
    pub async fn wait(&mut self, id: GameId) -> Result<GameReport, RegistryError> {
        let handle = self.games.remove(&id).ok_or(RegistryError::NotFound(id))?;
        join(id, handle.task).await
    }

    /// Stops the game in group `id` and waits for it to wind down.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no game is tracked for the group, or
    /// [`RegistryError::Crashed`] if the game task panicked.
    pub async fn stop(&mut self, id: GameId) -> Result<(), RegistryError> {
        let handle = self.games.remove(&id).ok_or(RegistryError::NotFound(id))?;
        // The game may have finished on its own already.
        let _ = handle.stop.send(());

        match join(id, handle.task).await {
            Ok(_) | Err(RegistryError::Engine(EngineError::Cancelled)) => {
                info!(game_id = %id, "game stopped");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Stops every game, finished ones included.
    pub async fn shutdown(&mut self) {
        let ids: Vec<GameId> = self.games.keys().copied().collect();
        for id in ids {
            if let Err(e) = self.stop(id).await {
                error!(game_id = %id, error = %e, "game did not stop cleanly");
            }
        }
    }

    /// Forgets games that finished without anyone waiting on them.
    fn reap(&mut self) {
        self.games.retain(|id, game| {
            let finished = game.task.is_finished();
            if finished {
                debug!(game_id = %id, "finished game reaped");
            }
            !finished
        });
    }
}

async fn join(
    id: GameId,
    task: JoinHandle<Result<GameReport, EngineError>>,
) -> Result<GameReport, RegistryError> {
    match task.await {
        Ok(result) => Ok(result?),
        Err(e) => {
            error!(game_id = %id, error = %e, "game task failed");
            Err(RegistryError::Crashed(id))
        }
    }
}
