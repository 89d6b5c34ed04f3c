//! Supervised background tasks of one game.
//!
//! Work that outlives the step that started it (post-night reports) runs
//! here instead of as a detached `tokio::spawn`. Failures are logged with
//! the game and task label, and stopping a game aborts everything it
//! still has in flight.

use std::future::Future;

use mafia_protocol::GameId;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// The background tasks of one game.
#[derive(Debug)]
pub struct TaskSupervisor {
    game: GameId,
    tasks: JoinSet<&'static str>,
}

impl TaskSupervisor {
    pub fn new(game: GameId) -> Self {
        Self {
            game,
            tasks: JoinSet::new(),
        }
    }

    /// Runs `task` in the background under `label`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(&mut self, label: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        debug!(game_id = %self.game, task = label, "task spawned");
        self.tasks.spawn(async move {
            task.await;
            label
        });
    }

    /// Tasks not yet collected.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collects tasks that already finished, without waiting.
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            self.record(result);
        }
    }

    /// Waits for every task to finish on its own.
    pub async fn drain(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            self.record(result);
        }
    }

    /// Aborts every task and waits for them to wind down.
    pub async fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            debug!(game_id = %self.game, tasks = self.tasks.len(), "aborting tasks");
        }
        self.tasks.abort_all();
        self.drain().await;
    }

    fn record(&self, result: Result<&'static str, JoinError>) {
        match result {
            Ok(label) => debug!(game_id = %self.game, task = label, "task finished"),
            Err(e) if e.is_cancelled() => {}
            Err(e) => error!(game_id = %self.game, error = %e, "task failed"),
        }
    }
}
