//! Concurrent action collection.
//!
//! A phase opens one solicitation task per [`ActionRequest`]. Each task
//! walks its request's steps against the [`ChatSurface`] and sends the
//! finished [`Action`] back over a channel, then starts over so the player
//! can change their mind. The [`Collection`] keeps the latest action per
//! actor.
//!
//! ```text
//!   open() ──spawn──► task(actor 1) ─┐
//!          ──spawn──► task(actor 2) ─┼─ mpsc ─► Collection ─► Submissions
//!          ──spawn──► task(actor n) ─┘
//! ```
//!
//! Tasks never touch game state. When the deadline passes, outstanding
//! tasks are aborted; a player who had not finished simply did nothing.

use std::sync::Arc;

use mafia_protocol::{Audience, Notice, PlayerId, Reply};
use mafia_rules::{Action, ActionRequest, Step, Submissions};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

use crate::ChatSurface;

/// Spawns solicitation tasks against a shared surface.
pub struct ActionCoordinator<S> {
    surface: Arc<S>,
}

impl<S> Clone for ActionCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<S: ChatSurface> ActionCoordinator<S> {
    pub fn new(surface: Arc<S>) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Starts soliciting every request until `deadline`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(&self, deadline: Instant, requests: Vec<ActionRequest>) -> Collection {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();

        debug!(requests = requests.len(), "collection opened");
        for request in requests {
            let surface = Arc::clone(&self.surface);
            let tx = tx.clone();
            tasks.spawn(solicit(surface, request, deadline, tx));
        }

        Collection {
            tasks,
            rx,
            deadline,
            latest: Submissions::new(),
        }
    }
}

/// Actions arriving from one phase's solicitation tasks.
///
/// Dropping a collection aborts its tasks.
pub struct Collection {
    tasks: JoinSet<()>,
    rx: mpsc::UnboundedReceiver<Action>,
    deadline: Instant,
    latest: Submissions,
}

impl Collection {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Waits for the next action.
    ///
    /// Returns `None` once the deadline passed or every task is done.
    pub async fn next(&mut self) -> Option<Action> {
        let action = tokio::select! {
            action = self.rx.recv() => action?,
            _ = time::sleep_until(self.deadline) => return None,
        };
        self.latest.insert(action.clone());
        Some(action)
    }

    /// Waits until the deadline, aborts whatever is still running, and
    /// returns the latest action of each actor.
    pub async fn finish(mut self) -> Submissions {
        while self.next().await.is_some() {}
        time::sleep_until(self.deadline).await;

        self.tasks.abort_all();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "solicitation task panicked");
                }
            }
        }
        // Anything sent right before the abort still counts.
        while let Ok(action) = self.rx.try_recv() {
            self.latest.insert(action);
        }

        debug!(actions = self.latest.len(), "collection finished");
        self.latest
    }

    /// Aborts every task without waiting for the deadline.
    pub fn abort(&mut self) {
        self.tasks.abort_all();
    }
}

/// One player's solicitation loop.
async fn solicit<S: ChatSurface>(
    surface: Arc<S>,
    request: ActionRequest,
    deadline: Instant,
    tx: mpsc::UnboundedSender<Action>,
) {
    let actor = request.actor;
    loop {
        let Some((picks, approve)) = walk(surface.as_ref(), &request, deadline).await else {
            trace!(%actor, kind = ?request.kind, "solicitation ended");
            return;
        };

        let action = request.complete(picks, approve, deadline.into_std());
        debug!(%actor, kind = ?action.kind, targets = ?action.targets, approve, "action submitted");
        if tx.send(action).is_err() {
            return;
        }
        surface.notify(Audience::Player(actor), Notice::ActionRecorded).await;

        if Instant::now() >= deadline {
            return;
        }
    }
}

/// Asks every step once. Returns `None` if the player ran out of time.
async fn walk<S: ChatSurface>(
    surface: &S,
    request: &ActionRequest,
    deadline: Instant,
) -> Option<(Vec<PlayerId>, bool)> {
    let actor = request.actor;
    let mut picks: Vec<PlayerId> = Vec::new();
    let mut approve = true;

    for step in &request.steps {
        match step {
            Step::Pick { prompt, options } => {
                if options.is_empty() {
                    return None;
                }
                loop {
                    let reply = surface
                        .collect_choice(actor, prompt.clone(), options.clone(), deadline)
                        .await;
                    match reply {
                        Reply::Timeout => return None,
                        Reply::Answered(choice) if options.contains(&choice) && !picks.contains(&choice) => {
                            trace!(%actor, %choice, "pick accepted");
                            picks.push(choice);
                            break;
                        }
                        Reply::Answered(choice) => {
                            warn!(%actor, %choice, prompt = ?prompt.kind(), "invalid target");
                            surface
                                .notify(Audience::Player(actor), Notice::InvalidChoice { choice })
                                .await;
                            if Instant::now() >= deadline {
                                return None;
                            }
                        }
                    }
                }
            }
            Step::Confirm { prompt } => {
                match surface.collect_reaction(actor, prompt.clone(), deadline).await {
                    Reply::Timeout => return None,
                    Reply::Answered(yes) => approve = yes,
                }
            }
        }
    }
    Some((picks, approve))
}
