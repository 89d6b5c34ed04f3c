//! The day phase as it plays out in time.
//!
//! Three things run side by side until the day's deadline:
//!
//! ```text
//!   jail requests ──────────────────────────────────────────► jails
//!   nominations ──(threshold reached)──► vote requests ─────► ballot
//!   phase timer ──────────(closing notice)──────────────────► deadline
//! ```
//!
//! Nothing here mutates the game. The engine applies the lynch and hands
//! the jails to the night once the day is over.

use mafia_coordinator::{ActionCoordinator, ChatSurface, PhaseTimer};
use mafia_protocol::{Audience, Notice, Phase};
use mafia_rules::{
    ActionKind, Ballot, GameState, NominationBoard, NominationProgress, Submissions, VoteTally,
    abilities,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::GameConfig;

/// What the day collected.
#[derive(Debug)]
pub(crate) struct DayVotes {
    /// Jails to apply when night falls.
    pub jails: Submissions,
    /// Present if someone was put on trial.
    pub ballot: Option<Ballot>,
}

/// Runs the day of `state.cycle` for its full length.
pub(crate) async fn run_day<S: ChatSurface>(
    coordinator: &ActionCoordinator<S>,
    state: &GameState,
    config: &GameConfig,
) -> DayVotes {
    let cycle = state.cycle;
    let timer = PhaseTimer::start(Phase::Day, config.day_length_for(cycle), config.closing_window);
    let deadline = timer.deadline();
    let jails = coordinator.open(deadline, abilities::day_requests(state));

    let on_trial = async {
        if cycle <= 1 {
            return None;
        }
        trial(coordinator, state, config.nomination_threshold, deadline).await
    };
    let (jails, ballot, ()) = tokio::join!(
        jails.finish(),
        on_trial,
        timer.run(coordinator.surface().as_ref(), Audience::Public),
    );

    DayVotes { jails, ballot }
}

/// Streams nominations until someone is nominated, then collects votes
/// on them until the deadline.
async fn trial<S: ChatSurface>(
    coordinator: &ActionCoordinator<S>,
    state: &GameState,
    threshold: usize,
    deadline: Instant,
) -> Option<Ballot> {
    let surface = coordinator.surface();
    let mut board = NominationBoard::new(threshold);
    let mut nominations = coordinator.open(deadline, abilities::nomination_requests(state));

    loop {
        let action = nominations.next().await?;
        let Some(nominee) = action.target() else { continue };
        match board.nominate(state, action.actor, nominee) {
            Ok(NominationProgress::Counted {
                nominee,
                count,
                needed,
            }) => {
                debug!(nominator = %action.actor, %nominee, count, needed, "nomination counted");
                surface
                    .notify(
                        Audience::Public,
                        Notice::NominationProgress {
                            nominee,
                            nominations: count,
                            needed,
                        },
                    )
                    .await;
            }
            Ok(NominationProgress::Opened(_)) => break,
            Err(e) => debug!(nominator = %action.actor, error = %e, "nomination rejected"),
        }
    }
    nominations.abort();

    let nominee = board.open_vote()?;
    info!(%nominee, cycle = state.cycle, "vote opened");
    surface
        .notify(Audience::Public, Notice::VoteOpened { nominee })
        .await;

    let votes = coordinator
        .open(deadline, abilities::vote_requests(state, nominee))
        .finish()
        .await;
    let mut tally = VoteTally::new(nominee);
    for vote in votes.of_kind(ActionKind::Vote) {
        tally.record(vote.actor, vote.approve);
    }
    board.resolve();

    let ballot = tally.tally(state);
    info!(%nominee, yes = ballot.yes, no = ballot.no, "vote closed");
    Some(ballot)
}
