//! Day resolution: nominations, the vote, and the lynch.
//!
//! The nomination board is a small state machine:
//!
//! ```text
//! Idle → Nominated → Voting → Resolved
//! ```
//!
//! At most one nominee reaches a vote each day.

use std::collections::HashMap;
use std::fmt;

use mafia_protocol::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GameState, Succession};

/// Distinct nominators needed before a vote opens.
pub const DEFAULT_NOMINATION_THRESHOLD: usize = 2;

// ---------------------------------------------------------------------------
// NominationBoard
// ---------------------------------------------------------------------------

/// Where the day's nomination stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NominationPhase {
    Idle,
    Nominated(PlayerId),
    Voting(PlayerId),
    Resolved,
}

impl fmt::Display for NominationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Nominated(id) => write!(f, "Nominated({id})"),
            Self::Voting(id) => write!(f, "Voting({id})"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Why a nomination was not counted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NominationError {
    #[error("nominations are closed ({0})")]
    Closed(NominationPhase),

    #[error("{0} cannot nominate")]
    NotEligible(PlayerId),

    #[error("{0} cannot be nominated")]
    InvalidNominee(PlayerId),

    #[error("players cannot nominate themselves")]
    SelfNomination,
}

/// Result of a counted nomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominationProgress {
    /// Counted; `count` of `needed` nominators so far.
    Counted {
        nominee: PlayerId,
        count: usize,
        needed: usize,
    },
    /// The threshold was reached; the board moved to `Nominated`.
    Opened(PlayerId),
}

/// Tracks the day's nominations.
#[derive(Debug, Clone)]
pub struct NominationBoard {
    threshold: usize,
    /// nominator → nominee; a new nomination replaces the old one.
    latest: HashMap<PlayerId, PlayerId>,
    phase: NominationPhase,
}

impl NominationBoard {
    /// A board that opens a vote once `threshold` distinct players (at
    /// least one) name the same nominee.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            latest: HashMap::new(),
            phase: NominationPhase::Idle,
        }
    }

    pub fn phase(&self) -> NominationPhase {
        self.phase
    }

    /// Records `nominator`'s nomination of `nominee`.
    ///
    /// # Errors
    /// Rejects nominations while not idle, from dead players, of dead or
    /// unknown players, and of oneself.
    pub fn nominate(
        &mut self,
        state: &GameState,
        nominator: PlayerId,
        nominee: PlayerId,
    ) -> Result<NominationProgress, NominationError> {
        if self.phase != NominationPhase::Idle {
            return Err(NominationError::Closed(self.phase));
        }
        if !state.is_alive(nominator) {
            return Err(NominationError::NotEligible(nominator));
        }
        if nominator == nominee {
            return Err(NominationError::SelfNomination);
        }
        if !state.is_alive(nominee) {
            return Err(NominationError::InvalidNominee(nominee));
        }

        self.latest.insert(nominator, nominee);
        let count = self
            .latest
            .iter()
            .filter(|&(who, whom)| *whom == nominee && state.is_alive(*who))
            .count();

        if count >= self.threshold {
            self.phase = NominationPhase::Nominated(nominee);
            Ok(NominationProgress::Opened(nominee))
        } else {
            Ok(NominationProgress::Counted {
                nominee,
                count,
                needed: self.threshold,
            })
        }
    }

    /// Moves `Nominated` to `Voting` and returns the nominee.
    pub fn open_vote(&mut self) -> Option<PlayerId> {
        match self.phase {
            NominationPhase::Nominated(nominee) => {
                self.phase = NominationPhase::Voting(nominee);
                Some(nominee)
            }
            _ => None,
        }
    }

    /// Closes the board for the rest of the day.
    pub fn resolve(&mut self) {
        self.phase = NominationPhase::Resolved;
    }
}

// ---------------------------------------------------------------------------
// VoteTally
// ---------------------------------------------------------------------------

/// Counted votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub nominee: PlayerId,
    pub yes: usize,
    pub no: usize,
}

impl Ballot {
    /// Strict majority of counted votes.
    pub fn passes(&self) -> bool {
        self.yes > self.no
    }
}

/// Votes on one nominee, latest per voter.
#[derive(Debug, Clone)]
pub struct VoteTally {
    nominee: PlayerId,
    votes: HashMap<PlayerId, bool>,
}

impl VoteTally {
    pub fn new(nominee: PlayerId) -> Self {
        Self {
            nominee,
            votes: HashMap::new(),
        }
    }

    pub fn nominee(&self) -> PlayerId {
        self.nominee
    }

    /// Records a vote, replacing the voter's earlier one.
    pub fn record(&mut self, voter: PlayerId, approve: bool) {
        self.votes.insert(voter, approve);
    }

    /// Counts the votes of players alive in `state`.
    pub fn tally(&self, state: &GameState) -> Ballot {
        let (yes, no) = self
            .votes
            .iter()
            .filter(|&(voter, _)| state.is_alive(*voter))
            .fold((0, 0), |(yes, no), (_, &approve)| {
                if approve { (yes + 1, no) } else { (yes, no + 1) }
            });
        Ballot {
            nominee: self.nominee,
            yes,
            no,
        }
    }
}

// ---------------------------------------------------------------------------
// Lynch
// ---------------------------------------------------------------------------

/// Result of [`apply_lynch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lynch {
    pub player: PlayerId,
    pub role: String,
    pub succession: Succession,
}

/// Lynches `target`: marks them dead and lynched and keeps a godfather.
///
/// Returns `None` if `target` is not alive.
pub fn apply_lynch<R: Rng + ?Sized>(state: &mut GameState, target: PlayerId, rng: &mut R) -> Option<Lynch> {
    let player = state.player_mut(target).filter(|p| p.alive)?;
    player.alive = false;
    player.lynched = true;

    let role = state.role(target).name.clone();
    let succession = state.ensure_godfather(rng);
    tracing::info!(player = %target, %role, ?succession, "player lynched");
    Some(Lynch {
        player: target,
        role,
        succession,
    })
}
