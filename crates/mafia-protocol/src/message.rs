//! Prompts the engine asks and notices it sends.
//!
//! These are structured, not formatted: the adapter decides how a
//! [`Notice::Killed`] looks on screen. Role names travel as plain strings
//! because the protocol layer does not know the role catalog.

use serde::{Deserialize, Serialize};

use crate::{Phase, PlayerId};

// ---------------------------------------------------------------------------
// Reply: the result of asking a player something
// ---------------------------------------------------------------------------

/// The outcome of a `collect_choice` / `collect_reaction` call.
///
/// `Timeout` is not an error: it means the player chose not to act before
/// the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply<T> {
    Answered(T),
    Timeout,
}

impl<T> Reply<T> {
    /// Returns the answer, or `None` on timeout.
    pub fn answered(self) -> Option<T> {
        match self {
            Self::Answered(value) => Some(value),
            Self::Timeout => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// What a player is being asked for.
///
/// Choice prompts come with a list of valid targets; confirmation prompts
/// (`Vest`, `Execute`, `Vote`) expect a yes/no reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Prompt {
    /// Doctor: choose someone to save tonight.
    Protect,
    /// Sheriff: choose someone to shoot tonight.
    Shoot,
    /// PI: pick the first (`step = 1`) or second (`step = 2`) suspect.
    Investigate { step: u8 },
    /// Lookout: choose whose visitors to watch.
    Watch,
    /// Janitor: choose whose body to clean up.
    Clean { cleans_left: u8 },
    /// Disguiser: choose the mafia member to disguise.
    DisguiseMember,
    /// Disguiser: choose whom the member will look like.
    DisguiseAs,
    /// Arsonist: douse a target, or choose yourself to ignite.
    Douse { doused: Vec<PlayerId> },
    /// Godfather: choose the mafia's victim.
    MafiaKill,
    /// Jailor (day): choose someone to jail tonight.
    Jail { jails_left: u8 },
    /// Jailor (night): execute the prisoner?
    Execute { prisoner: PlayerId },
    /// Survivor: put on a vest tonight?
    Vest { vests_left: u8 },
    /// Anyone (day): nominate a player for lynching.
    Nominate,
    /// Anyone (day): vote on the open nomination.
    Vote { nominee: PlayerId },
}

/// The prompt variant without its data, for matching and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptKind {
    Protect,
    Shoot,
    Investigate,
    Watch,
    Clean,
    DisguiseMember,
    DisguiseAs,
    Douse,
    MafiaKill,
    Jail,
    Execute,
    Vest,
    Nominate,
    Vote,
}

impl Prompt {
    /// Returns the data-less kind of this prompt.
    pub fn kind(&self) -> PromptKind {
        match self {
            Self::Protect => PromptKind::Protect,
            Self::Shoot => PromptKind::Shoot,
            Self::Investigate { .. } => PromptKind::Investigate,
            Self::Watch => PromptKind::Watch,
            Self::Clean { .. } => PromptKind::Clean,
            Self::DisguiseMember => PromptKind::DisguiseMember,
            Self::DisguiseAs => PromptKind::DisguiseAs,
            Self::Douse { .. } => PromptKind::Douse,
            Self::MafiaKill => PromptKind::MafiaKill,
            Self::Jail { .. } => PromptKind::Jail,
            Self::Execute { .. } => PromptKind::Execute,
            Self::Vest { .. } => PromptKind::Vest,
            Self::Nominate => PromptKind::Nominate,
            Self::Vote { .. } => PromptKind::Vote,
        }
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// One line of the final role reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub player: PlayerId,
    pub role: String,
    pub alive: bool,
    pub winner: bool,
}

/// Everything the engine tells players.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON such as
/// `{ "type": "Lynched", "player": 4, "role": "Mafia" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    // -- Preparation --
    /// Private: your role for this game.
    RoleAssigned {
        role: String,
        summary: String,
        target: Option<PlayerId>,
    },
    /// Mafia: who holds the kill this night onward.
    GodfatherAssigned { player: PlayerId },

    // -- Phase boundaries --
    /// Public: a new day, with the roles still alive.
    DayBegins {
        cycle: u32,
        alive_roles: Vec<(String, usize)>,
        nominations_open: bool,
    },
    /// All living: night has fallen.
    NightFalls { cycle: u32 },
    /// The phase ends soon.
    ClosingSoon { phase: Phase, seconds_left: u64 },

    // -- Solicitation feedback --
    /// Private: your choice was recorded.
    ActionRecorded,
    /// Private: that choice is not allowed.
    InvalidChoice { choice: PlayerId },

    // -- Day --
    /// Public: a nomination was made but more are needed.
    NominationProgress {
        nominee: PlayerId,
        nominations: usize,
        needed: usize,
    },
    /// Public: the nominee is on trial; react to vote.
    VoteOpened { nominee: PlayerId },
    /// Public: the town lynched someone.
    Lynched { player: PlayerId, role: String },
    /// Public: the vote did not pass.
    VoteFailed { nominee: PlayerId, yes: usize, no: usize },
    /// Private (jailor and prisoner): who is in jail tonight.
    Jailed { prisoner: PlayerId },

    // -- Night --
    /// Mafia: the godfather is jailed and cannot kill.
    GodfatherBlocked,
    /// Public: someone was killed overnight.
    Killed {
        victim: PlayerId,
        role: String,
        killer_role: String,
    },
    /// Public: nobody died (visibly) last night.
    QuietNight,
    /// Private / mafia: your target died.
    KillConfirmed { victim: PlayerId },
    /// Private / mafia: your target survived the attack.
    AttackRepelled { target: PlayerId },
    /// Private: you were attacked but someone saved you.
    Saved { protector_role: String },
    /// Private: you died.
    YouDied,
    /// Private (janitor): the role of the body you cleaned.
    CleanedReport { victim: PlayerId, role: String },
    /// Private (PI): whether two players share an alignment.
    AlignmentReport {
        first: PlayerId,
        second: PlayerId,
        same: bool,
    },
    /// Private (lookout): who visited the watched player.
    VisitorReport {
        target: PlayerId,
        visitors: Vec<PlayerId>,
    },

    // -- Resolution --
    /// Public: a role that wins alongside others has met its goal.
    SideWin { player: PlayerId, role: String },
    /// Public: the game is over.
    GameOver {
        winners: Vec<PlayerId>,
        reason: String,
        reveal: Vec<Reveal>,
    },
}
