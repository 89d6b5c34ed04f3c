//! Identity and addressing types.
//!
//! Everything here is small, `Copy`, and serializable. Higher layers use
//! these to say WHO an action is about and WHO should hear a notice.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque handle for a player, issued by the chat platform adapter.
///
/// The engine never interprets the number; it only compares and hashes it.
/// `#[serde(transparent)]` keeps the JSON form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifies one running game. The adapter uses the group (server,
/// channel, chat) the game is hosted in, so at most one game runs per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Audience: who should hear a notice?
// ---------------------------------------------------------------------------

/// Specifies who receives a notice.
///
/// The adapter maps each variant onto whatever surface it has (a shared
/// channel, a private channel, a direct message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    /// Every player still alive.
    AllLiving,

    /// The mafia's private channel.
    Mafia,

    /// The channel dead players can read.
    Dead,

    /// One player's private channel.
    Player(PlayerId),

    /// The public game channel (spectators included).
    Public,
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The half of a cycle the game is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Day,
    Night,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Night => write!(f, "Night"),
        }
    }
}
