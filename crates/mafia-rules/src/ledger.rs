//! Per-cycle record of who did what to whom.
//!
//! Every transient interaction (protection, attacks, cleaning, disguises,
//! visits, jail) lands here instead of on the player. The engine resets
//! the entries of living players at the start of each day; entries of
//! dead players are left alone so reports about them stay answerable.

use std::collections::HashMap;

use mafia_protocol::PlayerId;

/// Everything that happened to one player this cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub protected_by: Option<PlayerId>,
    pub killed_by: Option<PlayerId>,
    pub cleaned_by: Option<PlayerId>,
    /// Whom this player appears to be, for alignment checks.
    pub disguised_as: Option<PlayerId>,
    /// In visit order.
    pub visited_by: Vec<PlayerId>,
    pub role_blocked: bool,
    pub jailed_by: Option<PlayerId>,
}

impl LedgerEntry {
    pub fn is_jailed(&self) -> bool {
        self.jailed_by.is_some()
    }
}

/// The ledger for one game.
#[derive(Debug, Clone, Default)]
pub struct ActionLedger {
    entries: HashMap<PlayerId, LedgerEntry>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `player`, if anything was recorded.
    pub fn get(&self, player: PlayerId) -> Option<&LedgerEntry> {
        self.entries.get(&player)
    }

    /// Returns the entry for `player`, creating an empty one if needed.
    pub fn entry(&mut self, player: PlayerId) -> &mut LedgerEntry {
        self.entries.entry(player).or_default()
    }

    /// Records that `visitor` visited `target`.
    pub fn visit(&mut self, target: PlayerId, visitor: PlayerId) {
        self.entry(target).visited_by.push(visitor);
    }

    pub fn visitors(&self, target: PlayerId) -> &[PlayerId] {
        self.get(target).map(|e| e.visited_by.as_slice()).unwrap_or(&[])
    }

    pub fn protector(&self, player: PlayerId) -> Option<PlayerId> {
        self.get(player).and_then(|e| e.protected_by)
    }

    pub fn killer(&self, player: PlayerId) -> Option<PlayerId> {
        self.get(player).and_then(|e| e.killed_by)
    }

    pub fn cleaner(&self, player: PlayerId) -> Option<PlayerId> {
        self.get(player).and_then(|e| e.cleaned_by)
    }

    pub fn disguise(&self, player: PlayerId) -> Option<PlayerId> {
        self.get(player).and_then(|e| e.disguised_as)
    }

    pub fn jailor_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.get(player).and_then(|e| e.jailed_by)
    }

    pub fn is_role_blocked(&self, player: PlayerId) -> bool {
        self.get(player).is_some_and(|e| e.role_blocked)
    }

    /// Clears the entries of `living` players for a new cycle.
    pub fn reset<I>(&mut self, living: I)
    where
        I: IntoIterator<Item = PlayerId>,
    {
        for player in living {
            self.entries.remove(&player);
        }
    }
}
