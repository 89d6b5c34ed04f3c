//! The roster and everything the resolvers read and write.

use std::sync::Arc;

use mafia_protocol::{Phase, PlayerId};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::{ActionLedger, Alignment, RoleCatalog, RoleDef, RoleKind, Tier};

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Position in the roster; fixes resolution order between equal stages.
    pub seat: usize,
    pub role: RoleKind,
    pub alive: bool,
    pub lynched: bool,
    /// Persists across cycles.
    pub doused: bool,
    /// Remaining limited uses (jails, cleans, vests).
    pub uses_left: Option<u8>,
    /// The executioner's target.
    pub target: Option<PlayerId>,
}

impl Player {
    pub fn new(id: PlayerId, seat: usize, role: &RoleDef) -> Self {
        Self {
            id,
            seat,
            role: role.kind,
            alive: true,
            lynched: false,
            doused: false,
            uses_left: role.uses,
            target: None,
        }
    }

    /// Returns `true` if the role has no counter or uses remain.
    pub fn has_uses(&self) -> bool {
        self.uses_left != Some(0)
    }

    /// Spends one limited use. No-op for roles without a counter.
    pub fn spend_use(&mut self) {
        if let Some(left) = self.uses_left.as_mut() {
            *left = left.saturating_sub(1);
        }
    }
}

/// Outcome of a godfather check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Succession {
    /// The current godfather is alive.
    Unchanged,
    /// A new godfather was chosen.
    Promoted(PlayerId),
    /// No mafia member is alive.
    Extinct,
}

/// Committed game state.
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Arc<RoleCatalog>,
    /// Ordered by seat. Never shrinks.
    pub players: Vec<Player>,
    /// Starts at 1; incremented after each night.
    pub cycle: u32,
    pub phase: Phase,
    pub godfather: Option<PlayerId>,
    pub ledger: ActionLedger,
}

impl GameState {
    /// Seats `roles` in order. No godfather is chosen yet.
    pub fn new(catalog: Arc<RoleCatalog>, roles: impl IntoIterator<Item = (PlayerId, RoleKind)>) -> Self {
        let players = roles
            .into_iter()
            .enumerate()
            .map(|(seat, (id, kind))| Player::new(id, seat, catalog.get(kind)))
            .collect();
        Self {
            catalog,
            players,
            cycle: 1,
            phase: Phase::Day,
            godfather: None,
            ledger: ActionLedger::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<RoleCatalog> {
        &self.catalog
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The role definition of `id`. Falls back to Citizen for strangers.
    pub fn role(&self, id: PlayerId) -> &RoleDef {
        let kind = self.player(id).map_or(RoleKind::Citizen, |p| p.role);
        self.catalog.get(kind)
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.alive)
    }

    pub fn seat(&self, id: PlayerId) -> usize {
        self.player(id).map_or(usize::MAX, |p| p.seat)
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn living_ids(&self) -> Vec<PlayerId> {
        self.living().map(|p| p.id).collect()
    }

    pub fn alignment(&self, id: PlayerId) -> Alignment {
        self.role(id).alignment
    }

    /// Alignment as seen by investigations this cycle.
    pub fn apparent_alignment(&self, id: PlayerId) -> Alignment {
        match self.ledger.disguise(id) {
            Some(shown) => self.alignment(shown),
            None => self.alignment(id),
        }
    }

    pub fn is_mafia(&self, id: PlayerId) -> bool {
        self.alignment(id) == Alignment::Mafia
    }

    pub fn total_alive(&self) -> usize {
        self.living().count()
    }

    pub fn total_mafia(&self) -> usize {
        self.living().filter(|p| self.is_mafia(p.id)).count()
    }

    pub fn total_citizens(&self) -> usize {
        self.living()
            .filter(|p| self.alignment(p.id) == Alignment::Citizen)
            .count()
    }

    /// Innate defense, raised by whoever protects `id` this cycle.
    pub fn defense(&self, id: PlayerId) -> Tier {
        let innate = self.role(id).defense;
        let granted = self
            .ledger
            .protector(id)
            .map_or(Tier::None, |p| self.role(p).grants);
        innate.max(granted)
    }

    /// Records `protector` as protecting `target` unless a stronger
    /// protector is already recorded.
    pub fn protect(&mut self, target: PlayerId, protector: PlayerId) {
        let offered = self.role(protector).grants;
        let current = self
            .ledger
            .protector(target)
            .map_or(Tier::None, |p| self.role(p).grants);
        if self.ledger.protector(target).is_none() || offered > current {
            self.ledger.entry(target).protected_by = Some(protector);
        }
    }

    /// Living roles and how many of each, in catalog order.
    pub fn alive_role_counts(&self) -> Vec<(RoleKind, usize)> {
        RoleKind::ALL
            .iter()
            .map(|&kind| (kind, self.living().filter(|p| p.role == kind).count()))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// Keeps the godfather designation on a living mafia member.
    ///
    /// A living godfather is kept. Otherwise one is drawn uniformly from
    /// the living plain mafia, or from the special mafia if no plain mafia
    /// is left.
    pub fn ensure_godfather<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Succession {
        if let Some(current) = self.godfather {
            if self.is_alive(current) && self.is_mafia(current) {
                return Succession::Unchanged;
            }
        }

        let (plain, special): (Vec<&Player>, Vec<&Player>) = self
            .living()
            .filter(|p| self.is_mafia(p.id))
            .partition(|p| !self.catalog.get(p.role).special);
        let pool = if plain.is_empty() { special } else { plain };

        let chosen = pool.choose(rng).map(|p| p.id);
        match chosen {
            Some(chosen) => {
                self.godfather = Some(chosen);
                Succession::Promoted(chosen)
            }
            None => {
                self.godfather = None;
                Succession::Extinct
            }
        }
    }

    /// Marks `id` dead and returns `true` if they were alive.
    pub fn kill(&mut self, id: PlayerId) -> bool {
        match self.player_mut(id) {
            Some(player) if player.alive => {
                player.alive = false;
                true
            }
            _ => false,
        }
    }
}
