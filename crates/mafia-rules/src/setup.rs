//! Game setup: validation, token conversion, and role assignment.

use std::sync::Arc;

use mafia_protocol::{PlayerId, SetupToken};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{Alignment, ConfigError, GameState, RoleCatalog, RoleKind, WinRule};

/// Smallest table the engine will run.
pub const MIN_PLAYERS: usize = 3;

/// Largest table the engine will run.
pub const MAX_PLAYERS: usize = 25;

/// Who plays which roles, independent of timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    /// Total mafia, special mafia included.
    pub mafia_count: usize,
    pub min_players: usize,
    pub max_players: usize,
    /// One entry per special role instance.
    pub specials: Vec<RoleKind>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            mafia_count: 1,
            min_players: 5,
            max_players: 12,
            specials: Vec::new(),
        }
    }
}

impl Setup {
    /// Checks everything that does not depend on the member pool.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self, catalog: &RoleCatalog) -> Result<(), ConfigError> {
        if self.min_players < MIN_PLAYERS
            || self.max_players > MAX_PLAYERS
            || self.min_players > self.max_players
        {
            return Err(ConfigError::PlayerBounds {
                min: self.min_players,
                max: self.max_players,
                floor: MIN_PLAYERS,
                ceiling: MAX_PLAYERS,
            });
        }
        if self.mafia_count == 0 || self.mafia_count > self.max_players / 2 {
            return Err(ConfigError::MafiaCount {
                mafia: self.mafia_count,
                players: self.max_players,
            });
        }

        for &kind in &self.specials {
            let def = catalog.get(kind);
            if !def.special {
                return Err(ConfigError::NotSpecial(def.name.clone()));
            }
            if let Some(limit) = def.limit {
                if self.specials.iter().filter(|&&k| k == kind).count() > limit {
                    return Err(ConfigError::RoleLimit {
                        role: def.name.clone(),
                        limit,
                    });
                }
            }
        }

        let special_mafia = self.special_mafia(catalog);
        if special_mafia > self.mafia_count {
            return Err(ConfigError::SpecialMafia {
                special: special_mafia,
                mafia: self.mafia_count,
            });
        }
        let roles = self.role_slots(catalog);
        if roles > self.max_players {
            return Err(ConfigError::TooManyRoles {
                roles,
                players: self.max_players,
            });
        }
        Ok(())
    }

    /// Checks that `players` members can play this setup.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the count is outside the bounds or too
    /// small for the configured mafia and roles.
    pub fn check_players(&self, players: usize, catalog: &RoleCatalog) -> Result<(), ConfigError> {
        self.validate(catalog)?;
        if players < self.min_players || players > self.max_players {
            return Err(ConfigError::PlayerCount {
                count: players,
                min: self.min_players,
                max: self.max_players,
            });
        }
        if self.mafia_count > players / 2 {
            return Err(ConfigError::MafiaCount {
                mafia: self.mafia_count,
                players,
            });
        }
        let roles = self.role_slots(catalog);
        if roles > players {
            return Err(ConfigError::TooManyRoles { roles, players });
        }
        Ok(())
    }

    /// Converts a decoded token into a setup.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownRole`] for ids missing from the
    /// catalog, or whatever [`validate`](Self::validate) reports.
    pub fn from_token(token: &SetupToken, catalog: &RoleCatalog) -> Result<Self, ConfigError> {
        let specials = token
            .roles
            .iter()
            .map(|&id| {
                catalog
                    .by_id(id)
                    .map(|def| def.kind)
                    .ok_or(ConfigError::UnknownRole(id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let setup = Self {
            mafia_count: usize::from(token.mafia_count),
            min_players: usize::from(token.min_players),
            max_players: usize::from(token.max_players),
            specials,
        };
        setup.validate(catalog)?;
        Ok(setup)
    }

    /// Encodes this setup. Counts are at most [`MAX_PLAYERS`] once
    /// validated, so they fit a byte.
    pub fn to_token(&self, catalog: &RoleCatalog) -> SetupToken {
        let byte = |n: usize| u8::try_from(n).unwrap_or(u8::MAX);
        SetupToken {
            mafia_count: byte(self.mafia_count),
            min_players: byte(self.min_players),
            max_players: byte(self.max_players),
            roles: self.specials.iter().map(|&k| catalog.get(k).id).collect(),
        }
    }

    fn special_mafia(&self, catalog: &RoleCatalog) -> usize {
        self.specials
            .iter()
            .filter(|&&k| catalog.get(k).is_special_mafia())
            .count()
    }

    /// Seats that must be filled by something other than a plain citizen.
    fn role_slots(&self, catalog: &RoleCatalog) -> usize {
        self.specials.len() + (self.mafia_count - self.special_mafia(catalog).min(self.mafia_count))
    }
}

/// Deals roles to `members` and seats them in join order.
///
/// Members are shuffled, then dealt the special roles first, then plain
/// mafia up to the mafia count, then citizens. Executioners get a random
/// citizen target and a godfather is chosen.
///
/// # Errors
/// Returns a [`ConfigError`] if the member pool does not fit the setup.
pub fn assign_roles<R: Rng + ?Sized>(
    members: &[PlayerId],
    setup: &Setup,
    catalog: Arc<RoleCatalog>,
    rng: &mut R,
) -> Result<GameState, ConfigError> {
    setup.check_players(members.len(), &catalog)?;

    let mut order: Vec<usize> = (0..members.len()).collect();
    order.shuffle(rng);

    let plain_mafia = setup.mafia_count - setup.special_mafia(&catalog);
    let deck = setup
        .specials
        .iter()
        .copied()
        .chain(std::iter::repeat_n(RoleKind::Mafia, plain_mafia))
        .chain(std::iter::repeat(RoleKind::Citizen));

    let mut dealt = vec![RoleKind::Citizen; members.len()];
    for (&seat, kind) in order.iter().zip(deck) {
        dealt[seat] = kind;
    }

    let mut state = GameState::new(catalog, members.iter().copied().zip(dealt));

    let citizens: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|p| state.alignment(p.id) == Alignment::Citizen)
        .map(|p| p.id)
        .collect();
    let executioners: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|p| state.role(p.id).win == WinRule::Executioner)
        .map(|p| p.id)
        .collect();
    for id in executioners {
        let target = citizens.choose(rng).copied();
        if let Some(player) = state.player_mut(id) {
            player.target = target;
        }
    }

    state.ensure_godfather(rng);
    Ok(state)
}
