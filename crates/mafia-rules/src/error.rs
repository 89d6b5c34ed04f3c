//! Error types for the rules layer.

use mafia_protocol::ProtocolError;

/// A game setup that cannot be played.
///
/// Only raised before the first day; once a game runs, the rules never
/// fail.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The setup token did not decode.
    #[error(transparent)]
    MalformedToken(#[from] ProtocolError),

    /// The token names a role id the catalog does not have.
    #[error("unknown role id {0}")]
    UnknownRole(u8),

    /// Plain citizens and mafia are implied by the counts, not listed.
    #[error("{0} cannot be configured as a special role")]
    NotSpecial(String),

    /// `min_players`/`max_players` outside the allowed range.
    #[error("player bounds {min}..={max} are invalid (allowed {floor}..={ceiling})")]
    PlayerBounds {
        min: usize,
        max: usize,
        floor: usize,
        ceiling: usize,
    },

    /// The member pool does not fit the configured bounds.
    #[error("{count} players joined, need {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },

    /// Mafia count is zero or more than half the table.
    #[error("{mafia} mafia is not allowed with {players} players")]
    MafiaCount { mafia: usize, players: usize },

    /// More special mafia roles than mafia seats.
    #[error("{special} special mafia roles but only {mafia} mafia")]
    SpecialMafia { special: usize, mafia: usize },

    /// More roles than players.
    #[error("{roles} roles configured for {players} players")]
    TooManyRoles { roles: usize, players: usize },

    /// A role appears more often than its per-game limit.
    #[error("at most {limit} {role} allowed per game")]
    RoleLimit { role: String, limit: usize },

    /// A custom catalog is incomplete or inconsistent.
    #[error("invalid role catalog: {0}")]
    Catalog(String),
}
