//! Error types for the engine layer.

use mafia_protocol::GameId;
use mafia_rules::ConfigError;

/// Why a game ended without a report.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The setup could not be played with these members.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The game was stopped before a win condition held.
    #[error("game was stopped")]
    Cancelled,
}

/// Errors from [`GameRegistry`](crate::GameRegistry) operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A game is already running in this group.
    #[error("a game is already running in {0}")]
    AlreadyRunning(GameId),

    /// No game is running in this group.
    #[error("no game running in {0}")]
    NotFound(GameId),

    /// Redo was asked for a group that never started a game.
    #[error("no previous setup for {0}")]
    NoPreviousSetup(GameId),

    /// The setup was rejected before the game started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The game ended with an error.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The game task panicked.
    #[error("game {0} crashed")]
    Crashed(GameId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_passes_through() {
        let err: EngineError = ConfigError::UnknownRole(99).into();
        assert!(matches!(err, EngineError::Config(_)));
        assert_eq!(err.to_string(), "unknown role id 99");

        let err: RegistryError = err.into();
        assert!(matches!(err, RegistryError::Engine(EngineError::Config(_))));
    }

    #[test]
    fn test_registry_messages_name_the_game() {
        assert_eq!(
            RegistryError::AlreadyRunning(GameId(7)).to_string(),
            "a game is already running in G-7"
        );
    }
}
