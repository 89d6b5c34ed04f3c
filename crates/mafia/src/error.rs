//! Unified error type for the Mafia engine.

use mafia_engine::{EngineError, RegistryError};
use mafia_protocol::ProtocolError;
use mafia_rules::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// Chat adapters built on the `mafia` crate deal with this single type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MafiaError {
    /// Encoding or decoding failed, or a token was malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The setup does not fit the catalog or the members.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A game ended abnormally.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A start, stop, or redo command was refused.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
