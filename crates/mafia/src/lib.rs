//! # Mafia
//!
//! Turn engine for Mafia-style social deduction games played in group
//! chats.
//!
//! The engine is platform-agnostic: a chat adapter implements
//! [`ChatSurface`] to deliver notices and collect answers, and a
//! [`GameRegistry`] runs one game per group on top of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mafia::prelude::*;
//!
//! // Implement ChatSurface for your platform, then:
//! // let mut registry = GameRegistry::new(surface, Arc::new(RoleCatalog::standard()));
//! // registry.start(GameId(1), GameConfig::default(), members)?;
//! // let report = registry.wait(GameId(1)).await?;
//! ```

mod error;
pub mod telemetry;

pub use error::MafiaError;

pub use mafia_coordinator as coordinator;
pub use mafia_engine as engine;
pub use mafia_protocol as protocol;
pub use mafia_rules as rules;

pub use mafia_coordinator::ChatSurface;
pub use mafia_engine::{GameConfig, GameEngine, GameRegistry, GameReport};

/// The types most adapters need.
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::MafiaError;
    pub use mafia_coordinator::ChatSurface;
    pub use mafia_engine::{EngineError, GameConfig, GameEngine, GameRegistry, GameReport, RegistryError};
    pub use mafia_protocol::{Audience, GameId, Notice, Phase, PlayerId, Prompt, PromptKind, Reply, Reveal};
    pub use mafia_rules::{ConfigError, RoleCatalog, RoleKind, Setup, Trigger};
}
