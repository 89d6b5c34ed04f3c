//! The Mafia game engine.
//!
//! Each game runs as one Tokio task that owns its state and drives the
//! day/night cycle against a [`ChatSurface`](mafia_coordinator::ChatSurface).
//!
//! # Key types
//!
//! - [`GameEngine`]: plays one game from role assignment to the reveal
//! - [`GameRegistry`]: starts, stops, and replays games per group
//! - [`GameConfig`]: setup plus phase timing
//! - [`GameReport`]: winners and the final reveal
//! - [`TaskSupervisor`]: background work owned by one game

mod config;
mod day;
mod engine;
mod error;
mod registry;
mod tasks;

pub use config::GameConfig;
pub use engine::{GameEngine, GameReport};
pub use error::{EngineError, RegistryError};
pub use registry::GameRegistry;
pub use tasks::TaskSupervisor;
