//! Game rules for the Mafia engine.
//!
//! Everything here is synchronous and deterministic given an RNG: the
//! async layers above collect actions, then hand them to these functions
//! to resolve.
//!
//! - [`RoleCatalog`]: static role definitions.
//! - [`GameState`] / [`ActionLedger`]: the roster and per-cycle record.
//! - [`abilities`]: which requests each phase solicits.
//! - [`night`] / [`day`]: resolution of collected actions.
//! - [`win`]: win predicates and the game-ending trigger.
//! - [`setup`]: configuration checks and role assignment.

pub mod abilities;
mod action;
mod catalog;
pub mod day;
mod error;
mod ledger;
pub mod night;
pub mod setup;
mod state;
mod tier;
pub mod win;

pub use action::{Action, ActionKind, ActionRequest, Step, Submissions};
pub use catalog::{Alignment, DayAbility, NightAbility, RoleCatalog, RoleDef, RoleKind, WinRule};
pub use day::{Ballot, NominationBoard, NominationError, NominationPhase, NominationProgress, VoteTally};
pub use error::ConfigError;
pub use ledger::{ActionLedger, LedgerEntry};
pub use night::{Death, NightOutcome};
pub use setup::{Setup, assign_roles};
pub use state::{GameState, Player, Succession};
pub use tier::Tier;
pub use win::Trigger;
