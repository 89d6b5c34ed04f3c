//! Action collection and phase timing for the Mafia engine.
//!
//! - [`ChatSurface`]: the trait a chat platform adapter implements.
//! - [`ActionCoordinator`]: asks many players at once and gathers their
//!   [`Action`](mafia_rules::Action)s until a shared deadline.
//! - [`PhaseTimer`]: holds a phase open for its full length and sends
//!   the closing notice.
//!
//! # Integration
//!
//! The engine opens a collection and runs the timer side by side:
//!
//! ```ignore
//! let timer = PhaseTimer::start(Phase::Night, night_length, closing_window);
//! let collection = coordinator.open(timer.deadline(), requests);
//! let (submissions, ()) = tokio::join!(
//!     collection.finish(),
//!     timer.run(surface.as_ref(), Audience::AllLiving),
//! );
//! ```

mod coordinator;
mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod timer;

pub use coordinator::{ActionCoordinator, Collection};
pub use surface::ChatSurface;
pub use timer::{DEFAULT_CLOSING_WINDOW, PhaseTimer};
