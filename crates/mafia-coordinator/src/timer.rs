//! Phase timing.
//!
//! A phase always lasts its full configured length, even if every player
//! acted early. Shortly before the end, one closing notice goes out.

use std::time::Duration;

use mafia_protocol::{Audience, Notice, Phase};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::ChatSurface;

/// Default lead time of the closing notice.
pub const DEFAULT_CLOSING_WINDOW: Duration = Duration::from_secs(20);

/// Deadline and closing notice for one phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimer {
    phase: Phase,
    end: Instant,
    length: Duration,
    closing_window: Duration,
}

impl PhaseTimer {
    /// Starts a phase of `length` from now.
    ///
    /// A `closing_window` of zero, or one not shorter than the phase,
    /// sends no closing notice.
    pub fn start(phase: Phase, length: Duration, closing_window: Duration) -> Self {
        Self {
            phase,
            end: Instant::now() + length,
            length,
            closing_window,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.end
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sleeps until the end of the phase, sending the closing notice to
    /// `audience` on the way.
    pub async fn run<S: ChatSurface>(&self, surface: &S, audience: Audience) {
        if !self.closing_window.is_zero() && self.closing_window < self.length {
            time::sleep_until(self.end - self.closing_window).await;
            debug!(phase = %self.phase, "phase closing soon");
            surface
                .notify(
                    audience,
                    Notice::ClosingSoon {
                        phase: self.phase,
                        seconds_left: self.closing_window.as_secs(),
                    },
                )
                .await;
        }
        time::sleep_until(self.end).await;
    }
}
