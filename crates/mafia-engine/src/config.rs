//! Game configuration.

use std::time::Duration;

use mafia_coordinator::DEFAULT_CLOSING_WINDOW;
use mafia_protocol::SetupToken;
use mafia_rules::day::DEFAULT_NOMINATION_THRESHOLD;
use mafia_rules::{ConfigError, RoleCatalog, Setup};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything needed to run one game.
///
/// The role side lives in [`Setup`] and round-trips through the setup
/// token. Timing does not; a replayed token gets default timing unless
/// the caller overrides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub setup: Setup,
    /// Length of day 2 onward. Day 1 lasts half as long.
    pub day_length: Duration,
    pub night_length: Duration,
    /// Lead time of the "phase ends soon" notice.
    pub closing_window: Duration,
    /// Distinct nominators needed to put someone on trial.
    pub nomination_threshold: usize,
    /// Cycles after which the game ends in a stalemate.
    pub max_cycles: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            setup: Setup::default(),
            day_length: Duration::from_secs(90),
            night_length: Duration::from_secs(45),
            closing_window: DEFAULT_CLOSING_WINDOW,
            nomination_threshold: DEFAULT_NOMINATION_THRESHOLD,
            max_cycles: 30,
        }
    }
}

impl GameConfig {
    /// Shortest phase the engine will run.
    pub const MIN_PHASE_LENGTH: Duration = Duration::from_secs(1);

    pub fn with_setup(setup: Setup) -> Self {
        Self {
            setup,
            ..Default::default()
        }
    }

    /// Clamp out-of-range timing and counts so the config is safe to run.
    ///
    /// The setup itself is not touched; [`Setup::validate`] rejects bad
    /// setups instead of fixing them.
    pub fn validated(mut self) -> Self {
        if self.day_length < Self::MIN_PHASE_LENGTH {
            warn!(day_length = ?self.day_length, "day_length too short, clamping");
            self.day_length = Self::MIN_PHASE_LENGTH;
        }
        if self.night_length < Self::MIN_PHASE_LENGTH {
            warn!(night_length = ?self.night_length, "night_length too short, clamping");
            self.night_length = Self::MIN_PHASE_LENGTH;
        }
        if self.nomination_threshold == 0 {
            warn!("nomination_threshold of 0, using 1");
            self.nomination_threshold = 1;
        }
        if self.max_cycles == 0 {
            warn!("max_cycles of 0, using 1");
            self.max_cycles = 1;
        }
        self
    }

    /// Length of the day in `cycle`.
    pub fn day_length_for(&self, cycle: u32) -> Duration {
        if cycle <= 1 {
            self.day_length / 2
        } else {
            self.day_length
        }
    }

    /// Builds a config with default timing from a setup token.
    ///
    /// # Errors
    /// Returns [`ConfigError::MalformedToken`] if the token does not
    /// decode, or whatever [`Setup::from_token`] rejects.
    pub fn from_token(token: &str, catalog: &RoleCatalog) -> Result<Self, ConfigError> {
        let token = SetupToken::decode(token)?;
        Ok(Self::with_setup(Setup::from_token(&token, catalog)?))
    }

    /// Encodes the role side of this config.
    pub fn to_token(&self, catalog: &RoleCatalog) -> String {
        self.setup.to_token(catalog).encode()
    }
}
