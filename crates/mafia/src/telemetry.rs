//! Log output for binaries built on the engine.
//!
//! The library crates only emit `tracing` events. A binary calls [`init`]
//! once at startup to print them.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Like [`init`] with a different fallback filter, e.g. `"mafia_engine=debug"`.
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init_with("debug");
        tracing::info!("still logging");
    }
}
