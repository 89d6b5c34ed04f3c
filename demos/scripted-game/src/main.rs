//! Plays one game of Mafia between random bots and prints the report.
//!
//! ```text
//! cargo run -p scripted-game -- [players] [seed]
//! RUST_LOG=mafia_engine=debug cargo run -p scripted-game
//! ```

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mafia::prelude::*;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

/// A surface where every player is a bot answering at random.
///
/// Each bot answers a prompt at most once per phase, after a short random
/// delay, and sometimes not at all.
struct RandomBots {
    state: Mutex<Bots>,
    max_delay: Duration,
}

struct Bots {
    rng: StdRng,
    /// (player, prompt, step) answered this phase.
    answered: HashSet<(PlayerId, PromptKind, u8)>,
}

impl RandomBots {
    fn new(seed: u64, max_delay: Duration) -> Self {
        Self {
            state: Mutex::new(Bots {
                rng: StdRng::seed_from_u64(seed),
                answered: HashSet::new(),
            }),
            max_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Bots> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides whether `player` answers `prompt`, and after how long.
    fn plan(&self, player: PlayerId, prompt: &Prompt) -> Option<Duration> {
        let step = match prompt {
            Prompt::Investigate { step } => *step,
            _ => 0,
        };
        let mut bots = self.lock();
        if !bots.answered.insert((player, prompt.kind(), step)) {
            return None;
        }
        if bots.rng.random_bool(0.2) {
            debug!(%player, ?prompt, "bot passes");
            return None;
        }
        let millis = bots.rng.random_range(0..=self.max_delay.as_millis() as u64);
        Some(Duration::from_millis(millis))
    }

    /// Waits `delay`, or until `deadline` if that comes first.
    async fn think(delay: Option<Duration>, deadline: Instant) -> bool {
        match delay {
            Some(delay) if Instant::now() + delay < deadline => {
                tokio::time::sleep(delay).await;
                true
            }
            _ => {
                tokio::time::sleep_until(deadline).await;
                false
            }
        }
    }
}

impl ChatSurface for RandomBots {
    async fn notify(&self, audience: Audience, notice: Notice) {
        if matches!(notice, Notice::DayBegins { .. } | Notice::NightFalls { .. }) {
            self.lock().answered.clear();
        }
        match audience {
            Audience::Public => info!(?notice, "public"),
            _ => debug!(?audience, ?notice, "private"),
        }
    }

    async fn collect_choice(
        &self,
        player: PlayerId,
        prompt: Prompt,
        options: Vec<PlayerId>,
        deadline: Instant,
    ) -> Reply<PlayerId> {
        let delay = self.plan(player, &prompt);
        if !Self::think(delay, deadline).await {
            return Reply::Timeout;
        }
        let choice = options.choose(&mut self.lock().rng).copied();
        match choice {
            Some(choice) => {
                debug!(%player, ?prompt, %choice, "bot chose");
                Reply::Answered(choice)
            }
            None => Reply::Timeout,
        }
    }

    async fn collect_reaction(&self, player: PlayerId, prompt: Prompt, deadline: Instant) -> Reply<bool> {
        let delay = self.plan(player, &prompt);
        if !Self::think(delay, deadline).await {
            return Reply::Timeout;
        }
        let yes = self.lock().rng.random_bool(0.6);
        debug!(%player, ?prompt, yes, "bot reacted");
        Reply::Answered(yes)
    }

    async fn provision_player_channel(&self, player: PlayerId, role_name: &str) {
        debug!(%player, role = role_name, "channel opened");
    }

    async fn teardown_channel(&self, player: PlayerId) {
        debug!(%player, "channel closed");
    }
}

// ---------------------------------------------------------------------------
// Game setup
// ---------------------------------------------------------------------------

fn demo_config() -> GameConfig {
    GameConfig {
        setup: Setup {
            mafia_count: 2,
            min_players: 6,
            max_players: 12,
            specials: vec![
                RoleKind::Doctor,
                RoleKind::Sheriff,
                RoleKind::Lookout,
                RoleKind::Janitor,
                RoleKind::Jester,
            ],
        },
        day_length: Duration::from_secs(4),
        night_length: Duration::from_secs(2),
        closing_window: Duration::from_secs(1),
        max_cycles: 10,
        ..Default::default()
    }
}

async fn play(players: u64, seed: u64) -> Result<GameReport, MafiaError> {
    let bots = Arc::new(RandomBots::new(seed, Duration::from_millis(800)));
    let mut registry = GameRegistry::new(bots, Arc::new(RoleCatalog::standard()));

    let game = GameId(1);
    let members = (1..=players).map(PlayerId).collect();
    registry.start_with_rng(game, demo_config(), members, StdRng::seed_from_u64(seed))?;
    Ok(registry.wait(game).await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mafia::telemetry::init();

    let mut args = std::env::args().skip(1);
    let players: u64 = match args.next() {
        Some(n) => n.parse()?,
        None => 9,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => rand::rng().random(),
    };
    info!(players, seed, "starting scripted game");

    let report = play(players, seed).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
