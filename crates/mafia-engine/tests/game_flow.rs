//! Whole games driven through `GameEngine` against a scripted surface.
//!
//! Role assignment is reproduced by dealing with the same seeded RNG the
//! engine gets, so each test knows who holds which role before the game
//! starts. Time is paused; phases end as soon as every task is idle.

use std::sync::Arc;
use std::time::Duration;

use mafia_coordinator::testing::ScriptedSurface;
use mafia_engine::{EngineError, GameConfig, GameEngine, GameReport};
use mafia_protocol::{Audience, GameId, Notice, PlayerId, PromptKind};
use mafia_rules::{GameState, RoleCatalog, RoleKind, Setup, Trigger, assign_roles};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;

// =========================================================================
// Helpers
// =========================================================================

const SEED: u64 = 2024;

fn members(n: u64) -> Vec<PlayerId> {
    (1..=n).map(PlayerId).collect()
}

fn config(mafia: usize, specials: Vec<RoleKind>) -> GameConfig {
    GameConfig {
        setup: Setup {
            mafia_count: mafia,
            min_players: 3,
            max_players: 12,
            specials,
        },
        day_length: Duration::from_secs(20),
        night_length: Duration::from_secs(10),
        ..Default::default()
    }
}

/// The table the engine will deal for `config` and `n` players.
fn deal(config: &GameConfig, n: u64) -> GameState {
    let catalog = Arc::new(RoleCatalog::standard());
    let mut rng = StdRng::seed_from_u64(SEED);
    assign_roles(&members(n), &config.setup, catalog, &mut rng).unwrap()
}

fn holders(state: &GameState, kind: RoleKind) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| p.role == kind)
        .map(|p| p.id)
        .collect()
}

fn holder(state: &GameState, kind: RoleKind) -> PlayerId {
    holders(state, kind)[0]
}

async fn play(
    config: GameConfig,
    n: u64,
    surface: &Arc<ScriptedSurface>,
) -> Result<GameReport, EngineError> {
    let engine = GameEngine::new(
        GameId(1),
        config,
        Arc::new(RoleCatalog::standard()),
        Arc::clone(surface),
        StdRng::seed_from_u64(SEED),
    );
    let (_stop, stop_rx) = oneshot::channel();
    engine.run(members(n), stop_rx).await
}

/// Scripts two nominations of `nominee` and yes votes on `cycle`.
fn lynch_on(
    surface: &ScriptedSurface,
    cycle: u32,
    nominee: PlayerId,
    nominators: [PlayerId; 2],
    voters: &[PlayerId],
) {
    for by in nominators {
        surface.choose_on(cycle, by, PromptKind::Nominate, nominee);
    }
    for &voter in voters {
        surface.react_on(cycle, voter, PromptKind::Vote, true);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_seven_players_citizens_lynch_both_mafia() {
    let config = config(2, vec![]);
    let table = deal(&config, 7);
    let godfather = table.godfather.unwrap();
    let other = *holders(&table, RoleKind::Mafia)
        .iter()
        .find(|&&p| p != godfather)
        .unwrap();
    let c = holders(&table, RoleKind::Citizen);
    assert_eq!(c.len(), 5);

    let surface = Arc::new(ScriptedSurface::new());
    // Night 1: the godfather kills a citizen.
    surface.choose_on(1, godfather, PromptKind::MafiaKill, c[0]);
    // Day 2: the town lynches the other mafia member.
    lynch_on(&surface, 2, other, [c[1], c[2]], &[c[1], c[2], c[3], c[4]]);
    // Night 2: another citizen dies.
    surface.choose_on(2, godfather, PromptKind::MafiaKill, c[1]);
    // Day 3: the godfather is lynched and the mafia is gone.
    lynch_on(&surface, 3, godfather, [c[2], c[3]], &[c[2], c[3], c[4]]);

    let report = play(config, 7, &surface).await.unwrap();

    assert_eq!(report.trigger, Trigger::MafiaExtinct);
    assert_eq!(report.reason, "The Citizens win");
    assert_eq!(report.cycles, 3);
    let mut winners = report.winners.clone();
    winners.sort();
    assert_eq!(winners, c);

    let public = surface.notices_for(Audience::Public);
    assert!(public.contains(&Notice::Killed {
        victim: c[0],
        role: "Citizen".into(),
        killer_role: "Mafia".into(),
    }));
    assert!(public.contains(&Notice::Lynched {
        player: other,
        role: "Mafia".into(),
    }));
    assert!(public.contains(&Notice::Lynched {
        player: godfather,
        role: "Mafia".into(),
    }));
    assert!(matches!(public.last(), Some(Notice::GameOver { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_preparation_provisions_and_informs_every_player() {
    let config = GameConfig {
        max_cycles: 1,
        ..config(1, vec![RoleKind::Doctor])
    };
    let table = deal(&config, 5);
    let surface = Arc::new(ScriptedSurface::new());

    let report = play(config, 5, &surface).await.unwrap();
    assert_eq!(report.trigger, Trigger::Stalemate);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trigger"], "Stalemate");
    assert_eq!(json["reveal"].as_array().map(Vec::len), Some(5));

    let provisioned = surface.provisioned();
    assert_eq!(provisioned.len(), 5);
    for player in &table.players {
        let role = table.catalog().get(player.role).name.clone();
        assert!(provisioned.contains(&(player.id, role.clone())));
        assert!(surface
            .notices_for(Audience::Player(player.id))
            .iter()
            .any(|n| matches!(n, Notice::RoleAssigned { role: r, .. } if *r == role)));
    }
    assert!(surface.notices_for(Audience::Mafia).contains(&Notice::GodfatherAssigned {
        player: table.godfather.unwrap(),
    }));
    assert_eq!(surface.torn_down().len(), 5);

    let public = surface.notices_for(Audience::Public);
    assert!(matches!(
        public.first(),
        Some(Notice::DayBegins {
            cycle: 1,
            nominations_open: false,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_doctor_save_makes_a_quiet_night() {
    let config = GameConfig {
        max_cycles: 2,
        ..config(1, vec![RoleKind::Doctor, RoleKind::Lookout])
    };
    let table = deal(&config, 6);
    let godfather = table.godfather.unwrap();
    let doctor = holder(&table, RoleKind::Doctor);
    let lookout = holder(&table, RoleKind::Lookout);
    let target = holder(&table, RoleKind::Citizen);

    let surface = Arc::new(ScriptedSurface::new());
    surface
        .choose_on(1, godfather, PromptKind::MafiaKill, target)
        .choose_on(1, doctor, PromptKind::Protect, target)
        .choose_on(1, lookout, PromptKind::Watch, target);

    let report = play(config, 6, &surface).await.unwrap();
    assert_eq!(report.trigger, Trigger::Stalemate);
    assert!(report.reveal.iter().all(|r| r.alive));

    let public = surface.notices_for(Audience::Public);
    assert!(public.contains(&Notice::QuietNight));
    assert!(!public.iter().any(|n| matches!(n, Notice::Killed { .. })));
    assert!(surface
        .notices_for(Audience::Player(target))
        .contains(&Notice::Saved {
            protector_role: "Doctor".into(),
        }));
    assert!(surface
        .notices_for(Audience::Mafia)
        .contains(&Notice::AttackRepelled { target }));

    // The lookout's report arrives after the night.
    let report = surface
        .notices_for(Audience::Player(lookout))
        .into_iter()
        .find_map(|n| match n {
            Notice::VisitorReport { target: t, visitors } => Some((t, visitors)),
            _ => None,
        })
        .unwrap();
    assert_eq!(report.0, target);
    assert!(report.1.contains(&godfather));
    assert!(report.1.contains(&doctor));
}

#[tokio::test(start_paused = true)]
async fn test_jester_lynch_is_a_side_win() {
    let config = config(1, vec![RoleKind::Jester]);
    let table = deal(&config, 5);
    let mafia = table.godfather.unwrap();
    let jester = holder(&table, RoleKind::Jester);
    let c = holders(&table, RoleKind::Citizen);

    let surface = Arc::new(ScriptedSurface::new());
    lynch_on(&surface, 2, jester, [c[0], c[1]], &[c[0], c[1], c[2]]);
    surface.choose_on(2, mafia, PromptKind::MafiaKill, c[0]);
    lynch_on(&surface, 3, mafia, [c[1], c[2]], &[c[1], c[2]]);

    let report = play(config, 5, &surface).await.unwrap();

    assert_eq!(report.trigger, Trigger::MafiaExtinct);
    assert!(report.winners.contains(&jester));
    for citizen in &c {
        assert!(report.winners.contains(citizen));
    }
    assert!(!report.winners.contains(&mafia));

    let side_wins: Vec<Notice> = surface
        .notices_for(Audience::Public)
        .into_iter()
        .filter(|n| matches!(n, Notice::SideWin { .. }))
        .collect();
    assert_eq!(
        side_wins,
        vec![Notice::SideWin {
            player: jester,
            role: "Jester".into(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_arsonist_ignites_every_doused_player() {
    let config = GameConfig {
        max_cycles: 3,
        ..config(1, vec![RoleKind::Arsonist, RoleKind::Doctor])
    };
    let table = deal(&config, 6);
    let arsonist = holder(&table, RoleKind::Arsonist);
    let doctor = holder(&table, RoleKind::Doctor);
    let c = holders(&table, RoleKind::Citizen);

    let surface = Arc::new(ScriptedSurface::new());
    surface
        .choose_on(1, arsonist, PromptKind::Douse, c[0])
        .choose_on(2, arsonist, PromptKind::Douse, c[1])
        .choose_on(3, arsonist, PromptKind::Douse, arsonist)
        .choose_on(3, doctor, PromptKind::Protect, c[1]);

    let report = play(config, 6, &surface).await.unwrap();
    assert_eq!(report.trigger, Trigger::Stalemate);

    let dead: Vec<PlayerId> = report
        .reveal
        .iter()
        .filter(|r| !r.alive)
        .map(|r| r.player)
        .collect();
    assert_eq!(dead.len(), 2);
    assert!(dead.contains(&c[0]));
    assert!(dead.contains(&c[1]));

    let public = surface.notices_for(Audience::Public);
    for victim in [c[0], c[1]] {
        assert!(public.contains(&Notice::Killed {
            victim,
            role: "Citizen".into(),
            killer_role: "Arsonist".into(),
        }));
    }
}

#[tokio::test(start_paused = true)]
async fn test_cleaned_kill_is_private() {
    let config = GameConfig {
        max_cycles: 1,
        ..config(2, vec![RoleKind::Janitor])
    };
    let table = deal(&config, 5);
    let godfather = table.godfather.unwrap();
    let janitor = holder(&table, RoleKind::Janitor);
    assert_ne!(godfather, janitor);
    let victim = holder(&table, RoleKind::Citizen);

    let surface = Arc::new(ScriptedSurface::new());
    surface
        .choose_on(1, godfather, PromptKind::MafiaKill, victim)
        .choose_on(1, janitor, PromptKind::Clean, victim);

    let report = play(config, 5, &surface).await.unwrap();
    assert!(report.reveal.iter().any(|r| r.player == victim && !r.alive));

    let public = surface.notices_for(Audience::Public);
    assert!(!public.iter().any(|n| matches!(n, Notice::Killed { .. })));
    assert!(public.contains(&Notice::QuietNight));
    assert!(surface
        .notices_for(Audience::Player(janitor))
        .contains(&Notice::CleanedReport {
            victim,
            role: "Citizen".into(),
        }));
    assert!(surface
        .notices_for(Audience::Mafia)
        .contains(&Notice::KillConfirmed { victim }));
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_the_game() {
    let surface = Arc::new(ScriptedSurface::new());
    let engine = GameEngine::new(
        GameId(9),
        config(1, vec![]),
        Arc::new(RoleCatalog::standard()),
        Arc::clone(&surface),
        StdRng::seed_from_u64(SEED),
    );
    let (stop, stop_rx) = oneshot::channel();
    let game = tokio::spawn(engine.run(members(4), stop_rx));

    tokio::time::sleep(Duration::from_secs(15)).await;
    stop.send(()).unwrap();

    let result = game.await.unwrap();
    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert_eq!(surface.torn_down().len(), 4);
    assert!(!surface
        .notices_for(Audience::Public)
        .iter()
        .any(|n| matches!(n, Notice::GameOver { .. })));
}

#[tokio::test]
async fn test_too_few_members_is_a_config_error() {
    let surface = Arc::new(ScriptedSurface::new());
    let result = play(config(1, vec![]), 2, &surface).await;
    assert!(matches!(result, Err(EngineError::Config(_))));
    assert!(surface.provisioned().is_empty());
}
