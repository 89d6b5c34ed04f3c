//! Whole-cycle scenarios driven through the public rules API, without the
//! async layers.

use std::sync::Arc;
use std::time::Instant;

use mafia_protocol::{Audience, Notice, Phase, PlayerId};
use mafia_rules::{
    Action, ActionKind, GameState, NominationBoard, NominationProgress, RoleCatalog, RoleKind,
    Submissions, Succession, Trigger, VoteTally, abilities, day, night, win,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn table(roles: &[RoleKind]) -> GameState {
    let catalog = Arc::new(RoleCatalog::standard());
    GameState::new(
        catalog,
        roles
            .iter()
            .enumerate()
            .map(|(i, &kind)| (PlayerId(i as u64 + 1), kind)),
    )
}

fn act(actor: u64, kind: ActionKind, targets: &[u64]) -> Action {
    Action {
        actor: PlayerId(actor),
        kind,
        targets: targets.iter().map(|&t| PlayerId(t)).collect(),
        approve: true,
        deadline: Instant::now(),
    }
}

fn submissions(actions: Vec<Action>) -> Submissions {
    actions.into_iter().collect()
}

/// Nominates `nominee` by the given players, votes, and lynches if the
/// vote passes.
fn lynch_by_vote(state: &mut GameState, nominee: u64, nominators: &[u64], rng: &mut StdRng) -> bool {
    let mut board = NominationBoard::new(2);
    for &by in nominators {
        let _ = board.nominate(state, PlayerId(by), PlayerId(nominee));
    }
    let Some(on_trial) = board.open_vote() else { return false };

    let mut tally = VoteTally::new(on_trial);
    for voter in state.living_ids() {
        tally.record(voter, voter != on_trial);
    }
    let ballot = tally.tally(state);
    board.resolve();
    ballot.passes() && day::apply_lynch(state, on_trial, rng).is_some()
}

#[test]
fn test_seven_players_two_mafia_citizens_win_by_day() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut state = table(&[
        RoleKind::Citizen,
        RoleKind::Mafia,
        RoleKind::Citizen,
        RoleKind::Citizen,
        RoleKind::Mafia,
        RoleKind::Citizen,
        RoleKind::Citizen,
    ]);
    state.godfather = Some(PlayerId(2));

    // Day 1: no nominations, nobody has a day ability.
    assert!(abilities::day_requests(&state).is_empty());
    assert_eq!(win::check(&state, Phase::Day), None);

    // Night 1: the godfather kills player 1.
    state.phase = Phase::Night;
    let requests = abilities::night_requests(&state);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].actor, PlayerId(2));
    let outcome = night::resolve(
        &mut state,
        submissions(vec![act(2, ActionKind::Kill, &[1])]),
        &mut rng,
    );
    assert!(outcome.notices.contains(&(
        Audience::Public,
        Notice::Killed {
            victim: PlayerId(1),
            role: "Citizen".into(),
            killer_role: "Mafia".into(),
        }
    )));
    assert_eq!(win::check(&state, Phase::Night), None);
    state.cycle += 1;

    // Day 2: the town lynches player 5.
    state.phase = Phase::Day;
    state.ledger.reset(state.living_ids());
    assert!(lynch_by_vote(&mut state, 5, &[3, 4], &mut rng));
    assert_eq!(win::check(&state, Phase::Day), None);

    // Night 2: the godfather kills player 3.
    night::resolve(
        &mut state,
        submissions(vec![act(2, ActionKind::Kill, &[3])]),
        &mut rng,
    );
    assert_eq!(win::check(&state, Phase::Night), None);

    // Day 3: lynching the last mafia member ends the game at once.
    state.ledger.reset(state.living_ids());
    let mut board = NominationBoard::new(2);
    board.nominate(&state, PlayerId(4), PlayerId(2)).unwrap();
    assert_eq!(
        board.nominate(&state, PlayerId(6), PlayerId(2)).unwrap(),
        NominationProgress::Opened(PlayerId(2))
    );
    let nominee = board.open_vote().unwrap();
    let lynch = day::apply_lynch(&mut state, nominee, &mut rng).unwrap();
    assert_eq!(lynch.succession, Succession::Extinct);
    assert_eq!(state.total_mafia(), 0);
    assert_eq!(win::check(&state, Phase::Day), Some(Trigger::WinCondition(RoleKind::Citizen)));

    let winners = win::winners(&state, Phase::Day);
    assert_eq!(winners, vec![PlayerId(1), PlayerId(3), PlayerId(4), PlayerId(6), PlayerId(7)]);
}

#[test]
fn test_arsonist_douses_twice_then_ignites() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = table(&[
        RoleKind::Arsonist,
        RoleKind::Doctor,
        RoleKind::Citizen,
        RoleKind::Citizen,
        RoleKind::Mafia,
        RoleKind::Jailor,
    ]);
    state.godfather = Some(PlayerId(5));

    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Douse, &[2])]), &mut rng);
    state.ledger.reset(state.living_ids());
    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Douse, &[3])]), &mut rng);
    state.ledger.reset(state.living_ids());

    // Night 3: the doctor protects itself and the jailor jails player 3.
    let jail = act(6, ActionKind::Jail, &[3]);
    night::prepare_night(&mut state, [&jail]);
    let outcome = night::resolve(
        &mut state,
        submissions(vec![
            act(1, ActionKind::Douse, &[1]),
            act(2, ActionKind::Protect, &[4]),
        ]),
        &mut rng,
    );

    let dead: Vec<PlayerId> = outcome.deaths.iter().map(|d| d.victim).collect();
    assert_eq!(dead, vec![PlayerId(2), PlayerId(3)]);
    assert!(state.is_alive(PlayerId(4)));
    assert!(state.is_alive(PlayerId(5)));
}

#[test]
fn test_jester_lynch_coexists_with_later_win() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = table(&[
        RoleKind::Mafia,
        RoleKind::Jester,
        RoleKind::Citizen,
        RoleKind::Citizen,
        RoleKind::Citizen,
    ]);
    state.godfather = Some(PlayerId(1));

    assert!(lynch_by_vote(&mut state, 2, &[3, 4], &mut rng));
    assert!(win::win_condition(&state, PlayerId(2), Phase::Day));
    assert_eq!(win::side_winners(&state, Phase::Day), vec![PlayerId(2)]);
    assert_eq!(win::check(&state, Phase::Day), None);

    // The town then finds the mafia; the jester is still among the winners.
    assert!(lynch_by_vote(&mut state, 1, &[3, 4], &mut rng));
    assert_eq!(win::check(&state, Phase::Day), Some(Trigger::WinCondition(RoleKind::Citizen)));
    assert!(win::winners(&state, Phase::Day).contains(&PlayerId(2)));
}

/// Mafia (godfather), executioner targeting player 3, player 3, sheriff,
/// and two citizens.
fn executioner_table() -> GameState {
    let mut state = table(&[
        RoleKind::Mafia,
        RoleKind::Executioner,
        RoleKind::Citizen,
        RoleKind::Sheriff,
        RoleKind::Citizen,
        RoleKind::Citizen,
    ]);
    state.godfather = Some(PlayerId(1));
    state.player_mut(PlayerId(2)).unwrap().target = Some(PlayerId(3));
    state
}

#[test]
fn test_executioner_lynched_after_target_killed_at_night() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = executioner_table();

    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Kill, &[3])]), &mut rng);
    assert!(!state.is_alive(PlayerId(3)));
    assert!(!win::win_condition(&state, PlayerId(2), Phase::Night));
    state.cycle += 1;

    state.ledger.reset(state.living_ids());
    assert!(lynch_by_vote(&mut state, 2, &[4, 5], &mut rng));
    assert!(win::win_condition(&state, PlayerId(2), Phase::Day));
    assert_eq!(win::side_winners(&state, Phase::Day), vec![PlayerId(2)]);
}

#[test]
fn test_executioner_shot_by_sheriff_after_target_killed() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut state = executioner_table();

    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Kill, &[3])]), &mut rng);
    state.ledger.reset(state.living_ids());
    let outcome = night::resolve(&mut state, submissions(vec![act(4, ActionKind::Kill, &[2])]), &mut rng);

    assert_eq!(outcome.deaths.len(), 1);
    assert_eq!(outcome.deaths[0].victim, PlayerId(2));
    assert!(win::win_condition(&state, PlayerId(2), Phase::Night));
}

#[test]
fn test_executioner_killed_by_mafia_after_target_killed_loses() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut state = executioner_table();

    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Kill, &[3])]), &mut rng);
    state.ledger.reset(state.living_ids());
    night::resolve(&mut state, submissions(vec![act(1, ActionKind::Kill, &[2])]), &mut rng);

    assert!(!state.is_alive(PlayerId(2)));
    assert!(!win::win_condition(&state, PlayerId(2), Phase::Night));
    assert!(!win::winners(&state, Phase::Night).contains(&PlayerId(2)));
}
