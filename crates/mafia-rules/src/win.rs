//! Win conditions.
//!
//! Every role's win predicate is a pure function of the state and the
//! phase that just ended. The game ends as soon as a role that does not
//! win simultaneously has its predicate hold; simultaneous roles then
//! join the winners if theirs hold too.

use std::fmt;

use mafia_protocol::{Phase, PlayerId};
use serde::{Deserialize, Serialize};

use crate::{Alignment, GameState, RoleCatalog, RoleKind, WinRule};

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// A non-simultaneous role's predicate held.
    WinCondition(RoleKind),
    /// The last mafia member died.
    MafiaExtinct,
    /// The cycle limit was reached.
    Stalemate,
}

impl Trigger {
    /// Human-readable reason, naming the winning side.
    pub fn describe(&self, catalog: &RoleCatalog) -> String {
        match self {
            Self::WinCondition(kind) => {
                let def = catalog.get(*kind);
                match def.alignment {
                    Alignment::Independent => format!("The {} wins", def.name),
                    side => format!("The {side} win"),
                }
            }
            Self::MafiaExtinct => format!("The {} win", Alignment::Citizen),
            Self::Stalemate => "Stalemate".to_owned(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinCondition(kind) => write!(f, "WinCondition({kind})"),
            Self::MafiaExtinct => write!(f, "MafiaExtinct"),
            Self::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// Evaluates `player`'s win predicate after `phase`.
pub fn win_condition(state: &GameState, player: PlayerId, phase: Phase) -> bool {
    let Some(me) = state.player(player) else { return false };
    match state.role(player).win {
        WinRule::Citizens => state.total_mafia() == 0,
        WinRule::Mafia => mafia_wins(state, phase),
        WinRule::Survive => me.alive,
        WinRule::Jester => jester_wins(state, player),
        // Once the target dies without being lynched, the jester's goal applies.
        WinRule::Executioner => match me.target.and_then(|t| state.player(t)) {
            Some(target) if target.lynched => true,
            Some(target) if target.alive => false,
            _ => jester_wins(state, player),
        },
        WinRule::LastStanding => me.alive && state.total_alive() == 1,
    }
}

/// By day the town still has a chance while a night killer lives; by
/// night it does not.
fn mafia_wins(state: &GameState, phase: Phase) -> bool {
    let mafia = state.total_mafia();
    let alive = state.total_alive();
    if mafia == 0 {
        return false;
    }
    match phase {
        Phase::Day => {
            let night_killer = state
                .living()
                .any(|p| state.role(p.id).can_kill_mafia_at_night);
            !night_killer && mafia * 2 >= alive
        }
        Phase::Night => mafia * 2 > alive,
    }
}

fn jester_wins(state: &GameState, player: PlayerId) -> bool {
    let Some(me) = state.player(player) else { return false };
    if me.lynched {
        return true;
    }
    if me.alive {
        return false;
    }
    state
        .ledger
        .killer(player)
        .is_some_and(|killer| !state.is_mafia(killer))
}

/// Returns the trigger that ends the game after `phase`, if any.
///
/// Players are checked in seat order, dead ones included.
pub fn check(state: &GameState, phase: Phase) -> Option<Trigger> {
    state
        .players
        .iter()
        .find(|p| !state.role(p.id).simultaneous_win && win_condition(state, p.id, phase))
        .map(|p| Trigger::WinCondition(p.role))
}

/// Every player whose predicate holds against the final state.
pub fn winners(state: &GameState, phase: Phase) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| win_condition(state, p.id, phase))
        .map(|p| p.id)
        .collect()
}

/// Simultaneous-win players whose predicate holds right now.
pub fn side_winners(state: &GameState, phase: Phase) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| state.role(p.id).simultaneous_win && win_condition(state, p.id, phase))
        .map(|p| p.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::seat;

    #[test]
    fn test_citizens_win_without_mafia() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Citizen, RoleKind::Citizen]);
        assert_eq!(check(&state, Phase::Day), None);
        state.kill(PlayerId(1));
        assert_eq!(check(&state, Phase::Day), Some(Trigger::WinCondition(RoleKind::Citizen)));
        assert_eq!(winners(&state, Phase::Day), vec![PlayerId(2), PlayerId(3)]);
    }

    #[test]
    fn test_mafia_day_predicate_blocked_by_night_killer() {
        // 2 mafia of 4 alive would win by day, but the sheriff lives.
        let state = seat(&[RoleKind::Mafia, RoleKind::Mafia, RoleKind::Sheriff, RoleKind::Citizen]);
        assert!(!win_condition(&state, PlayerId(1), Phase::Day));
        assert_eq!(check(&state, Phase::Day), None);
    }

    #[test]
    fn test_mafia_day_predicate_half() {
        let state = seat(&[RoleKind::Mafia, RoleKind::Mafia, RoleKind::Doctor, RoleKind::Citizen]);
        assert!(win_condition(&state, PlayerId(1), Phase::Day));
        assert!(!win_condition(&state, PlayerId(1), Phase::Night));
    }

    #[test]
    fn test_mafia_night_predicate_majority() {
        let mut state = seat(&[
            RoleKind::Mafia,
            RoleKind::Mafia,
            RoleKind::Sheriff,
            RoleKind::Citizen,
            RoleKind::Citizen,
        ]);
        assert!(!win_condition(&state, PlayerId(1), Phase::Night));
        state.kill(PlayerId(4));
        state.kill(PlayerId(5));
        // 2 of 3 alive; the sheriff does not matter at night.
        assert!(win_condition(&state, PlayerId(1), Phase::Night));
        assert!(!win_condition(&state, PlayerId(1), Phase::Day));
    }

    #[test]
    fn test_dead_mafia_share_the_win() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Mafia, RoleKind::Mafia, RoleKind::Citizen]);
        state.kill(PlayerId(1));
        assert_eq!(check(&state, Phase::Night), Some(Trigger::WinCondition(RoleKind::Mafia)));
        assert_eq!(winners(&state, Phase::Night), vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
    }

    #[test]
    fn test_jester_lynch_is_simultaneous() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Jester, RoleKind::Citizen, RoleKind::Citizen]);
        let jester = state.player_mut(PlayerId(2)).unwrap();
        jester.alive = false;
        jester.lynched = true;

        assert!(win_condition(&state, PlayerId(2), Phase::Day));
        assert_eq!(side_winners(&state, Phase::Day), vec![PlayerId(2)]);
        // The jester alone never ends the game.
        assert_eq!(check(&state, Phase::Day), None);
    }

    #[test]
    fn test_jester_killed_by_mafia_loses() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Jester, RoleKind::Sheriff]);
        state.kill(PlayerId(2));
        state.ledger.entry(PlayerId(2)).killed_by = Some(PlayerId(1));
        assert!(!win_condition(&state, PlayerId(2), Phase::Night));
        state.ledger.entry(PlayerId(2)).killed_by = Some(PlayerId(3));
        assert!(win_condition(&state, PlayerId(2), Phase::Night));
    }

    #[test]
    fn test_executioner_target_lynched() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Executioner, RoleKind::Citizen, RoleKind::Citizen]);
        state.player_mut(PlayerId(2)).unwrap().target = Some(PlayerId(3));
        assert!(!win_condition(&state, PlayerId(2), Phase::Day));
        let target = state.player_mut(PlayerId(3)).unwrap();
        target.alive = false;
        target.lynched = true;
        assert!(win_condition(&state, PlayerId(2), Phase::Day));
    }

    #[test]
    fn test_executioner_lynched_after_target_dies_unlynched() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Executioner, RoleKind::Citizen, RoleKind::Citizen]);
        state.player_mut(PlayerId(2)).unwrap().target = Some(PlayerId(3));
        state.kill(PlayerId(3));
        state.ledger.entry(PlayerId(3)).killed_by = Some(PlayerId(1));
        assert!(!win_condition(&state, PlayerId(2), Phase::Night));

        let exe = state.player_mut(PlayerId(2)).unwrap();
        exe.alive = false;
        exe.lynched = true;
        assert!(win_condition(&state, PlayerId(2), Phase::Day));
    }

    #[test]
    fn test_executioner_lynched_while_target_lives_loses() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Executioner, RoleKind::Citizen, RoleKind::Citizen]);
        state.player_mut(PlayerId(2)).unwrap().target = Some(PlayerId(3));
        let exe = state.player_mut(PlayerId(2)).unwrap();
        exe.alive = false;
        exe.lynched = true;
        assert!(!win_condition(&state, PlayerId(2), Phase::Day));
    }

    #[test]
    fn test_executioner_without_target_acts_as_jester() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Executioner, RoleKind::Citizen]);
        let exe = state.player_mut(PlayerId(2)).unwrap();
        exe.alive = false;
        exe.lynched = true;
        assert!(win_condition(&state, PlayerId(2), Phase::Day));
    }

    #[test]
    fn test_survivor_needs_to_be_alive() {
        let mut state = seat(&[RoleKind::Mafia, RoleKind::Survivor, RoleKind::Citizen]);
        assert!(win_condition(&state, PlayerId(2), Phase::Day));
        state.kill(PlayerId(2));
        assert!(!win_condition(&state, PlayerId(2), Phase::Day));
    }

    #[test]
    fn test_arsonist_last_standing_ends_game() {
        let mut state = seat(&[RoleKind::Arsonist, RoleKind::Mafia, RoleKind::Citizen]);
        state.kill(PlayerId(2));
        state.kill(PlayerId(3));
        // Citizens also "win" here (no mafia) but the arsonist is seated first.
        assert_eq!(check(&state, Phase::Night), Some(Trigger::WinCondition(RoleKind::Arsonist)));
        assert!(winners(&state, Phase::Night).contains(&PlayerId(1)));
    }

    #[test]
    fn test_trigger_describe() {
        let catalog = RoleCatalog::standard();
        assert_eq!(Trigger::WinCondition(RoleKind::Doctor).describe(&catalog), "The Citizens win");
        assert_eq!(Trigger::WinCondition(RoleKind::Janitor).describe(&catalog), "The Mafia win");
        assert_eq!(Trigger::WinCondition(RoleKind::Arsonist).describe(&catalog), "The Arsonist wins");
        assert_eq!(Trigger::MafiaExtinct.describe(&catalog), "The Citizens win");
    }
}
