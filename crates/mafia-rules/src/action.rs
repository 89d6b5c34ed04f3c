//! Actions, the requests that produce them, and a phase's submissions.

use std::collections::HashMap;
use std::time::Instant;

use mafia_protocol::{PlayerId, Prompt};
use serde::{Deserialize, Serialize};

/// What an action does when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Protect,
    Kill,
    Investigate,
    Disguise,
    Clean,
    Jail,
    Watch,
    Douse,
    Vest,
    Nominate,
    Vote,
    None,
}

/// One player's committed choice for a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub actor: PlayerId,
    pub kind: ActionKind,
    pub targets: Vec<PlayerId>,
    /// The answer to a confirmation step. `true` for pick-only actions.
    pub approve: bool,
    pub deadline: Instant,
}

impl Action {
    /// First target, if any.
    pub fn target(&self) -> Option<PlayerId> {
        self.targets.first().copied()
    }
}

/// One question in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Pick one of `options`. Picks within a request must be distinct.
    Pick {
        prompt: Prompt,
        options: Vec<PlayerId>,
    },
    /// Answer yes or no.
    Confirm { prompt: Prompt },
}

/// What a single player is asked to do this phase.
///
/// `targets` are fixed up front (the prisoner for an execution, the
/// nominee for a vote); picks are appended to them in step order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub actor: PlayerId,
    pub kind: ActionKind,
    pub targets: Vec<PlayerId>,
    pub steps: Vec<Step>,
}

impl ActionRequest {
    pub fn pick(actor: PlayerId, kind: ActionKind, prompt: Prompt, options: Vec<PlayerId>) -> Self {
        Self {
            actor,
            kind,
            targets: Vec::new(),
            steps: vec![Step::Pick { prompt, options }],
        }
    }

    pub fn confirm(actor: PlayerId, kind: ActionKind, prompt: Prompt, targets: Vec<PlayerId>) -> Self {
        Self {
            actor,
            kind,
            targets,
            steps: vec![Step::Confirm { prompt }],
        }
    }

    /// Builds the action once every step has been answered.
    pub fn complete(&self, picks: Vec<PlayerId>, approve: bool, deadline: Instant) -> Action {
        let mut targets = self.targets.clone();
        targets.extend(picks);
        Action {
            actor: self.actor,
            kind: self.kind,
            targets,
            approve,
            deadline,
        }
    }
}

/// The actions collected in one phase, at most one per actor.
#[derive(Debug, Clone, Default)]
pub struct Submissions {
    actions: HashMap<PlayerId, Action>,
}

impl Submissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `action`, replacing the actor's earlier one.
    pub fn insert(&mut self, action: Action) -> Option<Action> {
        self.actions.insert(action.actor, action)
    }

    pub fn get(&self, actor: PlayerId) -> Option<&Action> {
        self.actions.get(&actor)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    /// Actions of the given kind, in no particular order.
    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &Action> {
        self.actions.values().filter(move |a| a.kind == kind)
    }
}

impl FromIterator<Action> for Submissions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut submissions = Self::new();
        for action in iter {
            submissions.insert(action);
        }
        submissions
    }
}

impl IntoIterator for Submissions {
    type Item = Action;
    type IntoIter = std::collections::hash_map::IntoValues<PlayerId, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_appends_picks_after_fixed_targets() {
        let request = ActionRequest {
            actor: PlayerId(1),
            kind: ActionKind::Disguise,
            targets: vec![PlayerId(7)],
            steps: vec![],
        };
        let action = request.complete(vec![PlayerId(2), PlayerId(3)], true, Instant::now());
        assert_eq!(action.targets, vec![PlayerId(7), PlayerId(2), PlayerId(3)]);
        assert_eq!(action.target(), Some(PlayerId(7)));
    }

    #[test]
    fn test_submissions_latest_wins() {
        let now = Instant::now();
        let request = ActionRequest::pick(
            PlayerId(1),
            ActionKind::Protect,
            Prompt::Protect,
            vec![PlayerId(2), PlayerId(3)],
        );
        let mut submissions = Submissions::new();
        assert!(submissions.insert(request.complete(vec![PlayerId(2)], true, now)).is_none());
        assert!(submissions.insert(request.complete(vec![PlayerId(3)], true, now)).is_some());

        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions.get(PlayerId(1)).unwrap().target(), Some(PlayerId(3)));
    }

    #[test]
    fn test_of_kind_filters() {
        let now = Instant::now();
        let submissions: Submissions = [
            ActionRequest::pick(PlayerId(1), ActionKind::Jail, Prompt::Nominate, vec![])
                .complete(vec![PlayerId(2)], true, now),
            ActionRequest::pick(PlayerId(2), ActionKind::Nominate, Prompt::Nominate, vec![])
                .complete(vec![PlayerId(1)], true, now),
        ]
        .into_iter()
        .collect();
        assert_eq!(submissions.of_kind(ActionKind::Jail).count(), 1);
        assert_eq!(submissions.of_kind(ActionKind::Vote).count(), 0);
    }
}
