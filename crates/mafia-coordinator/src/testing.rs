//! A scripted [`ChatSurface`] for tests.
//!
//! Answers come from per-player, per-prompt queues filled up front. A
//! prompt with nothing queued waits out the deadline and times out, the
//! same as a player who never answers. Everything the engine sends is
//! recorded for assertions.
//!
//! Answers can be pinned to a cycle with [`ScriptedSurface::choose_on`].
//! The surface follows the cycle from the `DayBegins` and `NightFalls`
//! notices it receives, so a pinned answer waits in its queue until that
//! day or night comes.
//!
//! Available in this crate's tests and, with the `testing` feature, to
//! other crates.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mafia_protocol::{Audience, Notice, PlayerId, Prompt, PromptKind, Reply};
use tokio::time::{self, Instant};

use crate::ChatSurface;

#[derive(Debug)]
struct Answer<T> {
    /// Only given during this cycle; any cycle if `None`.
    cycle: Option<u32>,
    delay: Duration,
    value: T,
}

type Queues<T> = HashMap<(PlayerId, PromptKind), VecDeque<Answer<T>>>;

#[derive(Debug, Default)]
struct Script {
    cycle: u32,
    choices: Queues<PlayerId>,
    reactions: Queues<bool>,
    notices: Vec<(Audience, Notice)>,
    prompts: Vec<(PlayerId, Prompt)>,
    provisioned: Vec<(PlayerId, String)>,
    torn_down: Vec<PlayerId>,
}

/// Removes the first answer usable in `cycle`.
fn take<T>(queues: &mut Queues<T>, key: (PlayerId, PromptKind), cycle: u32) -> Option<Answer<T>> {
    let queue = queues.get_mut(&key)?;
    let at = queue
        .iter()
        .position(|a| a.cycle.is_none_or(|c| c == cycle))?;
    queue.remove(at)
}

/// Test double that answers from a script and records all output.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    script: Mutex<Script>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_choice(&self, player: PlayerId, kind: PromptKind, answer: Answer<PlayerId>) -> &Self {
        self.lock()
            .choices
            .entry((player, kind))
            .or_default()
            .push_back(answer);
        self
    }

    fn push_reaction(&self, player: PlayerId, kind: PromptKind, answer: Answer<bool>) -> &Self {
        self.lock()
            .reactions
            .entry((player, kind))
            .or_default()
            .push_back(answer);
        self
    }

    /// Queues an immediate answer to `player`'s next `kind` choice.
    pub fn choose(&self, player: PlayerId, kind: PromptKind, choice: PlayerId) -> &Self {
        self.choose_after(player, kind, Duration::ZERO, choice)
    }

    /// Queues an answer given `delay` after the prompt is asked.
    pub fn choose_after(&self, player: PlayerId, kind: PromptKind, delay: Duration, choice: PlayerId) -> &Self {
        self.push_choice(
            player,
            kind,
            Answer {
                cycle: None,
                delay,
                value: choice,
            },
        )
    }

    /// Queues an immediate answer that is only given during `cycle`.
    pub fn choose_on(&self, cycle: u32, player: PlayerId, kind: PromptKind, choice: PlayerId) -> &Self {
        self.push_choice(
            player,
            kind,
            Answer {
                cycle: Some(cycle),
                delay: Duration::ZERO,
                value: choice,
            },
        )
    }

    /// Queues an immediate yes/no reaction.
    pub fn react(&self, player: PlayerId, kind: PromptKind, yes: bool) -> &Self {
        self.react_after(player, kind, Duration::ZERO, yes)
    }

    pub fn react_after(&self, player: PlayerId, kind: PromptKind, delay: Duration, yes: bool) -> &Self {
        self.push_reaction(
            player,
            kind,
            Answer {
                cycle: None,
                delay,
                value: yes,
            },
        )
    }

    pub fn react_on(&self, cycle: u32, player: PlayerId, kind: PromptKind, yes: bool) -> &Self {
        self.push_reaction(
            player,
            kind,
            Answer {
                cycle: Some(cycle),
                delay: Duration::ZERO,
                value: yes,
            },
        )
    }

    /// Every notice sent so far, in order.
    pub fn notices(&self) -> Vec<(Audience, Notice)> {
        self.lock().notices.clone()
    }

    /// Notices sent to exactly `audience`.
    pub fn notices_for(&self, audience: Audience) -> Vec<Notice> {
        self.lock()
            .notices
            .iter()
            .filter(|(a, _)| *a == audience)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Every prompt asked so far, in order.
    pub fn prompts(&self) -> Vec<(PlayerId, Prompt)> {
        self.lock().prompts.clone()
    }

    pub fn provisioned(&self) -> Vec<(PlayerId, String)> {
        self.lock().provisioned.clone()
    }

    pub fn torn_down(&self) -> Vec<PlayerId> {
        self.lock().torn_down.clone()
    }
}

/// Waits out the answer's delay, unless that runs past `deadline`.
async fn answer_after<T>(answer: Option<Answer<T>>, deadline: Instant) -> Reply<T> {
    match answer {
        Some(answer) if Instant::now() + answer.delay <= deadline => {
            time::sleep(answer.delay).await;
            Reply::Answered(answer.value)
        }
        _ => {
            time::sleep_until(deadline).await;
            Reply::Timeout
        }
    }
}

impl ChatSurface for ScriptedSurface {
    async fn notify(&self, audience: Audience, notice: Notice) {
        let mut script = self.lock();
        if let Notice::DayBegins { cycle, .. } | Notice::NightFalls { cycle } = notice {
            script.cycle = cycle;
        }
        script.notices.push((audience, notice));
    }

    async fn collect_choice(
        &self,
        player: PlayerId,
        prompt: Prompt,
        _options: Vec<PlayerId>,
        deadline: Instant,
    ) -> Reply<PlayerId> {
        let answer = {
            let mut script = self.lock();
            let cycle = script.cycle;
            let answer = take(&mut script.choices, (player, prompt.kind()), cycle);
            script.prompts.push((player, prompt));
            answer
        };
        answer_after(answer, deadline).await
    }

    async fn collect_reaction(&self, player: PlayerId, prompt: Prompt, deadline: Instant) -> Reply<bool> {
        let answer = {
            let mut script = self.lock();
            let cycle = script.cycle;
            let answer = take(&mut script.reactions, (player, prompt.kind()), cycle);
            script.prompts.push((player, prompt));
            answer
        };
        answer_after(answer, deadline).await
    }

    async fn provision_player_channel(&self, player: PlayerId, role_name: &str) {
        self.lock().provisioned.push((player, role_name.to_owned()));
    }

    async fn teardown_channel(&self, player: PlayerId) {
        self.lock().torn_down.push(player);
    }
}
