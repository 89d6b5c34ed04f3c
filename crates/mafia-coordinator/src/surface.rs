//! The chat platform hook.
//!
//! The engine never talks to a chat platform directly. It calls the
//! [`ChatSurface`] trait, which the hosting adapter implements on top of
//! whatever it has: channels and reactions, direct messages, a web UI.
//!
//! # Contract
//!
//! - `collect_choice` and `collect_reaction` return at the latest at
//!   `deadline`, with [`Reply::Timeout`] if the player did not answer.
//!   They are called again after every answer, so a player can revise a
//!   choice until the phase ends.
//! - Validation is the engine's job: the adapter may return any player id
//!   and the engine re-asks if it is not one of `options`.
//! - Delivery failures are the adapter's to log; the engine does not
//!   retry notices.

use std::future::Future;

use mafia_protocol::{Audience, Notice, PlayerId, Prompt, Reply};
use tokio::time::Instant;

/// Everything the engine needs from the chat platform.
///
/// `Send + Sync + 'static` because one surface is shared by every
/// solicitation task of a game.
///
/// # Example
///
/// ```rust
/// use mafia_coordinator::ChatSurface;
/// use mafia_protocol::{Audience, Notice, PlayerId, Prompt, Reply};
/// use tokio::time::Instant;
///
/// /// Prints notices and never answers.
/// struct Console;
///
/// impl ChatSurface for Console {
///     async fn notify(&self, audience: Audience, notice: Notice) {
///         println!("{audience:?}: {notice:?}");
///     }
///
///     async fn collect_choice(
///         &self,
///         _player: PlayerId,
///         _prompt: Prompt,
///         _options: Vec<PlayerId>,
///         deadline: Instant,
///     ) -> Reply<PlayerId> {
///         tokio::time::sleep_until(deadline).await;
///         Reply::Timeout
///     }
///
///     async fn collect_reaction(
///         &self,
///         _player: PlayerId,
///         _prompt: Prompt,
///         deadline: Instant,
///     ) -> Reply<bool> {
///         tokio::time::sleep_until(deadline).await;
///         Reply::Timeout
///     }
///
///     async fn provision_player_channel(&self, _player: PlayerId, _role_name: &str) {}
///
///     async fn teardown_channel(&self, _player: PlayerId) {}
/// }
/// ```
pub trait ChatSurface: Send + Sync + 'static {
    /// Delivers a notice to an audience.
    fn notify(&self, audience: Audience, notice: Notice) -> impl Future<Output = ()> + Send;

    /// Asks `player` to pick one of `options`.
    fn collect_choice(
        &self,
        player: PlayerId,
        prompt: Prompt,
        options: Vec<PlayerId>,
        deadline: Instant,
    ) -> impl Future<Output = Reply<PlayerId>> + Send;

    /// Asks `player` a yes/no question.
    fn collect_reaction(
        &self,
        player: PlayerId,
        prompt: Prompt,
        deadline: Instant,
    ) -> impl Future<Output = Reply<bool>> + Send;

    /// Creates `player`'s private channel for a game.
    fn provision_player_channel(&self, player: PlayerId, role_name: &str) -> impl Future<Output = ()> + Send;

    /// Removes `player`'s private channel.
    fn teardown_channel(&self, player: PlayerId) -> impl Future<Output = ()> + Send;
}
