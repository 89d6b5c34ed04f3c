//! Shared vocabulary for the Mafia engine.
//!
//! This crate defines the "language" the engine speaks with the chat
//! platform adapter that hosts it:
//!
//! - **Types** ([`PlayerId`], [`GameId`], [`Audience`], [`Phase`]):
//!   who is addressed and when.
//! - **Messages** ([`Prompt`], [`Notice`], [`Reply`]): what the engine
//!   asks players and what it tells them.
//! - **Setup token** ([`SetupToken`]): the compact, replayable encoding
//!   of a game setup.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how an adapter turns
//!   prompts and notices into bytes if it needs to.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about roles, rules, or timing. It only
//! names things so every other crate agrees on them.
//!
//! ```text
//! Adapter (chat platform) ⇄ Protocol (Prompt / Notice) ⇄ Engine (rules)
//! ```

mod codec;
mod error;
mod message;
mod token;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{Notice, Prompt, PromptKind, Reply, Reveal};
pub use token::SetupToken;
pub use types::{Audience, GameId, Phase, PlayerId};
