//! The setup token: a compact, shareable encoding of a game setup.
//!
//! After a game is configured the adapter shows players a short token.
//! Passing it back to the start command replays the same setup without
//! going through configuration again.
//!
//! # Format
//!
//! Lowercase hex of a byte string:
//!
//! ```text
//! ┌──────────┬─────────────┬─────────────┬───────────────────────┐
//! │ mafia    │ min players │ max players │ role id, role id, ... │
//! │ (1 byte) │ (1 byte)    │ (1 byte)    │ (1 byte each)         │
//! └──────────┴─────────────┴─────────────┴───────────────────────┘
//! ```
//!
//! Role ids are opaque here; the rules layer maps them onto its catalog
//! and rejects ids it does not know.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Number of fixed header bytes before the role ids.
const HEADER_LEN: usize = 3;

/// A decoded setup token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupToken {
    /// Total mafia, special mafia included.
    pub mafia_count: u8,
    pub min_players: u8,
    pub max_players: u8,
    /// One catalog id per special role instance, in configuration order.
    pub roles: Vec<u8>,
}

impl SetupToken {
    /// Encodes the token as lowercase hex.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity((HEADER_LEN + self.roles.len()) * 2);
        let header = [self.mafia_count, self.min_players, self.max_players];
        for byte in header.iter().chain(self.roles.iter()) {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    /// Decodes a token produced by [`encode`](Self::encode).
    ///
    /// Surrounding whitespace is ignored and upper-case hex is accepted.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedToken`] if the input is not an
    /// even-length hex string of at least three bytes.
    pub fn decode(token: &str) -> Result<Self, ProtocolError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ProtocolError::MalformedToken("empty token".into()));
        }
        // `from_str_radix` alone would accept a leading sign.
        if let Some(i) = token.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(ProtocolError::MalformedToken(format!(
                "invalid hex at offset {i}"
            )));
        }
        if token.len() % 2 != 0 {
            return Err(ProtocolError::MalformedToken(format!(
                "odd token length {}",
                token.len()
            )));
        }

        let bytes = (0..token.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&token[i..i + 2], 16).map_err(|_| {
                    ProtocolError::MalformedToken(format!(
                        "invalid hex at offset {i}"
                    ))
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        if bytes.len() < HEADER_LEN {
            return Err(ProtocolError::MalformedToken(format!(
                "token holds {} bytes, need at least {HEADER_LEN}",
                bytes.len()
            )));
        }

        Ok(Self {
            mafia_count: bytes[0],
            min_players: bytes[1],
            max_players: bytes[2],
            roles: bytes[HEADER_LEN..].to_vec(),
        })
    }
}

impl fmt::Display for SetupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for SetupToken {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
