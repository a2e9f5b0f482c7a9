//! Inbound event types.
//!
//! The webhook dispatcher reduces every platform event to an
//! [`InboundMessage`] before handing it to the session orchestrator.
//! Non-text events never reach these types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque stable key identifying a message sender across turns.
///
/// Supplied by the messaging platform; all per-user state (profile,
/// conversation memory) is partitioned by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Single-use token bound to one inbound event's synchronous reply channel.
///
/// Deliberately not `Clone`: the delivery scheduler consumes the token by
/// value, so the type system guarantees at most one reply per event.
/// The token value is platform-opaque and is never logged.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyToken(String);

impl ReplyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One inbound text message, as handed from the webhook dispatcher to the
/// session orchestrator.
#[derive(Debug)]
pub struct InboundMessage {
    pub user_id: UserId,
    pub text: String,
    pub reply_token: ReplyToken,
}
