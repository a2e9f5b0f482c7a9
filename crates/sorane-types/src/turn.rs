//! Conversation turn types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (input, response) exchange.
///
/// Immutable once appended to a user's history. Failed exchanges are never
/// recorded as turns, so history only ever contains real responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The exact inbound text for this exchange.
    pub input: String,
    /// The exact generated response text.
    pub response: String,
    pub exchanged_at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            response: response.into(),
            exchanged_at: Utc::now(),
        }
    }
}
