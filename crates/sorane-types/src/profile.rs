//! Per-user profile types and merge semantics.
//!
//! A [`Profile`] accumulates structured facts about one user across turns.
//! The profile extractor produces a [`ProfileDelta`] per inbound message;
//! [`Profile::merge`] folds the delta in: `name` and `location` are
//! last-write-wins, `likes` and `tags` are deduplicated unions.

use serde::{Deserialize, Serialize};

/// Accumulated structured facts about one user.
///
/// Created lazily with all fields empty on a user's first message and
/// mutated only through [`Profile::merge`]. Absent fields are represented
/// as `None` / empty vectors, never as panicking placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Last self-reported name.
    pub name: Option<String>,
    /// Accumulated interests, deduplicated, in first-mention order.
    pub likes: Vec<String>,
    /// Last-known location (overwritten, not accumulated).
    pub location: Option<String>,
    /// Accumulated free-form tags, deduplicated.
    pub tags: Vec<String>,
}

impl Profile {
    /// Whether no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.likes.is_empty() && self.location.is_none() && self.tags.is_empty()
    }

    /// Fold a delta into this profile.
    ///
    /// `name`/`location` overwrite only when the delta value is non-empty
    /// after trimming. `likes`/`tags` append members not already present,
    /// so repeated mentions are idempotent.
    pub fn merge(&mut self, delta: ProfileDelta) {
        if let Some(name) = non_empty(delta.name) {
            self.name = Some(name);
        }
        if let Some(location) = non_empty(delta.location) {
            self.location = Some(location);
        }
        union_into(&mut self.likes, delta.likes);
        union_into(&mut self.tags, delta.tags);
    }
}

/// New information extracted from a single message.
///
/// Same shape as [`Profile`]; the default value means "no new information"
/// and merging it is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDelta {
    pub name: Option<String>,
    pub likes: Vec<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
}

impl ProfileDelta {
    /// Whether merging this delta would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.likes.is_empty() && self.location.is_none() && self.tags.is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn union_into(existing: &mut Vec<String>, incoming: Vec<String>) {
    for item in incoming {
        let item = item.trim().to_string();
        if !item.is_empty() && !existing.contains(&item) {
            existing.push(item);
        }
    }
}
