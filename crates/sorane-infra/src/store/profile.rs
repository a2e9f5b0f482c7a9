//! DashMap-backed profile store.

use dashmap::DashMap;

use sorane_core::session::ProfileStore;
use sorane_types::event::UserId;
use sorane_types::profile::{Profile, ProfileDelta};

/// Process-wide profile map, partitioned by user identity.
///
/// Entries are created lazily on first merge; reading an unknown user
/// yields the empty profile. Merges from concurrent messages by the same
/// user may interleave (read-modify-write under the entry lock is atomic
/// per call, but two calls can still land in either order) -- accepted
/// best-effort chat state.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<UserId, Profile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn snapshot(&self, user_id: &UserId) -> Profile {
        self.profiles
            .get(user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    fn merge(&self, user_id: &UserId, delta: ProfileDelta) {
        self.profiles
            .entry(user_id.clone())
            .or_default()
            .merge(delta);
    }
}
