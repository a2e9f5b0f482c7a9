//! DashMap-backed conversation memory store.

use dashmap::DashMap;

use sorane_core::session::{MemoryStore, RECENT_TURN_WINDOW};
use sorane_types::event::UserId;
use sorane_types::turn::Turn;

/// Process-wide per-user turn history, capped at the prompt window.
///
/// Retaining more than [`RECENT_TURN_WINDOW`] turns would never be read,
/// so appends prune the oldest entries past the cap. Order is never
/// changed: turns stay in append order, oldest first.
#[derive(Default)]
pub struct InMemoryMemoryStore {
    turns: DashMap<UserId, Vec<Turn>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for InMemoryMemoryStore {
    fn recent(&self, user_id: &UserId, limit: usize) -> Vec<Turn> {
        let Some(entry) = self.turns.get(user_id) else {
            return Vec::new();
        };
        let history = entry.value();
        let skip = history.len().saturating_sub(limit);
        history[skip..].to_vec()
    }

    fn append(&self, user_id: &UserId, turn: Turn) {
        let mut history = self.turns.entry(user_id.clone()).or_default();
        history.push(turn);
        if history.len() > RECENT_TURN_WINDOW {
            let excess = history.len() - RECENT_TURN_WINDOW;
            history.drain(..excess);
        }
    }
}
