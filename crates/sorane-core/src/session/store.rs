//! Profile and memory store traits.
//!
//! Process-wide keyed state, partitioned by user identity. The traits
//! isolate the orchestrator from the storage choice; in-memory
//! implementations live in sorane-infra, and a deployment wanting
//! durability swaps in a write-through implementation behind the same
//! interface.
//!
//! Operations must be non-blocking and bounded-time: the orchestrator
//! calls them inline between backend calls. Mutations are read-modify-write
//! per user; concurrent messages from the same user may interleave, and a
//! lost update there is an accepted degradation of best-effort chat state,
//! not a safety violation.

use sorane_types::event::UserId;
use sorane_types::profile::{Profile, ProfileDelta};
use sorane_types::turn::Turn;

/// Keyed store of per-user profiles.
///
/// A user's profile exists lazily: reading an unknown user yields the
/// empty profile, and the first merge creates the entry.
pub trait ProfileStore: Send + Sync {
    /// Current profile for a user (empty if never seen).
    fn snapshot(&self, user_id: &UserId) -> Profile;

    /// Fold a delta into a user's profile per [`Profile::merge`] semantics.
    fn merge(&self, user_id: &UserId, delta: ProfileDelta);
}

/// Keyed store of per-user conversation history.
pub trait MemoryStore: Send + Sync {
    /// The most recent `limit` turns for a user, oldest first.
    fn recent(&self, user_id: &UserId, limit: usize) -> Vec<Turn>;

    /// Append a completed turn to a user's history.
    ///
    /// Implementations may prune turns older than
    /// [`super::RECENT_TURN_WINDOW`] but must preserve order.
    fn append(&self, user_id: &UserId, turn: Turn);
}
