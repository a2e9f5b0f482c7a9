//! Session state and orchestration.

pub mod orchestrator;
pub mod store;

pub use orchestrator::SessionOrchestrator;
pub use store::{MemoryStore, ProfileStore};

/// How many recent turns are read when composing a prompt.
///
/// Stores may cap retained history at this window to bound memory; they
/// must never reorder turns.
pub const RECENT_TURN_WINDOW: usize = 5;
