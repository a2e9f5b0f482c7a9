//! In-memory keyed state stores.
//!
//! Process-lifetime implementations of the store traits from
//! `sorane-core`, backed by `DashMap`. A deployment wanting durability
//! swaps in a persistent implementation behind the same traits.

pub mod memory;
pub mod profile;

pub use memory::InMemoryMemoryStore;
pub use profile::InMemoryProfileStore;
