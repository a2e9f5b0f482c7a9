//! Shared domain types for Sorane.
//!
//! This crate contains the core domain types used across the relay:
//! user identity, profile, conversation turns, generation requests, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod error;
pub mod event;
pub mod llm;
pub mod persona;
pub mod profile;
pub mod turn;
