//! Infrastructure layer for Sorane.
//!
//! Contains implementations of the traits defined in `sorane-core`:
//! DashMap-backed in-memory stores, the HuggingFace inference client, the
//! LINE messaging adapter, plus configuration and secret loading.

pub mod config;
pub mod llm;
pub mod messaging;
pub mod secret;
pub mod store;
