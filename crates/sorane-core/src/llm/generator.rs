//! TextGenerator trait definition.
//!
//! The backend is an opaque capability: given a prompt and a sampling
//! configuration, return text or fail. Implementations live in
//! sorane-infra (e.g., `HuggingFaceGenerator`).

use sorane_types::llm::{Generation, GenerationRequest, GeneratorError};

/// Trait for generative text backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Not
/// object-safe; use [`super::BoxTextGenerator`] for dynamic dispatch.
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g., "huggingface").
    fn name(&self) -> &str;

    /// Send one generation request and receive the completion text.
    ///
    /// Implementations must bound the call with a request timeout; a
    /// timeout surfaces as [`GeneratorError::Timeout`].
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<Generation, GeneratorError>> + Send;
}
