//! Generation request/response types for the text backend.
//!
//! The backend is treated as an opaque capability: given a prompt and a
//! fixed sampling configuration, return text or fail. Sampling configs are
//! per-deployment, not per-user.

use serde::{Deserialize, Serialize};

/// Sampling configuration for one class of backend call.
///
/// Two fixed configurations exist per deployment: a creative one for chat
/// generation and a deterministic-leaning one for profile extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub max_new_tokens: u32,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::chat()
    }
}

impl SamplingConfig {
    /// Creative configuration for persona chat replies.
    pub fn chat() -> Self {
        Self {
            temperature: 0.8,
            max_new_tokens: 200,
            top_p: 0.95,
            stop_sequences: None,
        }
    }

    /// Deterministic-leaning, short-output configuration for structured
    /// extraction calls.
    pub fn extraction() -> Self {
        Self {
            temperature: 0.0,
            max_new_tokens: 160,
            top_p: 1.0,
            stop_sequences: None,
        }
    }
}

/// A single prompt sent to the text backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub sampling: SamplingConfig,
}

/// A successful completion from the text backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
}

/// Errors from text backend calls.
///
/// The orchestrator does not distinguish sub-causes; it only needs to know
/// generation failed. The variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("backend request failed: {0}")]
    Http(String),

    #[error("backend request timed out")]
    Timeout,

    #[error("backend returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("backend returned an empty completion")]
    EmptyCompletion,
}
