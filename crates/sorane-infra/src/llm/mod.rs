//! Text backend clients.

pub mod huggingface;

pub use huggingface::HuggingFaceGenerator;
