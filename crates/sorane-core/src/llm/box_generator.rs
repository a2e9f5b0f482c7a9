//! BoxTextGenerator -- object-safe dynamic dispatch wrapper for TextGenerator.
//!
//! 1. Define an object-safe `TextGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `TextGeneratorDyn` for all `T: TextGenerator`
//! 3. `BoxTextGenerator` wraps `Box<dyn TextGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use sorane_types::llm::{Generation, GenerationRequest, GeneratorError};

use super::generator::TextGenerator;

/// Object-safe version of [`TextGenerator`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation is
/// provided for all types implementing `TextGenerator`.
pub trait TextGeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Generation, GeneratorError>> + Send + 'a>>;
}

impl<T: TextGenerator> TextGeneratorDyn for T {
    fn name(&self) -> &str {
        TextGenerator::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Generation, GeneratorError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased text backend for runtime selection.
///
/// Since `TextGenerator` uses RPITIT it cannot be a trait object directly;
/// `BoxTextGenerator` provides equivalent methods delegating to the inner
/// `TextGeneratorDyn` trait object.
pub struct BoxTextGenerator {
    inner: Box<dyn TextGeneratorDyn + Send + Sync>,
}

impl BoxTextGenerator {
    /// Wrap a concrete `TextGenerator` in a type-erased box.
    pub fn new<T: TextGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send one generation request and receive the completion text.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Generation, GeneratorError> {
        self.inner.generate_boxed(request).await
    }
}
