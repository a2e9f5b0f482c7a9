//! Application state wiring the relay together.
//!
//! AppState holds the session orchestrator used by the webhook handler.
//! The orchestrator is generic over store traits, but AppState pins it to
//! the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use sorane_core::delivery::DeliveryScheduler;
use sorane_core::llm::BoxTextGenerator;
use sorane_core::messaging::BoxMessagePort;
use sorane_core::session::SessionOrchestrator;
use sorane_infra::config::{self, SoraneConfig};
use sorane_infra::llm::HuggingFaceGenerator;
use sorane_infra::messaging::LineMessagePort;
use sorane_infra::secret::secret_from_env;
use sorane_infra::store::{InMemoryMemoryStore, InMemoryProfileStore};

/// Orchestrator generics pinned to the concrete infra implementations.
pub type ConcreteOrchestrator = SessionOrchestrator<InMemoryProfileStore, InMemoryMemoryStore>;

/// Shared application state holding the orchestrator.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
}

impl AppState {
    /// Initialize the application state: load config, wire services.
    ///
    /// The config path comes from `SORANE_CONFIG` (default `sorane.toml`);
    /// a missing or malformed file falls back to defaults. Secrets must be
    /// present in the environment or startup fails.
    pub async fn init() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("SORANE_CONFIG").unwrap_or_else(|_| "sorane.toml".to_string());
        let config = config::load_config(&PathBuf::from(config_path)).await;
        Self::from_config(config)
    }

    /// Wire services from an already-loaded config.
    pub fn from_config(config: SoraneConfig) -> anyhow::Result<Self> {
        let hf_token = secret_from_env("SORANE_HF_TOKEN")
            .context("SORANE_HF_TOKEN must be set to the backend API token")?;
        let channel_token = secret_from_env("SORANE_CHANNEL_TOKEN")
            .context("SORANE_CHANNEL_TOKEN must be set to the channel access token")?;

        let timeout = Duration::from_secs(config.backend.request_timeout_secs);

        let generator = Arc::new(BoxTextGenerator::new(HuggingFaceGenerator::new(
            hf_token,
            config.backend.endpoint.clone(),
            // The response label is the completion marker the prompt ends
            // with; the client recovers the reply as the text after it.
            config.persona.response_label.clone(),
            timeout,
        )));
        let port = Arc::new(BoxMessagePort::new(LineMessagePort::new(
            channel_token,
            timeout,
        )));
        let scheduler =
            DeliveryScheduler::with_pace(port, Duration::from_millis(config.delivery.pace_ms));

        let orchestrator = SessionOrchestrator::new(
            generator,
            InMemoryProfileStore::new(),
            InMemoryMemoryStore::new(),
            config.persona,
            scheduler,
            config.sampling.chat,
            config.sampling.extraction,
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
        })
    }
}
