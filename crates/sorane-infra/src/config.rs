//! Configuration loader for Sorane.
//!
//! Reads `sorane.toml` (path supplied by the caller, usually from the
//! `SORANE_CONFIG` env var) and deserializes it into [`SoraneConfig`].
//! Falls back to sensible defaults when the file is missing or malformed.
//! Secrets never live here; they come from the environment via
//! [`crate::secret`].

use std::path::Path;

use serde::Deserialize;

use sorane_types::llm::SamplingConfig;
use sorane_types::persona::Persona;

/// Full deployment configuration.
///
/// Every section has a default, so an empty or absent file yields a
/// runnable configuration with the stock persona.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SoraneConfig {
    pub persona: Persona,
    pub backend: BackendConfig,
    pub sampling: SamplingSection,
    pub delivery: DeliveryConfig,
}

/// Text backend endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Full inference URL of the hosted model.
    pub endpoint: String,
    /// Request timeout for backend calls; a timeout is treated as the
    /// backend being unavailable.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint:
                "https://api-inference.huggingface.co/models/deepseek-ai/deepseek-llm-7b-chat"
                    .to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// The two fixed per-deployment sampling configurations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingSection {
    /// Creative config for persona chat replies.
    pub chat: SamplingConfig,
    /// Deterministic-leaning config for profile extraction.
    pub extraction: SamplingConfig,
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            chat: SamplingConfig::chat(),
            extraction: SamplingConfig::extraction(),
        }
    }
}

/// Paced delivery settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Pacing interval between scheduled push chunks, in milliseconds.
    pub pace_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self { pace_ms: 1500 }
    }
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`SoraneConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: &Path) -> SoraneConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return SoraneConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return SoraneConfig::default();
        }
    };

    match toml::from_str::<SoraneConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            SoraneConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("sorane.toml")).await;
        assert_eq!(config.delivery.pace_ms, 1500);
        assert_eq!(config.persona.response_label, "空音：");
        assert_eq!(config.sampling.extraction.temperature, 0.0);
    }

    #[tokio::test]
    async fn valid_toml_overrides_selected_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sorane.toml");
        tokio::fs::write(
            &path,
            r#"
[persona]
response_label = "月見："
fallback_reply = "……先等我一下。"

[backend]
request_timeout_secs = 10

[sampling.chat]
temperature = 0.6

[delivery]
pace_ms = 2000
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.persona.response_label, "月見：");
        assert_eq!(config.persona.input_label, Persona::default().input_label);
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.backend.endpoint, BackendConfig::default().endpoint);
        assert_eq!(config.sampling.chat.temperature, 0.6);
        assert_eq!(config.sampling.extraction.temperature, 0.0);
        assert_eq!(config.delivery.pace_ms, 2000);
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sorane.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.delivery.pace_ms, 1500);
    }
}
