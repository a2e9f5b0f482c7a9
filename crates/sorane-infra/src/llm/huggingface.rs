//! HuggingFaceGenerator -- concrete [`TextGenerator`] for the HuggingFace
//! inference API.
//!
//! Sends `{"inputs": ..., "parameters": ...}` to a hosted model endpoint
//! and parses the `[{"generated_text": ...}]` response. The API echoes the
//! prompt in front of the completion, so the reply is recovered as the
//! text after the last occurrence of the completion marker (the persona's
//! response label, which the prompt always ends with).
//!
//! The API token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sorane_core::llm::TextGenerator;
use sorane_types::llm::{Generation, GenerationRequest, GeneratorError};

/// HuggingFace inference API text backend.
pub struct HuggingFaceGenerator {
    client: reqwest::Client,
    token: SecretString,
    endpoint: String,
    completion_marker: String,
}

impl HuggingFaceGenerator {
    /// Create a new generator for one hosted model endpoint.
    ///
    /// `completion_marker` is the label the prompt ends with; everything
    /// the model produced after its last occurrence is the reply.
    pub fn new(
        token: SecretString,
        endpoint: String,
        completion_marker: String,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            endpoint,
            completion_marker,
        }
    }
}

#[derive(Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters<'a>,
}

#[derive(Serialize)]
struct HfParameters<'a> {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    /// The prompt echo is required: completion recovery splits on the
    /// marker inside the full text.
    return_full_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct HfCompletion {
    generated_text: String,
}

fn to_hf_request(request: &GenerationRequest) -> HfRequest<'_> {
    HfRequest {
        inputs: &request.prompt,
        parameters: HfParameters {
            max_new_tokens: request.sampling.max_new_tokens,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            return_full_text: true,
            stop: request.sampling.stop_sequences.as_deref(),
        },
    }
}

/// Recover the reply from the echoed full text: the trimmed tail after
/// the last occurrence of the marker.
fn recover_completion(full_text: &str, marker: &str) -> Result<String, GeneratorError> {
    let tail = match full_text.rfind(marker) {
        Some(index) => &full_text[index + marker.len()..],
        None => {
            return Err(GeneratorError::MalformedResponse(format!(
                "completion marker {marker:?} not found in generated text"
            )));
        }
    };

    let text = tail.trim();
    if text.is_empty() {
        return Err(GeneratorError::EmptyCompletion);
    }
    Ok(text.to_string())
}

impl TextGenerator for HuggingFaceGenerator {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GeneratorError> {
        let body = to_hf_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let completions: Vec<HfCompletion> = response
            .json()
            .await
            .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

        let first = completions
            .into_iter()
            .next()
            .ok_or(GeneratorError::EmptyCompletion)?;

        let text = recover_completion(&first.generated_text, &self.completion_marker)?;
        Ok(Generation { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorane_types::llm::SamplingConfig;

    #[test]
    fn recovers_text_after_last_marker() {
        let full = "男友說：早安\n空音：嗯，早。\n\n男友說：想我嗎\n空音：誰想你啊。";
        let text = recover_completion(full, "空音：").unwrap();
        assert_eq!(text, "誰想你啊。");
    }

    #[test]
    fn missing_marker_is_malformed() {
        let err = recover_completion("some unrelated text", "空音：").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }

    #[test]
    fn empty_tail_is_empty_completion() {
        let err = recover_completion("男友說：喂\n空音：  ", "空音：").unwrap_err();
        assert!(matches!(err, GeneratorError::EmptyCompletion));
    }

    #[test]
    fn request_body_carries_sampling_parameters() {
        let request = GenerationRequest {
            prompt: "prompt text".to_string(),
            sampling: SamplingConfig {
                temperature: 0.8,
                max_new_tokens: 200,
                top_p: 0.95,
                stop_sequences: None,
            },
        };

        let value = serde_json::to_value(to_hf_request(&request)).unwrap();
        assert_eq!(value["inputs"], "prompt text");
        assert_eq!(value["parameters"]["max_new_tokens"], 200);
        assert_eq!(value["parameters"]["temperature"], 0.8);
        assert_eq!(value["parameters"]["return_full_text"], true);
        assert!(value["parameters"].get("stop").is_none());
    }

    #[test]
    fn stop_sequences_serialize_when_present() {
        let request = GenerationRequest {
            prompt: "p".to_string(),
            sampling: SamplingConfig {
                stop_sequences: Some(vec!["男友說：".to_string()]),
                ..SamplingConfig::chat()
            },
        };

        let value = serde_json::to_value(to_hf_request(&request)).unwrap();
        assert_eq!(value["parameters"]["stop"][0], "男友說：");
    }
}
