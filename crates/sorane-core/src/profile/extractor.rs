//! Profile extraction via the text backend.
//!
//! `ProfileExtractor` issues one low-temperature backend call per inbound
//! message, asking for a fixed-schema JSON object describing any new
//! personal details. It never fails: backend errors and unparsable output
//! both collapse to the empty delta, so extraction can never block the
//! conversation flow.

use sorane_types::llm::{GenerationRequest, SamplingConfig};
use sorane_types::profile::ProfileDelta;

use crate::llm::BoxTextGenerator;

/// Instruction preamble for the extraction call.
///
/// The backend is a raw completion API, so the schema and rules are spelled
/// out in the prompt and the message is appended after it.
const EXTRACTION_PROMPT: &str = r#"You are a profile extraction assistant. Read one message a user sent to their chat companion and extract any new personal details about the user.

Rules:
1. Extract ONLY details stated in the message itself
2. Do NOT guess or infer details that are not explicit
3. "name" is the user's own name, only if they state it (e.g. 我叫小明)
4. "likes" are interests or things the user says they enjoy
5. "location" is where the user says they are or live
6. "tags" are short descriptive labels the message supports (e.g. "夜貓子")

Return a single JSON object with exactly these fields:
- "name": string or null
- "likes": array of strings
- "location": string or null
- "tags": array of strings

If the message contains no new details, return:
{"name": null, "likes": [], "location": null, "tags": []}

Message:"#;

/// Stateless utility extracting a [`ProfileDelta`] from one message.
pub struct ProfileExtractor;

impl ProfileExtractor {
    /// Extract new profile details from `text`.
    ///
    /// Issues exactly one backend call with the deployment's extraction
    /// sampling config (low temperature, small output budget). Any backend
    /// or parse failure logs a warning and yields the empty delta -- "no
    /// new information", not an error.
    #[tracing::instrument(
        name = "extract_profile",
        skip(generator, text, sampling),
        fields(backend = generator.name(), input_len = text.len())
    )]
    pub async fn extract(
        generator: &BoxTextGenerator,
        text: &str,
        sampling: &SamplingConfig,
    ) -> ProfileDelta {
        if text.trim().is_empty() {
            return ProfileDelta::default();
        }

        let request = GenerationRequest {
            prompt: format!("{EXTRACTION_PROMPT}\n{text}\n\nJSON:"),
            sampling: sampling.clone(),
        };

        let generation = match generator.generate(&request).await {
            Ok(generation) => generation,
            Err(error) => {
                tracing::warn!(error = %error, "profile extraction call failed; keeping profile unchanged");
                return ProfileDelta::default();
            }
        };

        parse_delta(&generation.text)
    }
}

/// Parse the backend's output into a delta, tolerating prose and code
/// fences around the JSON object. Anything unparsable is the empty delta.
fn parse_delta(raw: &str) -> ProfileDelta {
    let Some(json) = outermost_object(raw) else {
        tracing::warn!(
            content_preview = preview(raw),
            "extraction output contained no JSON object; keeping profile unchanged"
        );
        return ProfileDelta::default();
    };

    match serde_json::from_str(json) {
        Ok(delta) => delta,
        Err(error) => {
            tracing::warn!(
                error = %error,
                content_preview = preview(raw),
                "failed to parse extraction JSON; keeping profile unchanged"
            );
            ProfileDelta::default()
        }
    }
}

/// Slice from the first `{` to the last `}`, if both exist in order.
fn outermost_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn preview(raw: &str) -> &str {
    let end = raw
        .char_indices()
        .take(80)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorane_types::llm::{Generation, GeneratorError};

    use crate::llm::TextGenerator;

    struct CannedGenerator {
        output: Result<String, ()>,
    }

    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Generation, GeneratorError> {
            match &self.output {
                Ok(text) => Ok(Generation { text: text.clone() }),
                Err(()) => Err(GeneratorError::Timeout),
            }
        }
    }

    fn canned(output: &str) -> BoxTextGenerator {
        BoxTextGenerator::new(CannedGenerator {
            output: Ok(output.to_string()),
        })
    }

    #[tokio::test]
    async fn extracts_name_from_clean_json() {
        let generator = canned(r#"{"name": "小明", "likes": [], "location": null, "tags": []}"#);
        let delta = ProfileExtractor::extract(&generator, "我叫小明", &SamplingConfig::extraction()).await;
        assert_eq!(delta.name.as_deref(), Some("小明"));
        assert!(delta.likes.is_empty());
    }

    #[tokio::test]
    async fn tolerates_json_wrapped_in_prose_and_fences() {
        let generator = canned(
            "Sure, here is the extraction:\n```json\n{\"name\": null, \"likes\": [\"咖啡\"], \"location\": \"台北\", \"tags\": []}\n```",
        );
        let delta = ProfileExtractor::extract(&generator, "我在台北喝咖啡", &SamplingConfig::extraction()).await;
        assert_eq!(delta.likes, vec!["咖啡"]);
        assert_eq!(delta.location.as_deref(), Some("台北"));
    }

    #[tokio::test]
    async fn garbage_output_yields_empty_delta() {
        let generator = canned("我有點搞不懂你在說什麼呢。");
        let delta = ProfileExtractor::extract(&generator, "隨便說說", &SamplingConfig::extraction()).await;
        assert!(delta.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_yields_empty_delta() {
        // Braces are present but the field type is wrong.
        let generator = canned(r#"{"likes": "咖啡"}"#);
        let delta = ProfileExtractor::extract(&generator, "我喜歡咖啡", &SamplingConfig::extraction()).await;
        assert!(delta.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_yields_empty_delta() {
        let generator = BoxTextGenerator::new(CannedGenerator { output: Err(()) });
        let delta = ProfileExtractor::extract(&generator, "我叫小明", &SamplingConfig::extraction()).await;
        assert!(delta.is_empty());
    }

    #[tokio::test]
    async fn blank_input_skips_backend_call() {
        // A failing generator proves no call was made.
        let generator = BoxTextGenerator::new(CannedGenerator { output: Err(()) });
        let delta = ProfileExtractor::extract(&generator, "   ", &SamplingConfig::extraction()).await;
        assert!(delta.is_empty());
    }

    #[test]
    fn outermost_object_spans_first_to_last_brace() {
        assert_eq!(outermost_object("x {\"a\": {}} y"), Some("{\"a\": {}}"));
        assert_eq!(outermost_object("no braces"), None);
        assert_eq!(outermost_object("} reversed {"), None);
    }
}
