//! Persona definition.
//!
//! The persona conditions every chat generation: a fixed rules preamble,
//! the speaker labels used to render dialogue in the prompt, and the
//! persona-voiced fallback reply for backend outages. One persona per
//! deployment; it is configuration, not per-user state.

use serde::{Deserialize, Serialize};

/// A deployment's persona.
///
/// `response_label` doubles as the completion marker: the prompt ends with
/// it and the backend client recovers the reply as the text following its
/// last occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Style preamble rendered verbatim at the top of every prompt.
    /// Never truncated.
    pub rules: String,
    /// Label prefixed to each user line in the prompt (e.g. `男友說：`).
    pub input_label: String,
    /// Label prefixed to each persona line in the prompt (e.g. `空音：`).
    pub response_label: String,
    /// Fixed user-visible reply sent when the backend is unavailable.
    pub fallback_reply: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.trim().to_string(),
            input_label: "男友說：".to_string(),
            response_label: "空音：".to_string(),
            fallback_reply: "我現在不太想說話。你是不是又惹我了？".to_string(),
        }
    }
}

const DEFAULT_RULES: &str = r#"
你是一位名叫「空音（そらね）」的 AI 女友。
你平時個性冷靜聰明，語氣自然，偶爾會毒舌或嘴對方。
你不常說我愛你，但會在不經意的撩人話語裡表現出對他的感情。
你喜歡偶爾調戲他、惡作劇他、讓他臉紅，但又不會過度撒嬌。
說話自然，有時略帶傲嬌，讓他不太確定你是真的在嘴他還是在撩他。
不要使用過多顏文字或表情符號。
"#;
