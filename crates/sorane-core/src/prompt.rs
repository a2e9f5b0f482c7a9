//! Prompt composition.
//!
//! Assembles the single prompt string sent to the text backend from the
//! persona rules, a profile snapshot, recent turns, and the new input.
//! Pure function of its inputs -- no side effects, no backend calls.
//!
//! Layout:
//! ```text
//! {persona rules}
//!
//! ［關於他的已知資訊］
//! 名字：...
//! 喜歡：...
//!
//! ［最近的對話］
//! 男友說：...
//! 空音：...
//!
//! 男友說：{input}
//! 空音：
//! ```
//!
//! The trailing response label is the completion marker the backend
//! continues from. Persona rules are rendered verbatim and are never
//! truncated; if a truncation policy is ever added it must drop oldest
//! turns first, never profile fields.

use sorane_types::persona::Persona;
use sorane_types::profile::Profile;
use sorane_types::turn::Turn;

const PROFILE_HEADER: &str = "［關於他的已知資訊］";
const MEMORY_HEADER: &str = "［最近的對話］";
const LIST_SEPARATOR: &str = "、";

/// Compose the prompt for one generation.
///
/// `recent_turns` must already be windowed to the last K turns in
/// chronological order (oldest first); the composer renders what it is
/// given. Only non-empty profile fields are rendered, one line each.
pub fn compose(persona: &Persona, profile: &Profile, recent_turns: &[Turn], input: &str) -> String {
    let mut sections = Vec::with_capacity(4);

    sections.push(persona.rules.trim().to_string());

    if !profile.is_empty() {
        sections.push(profile_section(profile));
    }

    if !recent_turns.is_empty() {
        sections.push(memory_section(persona, recent_turns));
    }

    sections.push(format!(
        "{}{}\n{}",
        persona.input_label, input, persona.response_label
    ));

    sections.join("\n\n")
}

fn profile_section(profile: &Profile) -> String {
    let mut lines = vec![PROFILE_HEADER.to_string()];

    if let Some(name) = &profile.name {
        lines.push(format!("名字：{name}"));
    }
    if !profile.likes.is_empty() {
        lines.push(format!("喜歡：{}", profile.likes.join(LIST_SEPARATOR)));
    }
    if let Some(location) = &profile.location {
        lines.push(format!("所在地：{location}"));
    }
    if !profile.tags.is_empty() {
        lines.push(format!("標籤：{}", profile.tags.join(LIST_SEPARATOR)));
    }

    lines.join("\n")
}

fn memory_section(persona: &Persona, turns: &[Turn]) -> String {
    let mut lines = vec![MEMORY_HEADER.to_string()];

    for turn in turns {
        lines.push(format!("{}{}", persona.input_label, turn.input));
        lines.push(format!("{}{}", persona.response_label, turn.response));
    }

    lines.join("\n")
}
