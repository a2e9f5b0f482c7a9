//! Reply segmentation.
//!
//! Generated replies are split into display-ready chunks so the persona
//! sends several short messages instead of one block of text. Lines that
//! are entirely wrapped in full-width parentheses are stage directions
//! (`（輕哼一聲）`) and stay whole; every other line is split after CJK
//! sentence-terminal punctuation.

/// Bracket pair delimiting a stage-direction line.
const STAGE_OPEN: char = '（';
const STAGE_CLOSE: char = '）';

/// Punctuation marks that end a sentence-like chunk.
const SENTENCE_TERMINALS: [char; 3] = ['。', '！', '？'];

/// Split raw generated text into an ordered sequence of delivery chunks.
///
/// Chunk order is stable: lines in input order, and within a line,
/// left-to-right sentence order. The result is never empty -- if nothing
/// survives segmentation (the input was entirely whitespace), the trimmed
/// input itself is yielded as the single chunk, because delivery always
/// needs at least one chunk.
pub fn segment(raw: &str) -> Vec<String> {
    let mut chunks = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_stage_direction(line) {
            chunks.push(line.to_string());
            continue;
        }
        split_sentences(line, &mut chunks);
    }

    if chunks.is_empty() {
        chunks.push(raw.trim().to_string());
    }

    chunks
}

/// Whether the entire trimmed line is wrapped in the stage-direction
/// bracket pair. Such lines are emitted as one chunk, never re-split.
fn is_stage_direction(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next_back()),
        (Some(STAGE_OPEN), Some(STAGE_CLOSE))
    )
}

/// Split one line into sentence-like fragments at boundaries immediately
/// following a terminal mark, discarding boundary whitespace.
fn split_sentences(line: &str, chunks: &mut Vec<String>) {
    let mut current = String::new();

    for ch in line.chars() {
        current.push(ch);
        if SENTENCE_TERMINALS.contains(&ch) {
            push_fragment(&mut current, chunks);
        }
    }
    push_fragment(&mut current, chunks);
}

fn push_fragment(current: &mut String, chunks: &mut Vec<String>) {
    let fragment = current.trim();
    if !fragment.is_empty() {
        chunks.push(fragment.to_string());
    }
    current.clear();
}
