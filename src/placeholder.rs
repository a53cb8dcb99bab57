//! Tokenizer for the utterance placeholder micro-syntax.
//!
//! Utterances reference formal arguments inline: `$name` or `$name{option}`.
//! A doubled sigil `$$` escapes a literal dollar sign and never contributes a
//! placeholder name. A `$` followed by anything else stays literal text.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([A-Za-z_][A-Za-z0-9_]*)(?:\{([A-Za-z0-9_-]+)\})?)").unwrap()
});

/// One segment of a tokenized utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// A literal span, copied verbatim from the utterance.
    Literal(String),
    /// A placeholder reference, with its option tag if one was written.
    ///
    /// The option is kept as raw text; membership in the closed option set is
    /// the caller's check, so the message can name the offending tag.
    Placeholder {
        name: String,
        option: Option<String>,
    },
    /// The `$$` escape for a literal sigil.
    Escape,
}

/// Split an utterance into literal spans, placeholder references, and escapes.
///
/// Re-rendering the chunks in order reproduces the input exactly.
pub fn split_placeholders(utterance: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(utterance) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            chunks.push(Chunk::Literal(utterance[last..whole.start()].to_string()));
        }
        if caps.get(1).is_some() {
            chunks.push(Chunk::Escape);
        } else {
            chunks.push(Chunk::Placeholder {
                name: caps[2].to_string(),
                option: caps.get(3).map(|m| m.as_str().to_string()),
            });
        }
        last = whole.end();
    }
    if last < utterance.len() {
        chunks.push(Chunk::Literal(utterance[last..].to_string()));
    }
    chunks
}
