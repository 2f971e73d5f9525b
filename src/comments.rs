//! Block-comment extraction.
//!
//! Source files are not parsed here; a delimiter pattern is run over the raw text and every
//! matching block is handed on, in source order, to the [`doc_tags`](crate::doc_tags) parser.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// Delimiter pattern used to find comment blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPattern {
    /// `/** ... */` doc blocks, as written by hand in native sources
    Native,
    /// Any `/* ... */` block; normalized output is formatted more loosely
    Transpiled,
}

impl CommentPattern {
    fn regex(self) -> &'static Regex {
        static NATIVE: OnceLock<Regex> = OnceLock::new();
        static TRANSPILED: OnceLock<Regex> = OnceLock::new();

        match self {
            CommentPattern::Native => NATIVE
                .get_or_init(|| Regex::new(r"(?s)/\*\*.*?\*/").expect("native comment pattern")),
            CommentPattern::Transpiled => TRANSPILED
                .get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("transpiled comment pattern")),
        }
    }
}

/// Returns every comment block in `text` matching `pattern`, delimiters included.
///
/// Blocks are returned in the order they appear. Text without any block (including the
/// empty string) yields an empty vector.
pub fn extract_blocks(text: &str, pattern: CommentPattern) -> Vec<String> {
    let blocks: Vec<String> = pattern
        .regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    debug!("Extracted {} comment blocks ({:?})", blocks.len(), pattern);
    blocks
}
