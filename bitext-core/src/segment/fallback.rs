//! Regex sentence splitting used when no locale rules apply

use super::SentenceSegmenter;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Sentence-final punctuation shared by Arabic and English text, followed by
/// optional closing quotes/brackets. The punctuation stays with the fragment
/// before it.
const SENTENCE_PATTERN: &str = r#"[^.!?؟۔…]*(?:[.!?؟۔…]+["'”’»)\]]*|$)"#;

fn sentence_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SENTENCE_PATTERN).expect("fallback pattern is valid"))
}

/// Script-agnostic punctuation splitter
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSegmenter;

impl RegexSegmenter {
    /// Create the fallback splitter
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSegmenter for RegexSegmenter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        Ok(sentence_regex()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.trim().is_empty())
            .collect())
    }

    fn name(&self) -> &str {
        "regex"
    }
}
