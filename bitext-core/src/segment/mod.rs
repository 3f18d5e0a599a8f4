//! Paragraph and sentence segmentation
//!
//! [`Segmenter`] picks a strategy per paragraph: the locale rules registered
//! for the working language when there are any, the regex splitter otherwise.
//! A locale strategy that fails or returns nothing also falls back to regex.

mod fallback;
mod locale;
mod rules;
mod tables;

pub use fallback::RegexSegmenter;
pub use locale::{LocaleConfig, LocaleRegistry};
pub use rules::RuleSegmenter;

use crate::config::defaults;
use crate::error::Result;
use crate::language::{self, Language};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A sentence splitting strategy
pub trait SentenceSegmenter: Send + Sync {
    /// Split text into raw fragments in document order
    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Strategy name for logging
    fn name(&self) -> &str;
}

/// Half-open character range inside a normalized paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One sentence-like unit of a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Whitespace-normalized text
    pub text: String,
    /// Location in the normalized paragraph
    pub span: Option<Span>,
}

impl Segment {
    /// Segment without location, used for the empty placeholder side
    pub fn detached(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: None,
        }
    }
}

/// Collapse blank-line runs and inner newlines, normalize whitespace, trim
pub fn normalize_paragraph(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize raw paragraphs, dropping those left empty
pub fn normalize_paragraphs<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|p| normalize_paragraph(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Language-aware segmenter with regex fallback
#[derive(Clone)]
pub struct Segmenter {
    registry: Arc<LocaleRegistry>,
    fallback: RegexSegmenter,
    default_language: Language,
    min_len: usize,
}

impl Segmenter {
    /// Create a segmenter over a locale registry
    pub fn new(registry: Arc<LocaleRegistry>, default_language: Language) -> Self {
        Self {
            registry,
            fallback: RegexSegmenter::new(),
            default_language,
            min_len: defaults::MIN_SEGMENT_CHARS,
        }
    }

    /// Set the minimum segment length in characters
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Registry backing the locale strategies
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Pick the strategy for a language
    pub fn strategy_for(&self, language: Language) -> Arc<dyn SentenceSegmenter> {
        match self.registry.get(language.code()) {
            Ok(rules) => rules as Arc<dyn SentenceSegmenter>,
            Err(e) => {
                log::trace!("{e}; using regex segmentation");
                Arc::new(self.fallback)
            }
        }
    }

    /// Language used for a paragraph when the caller gives none
    pub fn working_language(&self, text: &str, language: Option<Language>) -> Language {
        match language {
            Some(lang) => lang,
            None => match language::detect(text).language {
                Language::Unknown => self.default_language,
                detected => detected,
            },
        }
    }

    /// Split one paragraph into sentence segments
    pub fn segment(&self, paragraph: &str, language: Option<Language>) -> Vec<Segment> {
        let text = normalize_paragraph(paragraph);
        if text.is_empty() {
            return Vec::new();
        }

        let language = self.working_language(&text, language);
        let strategy = self.strategy_for(language);

        let mut fragments = match strategy.split(&text) {
            Ok(raw) => self.clean(raw),
            Err(e) => {
                log::debug!("{} segmentation failed: {e}", strategy.name());
                Vec::new()
            }
        };

        if fragments.is_empty() {
            fragments = self.clean(self.fallback.split(&text).unwrap_or_default());
        }

        locate(&text, fragments)
    }

    /// Normalize and segment a list of raw paragraphs
    pub fn segment_all<S: AsRef<str>>(
        &self,
        paragraphs: &[S],
        language: Option<Language>,
    ) -> Vec<Vec<Segment>> {
        normalize_paragraphs(paragraphs)
            .iter()
            .map(|p| self.segment(p, language))
            .collect()
    }

    fn clean(&self, raw: Vec<String>) -> Vec<String> {
        raw.into_iter()
            .map(|fragment| normalize_paragraph(&fragment))
            .filter(|fragment| fragment.chars().count() >= self.min_len.max(1))
            .collect()
    }
}

/// Attach character spans by locating each fragment after the previous one
fn locate(text: &str, fragments: Vec<String>) -> Vec<Segment> {
    let mut cursor = 0;
    fragments
        .into_iter()
        .map(|fragment| {
            let span = text[cursor..].find(&fragment).map(|found| {
                let start_byte = cursor + found;
                let end_byte = start_byte + fragment.len();
                cursor = end_byte;
                let start = text[..start_byte].chars().count();
                Span {
                    start,
                    end: start + fragment.chars().count(),
                }
            });
            Segment {
                text: fragment,
                span,
            }
        })
        .collect()
}
