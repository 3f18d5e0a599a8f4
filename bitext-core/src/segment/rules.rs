//! Locale-aware sentence splitting driven by [`LocaleConfig`] tables

use super::locale::LocaleConfig;
use super::tables::{dot_role, AbbreviationSet, CloserSet, DotRole, EllipsisSet, TermTable};
use super::SentenceSegmenter;
use crate::error::Result;

/// Sentence splitter for one locale
#[derive(Debug, Clone)]
pub struct RuleSegmenter {
    code: String,
    name: String,
    terms: TermTable,
    ellipsis: EllipsisSet,
    closers: CloserSet,
    abbreviations: AbbreviationSet,
}

impl RuleSegmenter {
    /// Build runtime tables from a validated configuration
    pub fn from_config(config: &LocaleConfig) -> Self {
        let ellipsis = EllipsisSet::new(
            config.ellipsis.patterns.clone(),
            config.ellipsis.treat_as_boundary,
        );
        let terms = TermTable::new(
            config
                .terminators
                .chars
                .iter()
                .copied()
                .chain(ellipsis.leading_chars()),
        );
        let closers = CloserSet::new(config.enclosures.pairs.iter().map(|p| p.close));
        let abbreviations = AbbreviationSet::from_categories(config.abbreviations.categories.values());

        Self {
            code: config.metadata.code.to_lowercase(),
            name: config.metadata.name.clone(),
            terms,
            ellipsis,
            closers,
            abbreviations,
        }
    }

    /// Locale code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable locale name
    pub fn locale_name(&self) -> &str {
        &self.name
    }

    /// Number of abbreviations known to this locale
    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }

    /// Byte offsets right after each sentence end
    fn boundaries(&self, text: &str) -> Vec<usize> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let byte_at = |idx: usize| chars.get(idx).map(|(b, _)| *b).unwrap_or(text.len());
        let mut boundaries = Vec::new();

        let mut i = 0;
        while i < chars.len() {
            let (pos, ch) = chars[i];
            if !self.terms.is_terminator(ch) {
                i += 1;
                continue;
            }

            if ch == '.' {
                let prev = i.checked_sub(1).map(|p| chars[p].1);
                let next = chars.get(i + 1).map(|(_, c)| *c);
                match dot_role(prev, next) {
                    DotRole::Decimal => {
                        i += 1;
                        continue;
                    }
                    DotRole::Ordinary if self.abbreviations.ends_at(text, pos) => {
                        i += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            let mut j = i;
            while j < chars.len() && self.terms.is_terminator(chars[j].1) {
                j += 1;
            }
            let run = &text[pos..byte_at(j)];
            if self.ellipsis.matches(run) && !self.ellipsis.treat_as_boundary() {
                i = j;
                continue;
            }

            while j < chars.len() && self.closers.contains(chars[j].1) {
                j += 1;
            }

            if j == chars.len() || chars[j].1.is_whitespace() {
                boundaries.push(byte_at(j));
            }
            i = j;
        }

        boundaries
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let mut fragments = Vec::new();
        let mut start = 0;
        for end in self.boundaries(text) {
            fragments.push(text[start..end].to_string());
            start = end;
        }
        if start < text.len() {
            fragments.push(text[start..].to_string());
        }
        Ok(fragments)
    }

    fn name(&self) -> &str {
        &self.code
    }
}
