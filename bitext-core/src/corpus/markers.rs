//! Inline bilingual marker files
//!
//! A marker file alternates headed blocks:
//!
//! ```text
//! ## AR
//! النص العربي
//!
//! ## EN
//! The English text
//! ```
//!
//! Marker lines may be Markdown headings, bracketed (`[AR]`) or plain, with
//! an optional trailing colon.

use crate::language::Language;
use regex::Regex;
use std::sync::OnceLock;

const MARKER_PATTERN: &str =
    r"(?i)^\s*(?:#{1,6}\s*)?[\[(]?\s*(ar|arabic|en|english)\s*[\])]?\s*:?\s*$";

fn marker_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Language named by a marker line
pub fn marker_language(line: &str) -> Option<Language> {
    let caps = marker_regex().captures(line)?;
    caps.get(1)?.as_str().parse().ok()
}

/// One source/target block pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerPair {
    pub source: String,
    pub target: String,
}

/// Split a marker file into block pairs
///
/// Blocks are matched in order: a source block opens a pair and the next
/// target block closes it. A block with no partner produces a pair with an
/// empty side. Text before the first marker is ignored.
pub fn parse_marker_pairs(text: &str, source: Language, target: Language) -> Vec<MarkerPair> {
    let mut blocks: Vec<(Language, String)> = Vec::new();
    let mut current: Option<(Language, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(lang) = marker_language(line) {
            if let Some((lang, lines)) = current.take() {
                blocks.push((lang, lines.join("\n")));
            }
            current = Some((lang, Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((lang, lines)) = current.take() {
        blocks.push((lang, lines.join("\n")));
    }

    let mut pairs = Vec::new();
    let mut open: Option<String> = None;

    for (lang, body) in blocks {
        if lang == source {
            if let Some(pending) = open.replace(body) {
                pairs.push(MarkerPair {
                    source: pending,
                    target: String::new(),
                });
            }
        } else if lang == target {
            pairs.push(MarkerPair {
                source: open.take().unwrap_or_default(),
                target: body,
            });
        }
    }
    if let Some(pending) = open {
        pairs.push(MarkerPair {
            source: pending,
            target: String::new(),
        });
    }

    pairs
}
