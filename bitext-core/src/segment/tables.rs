//! Lookup tables backing the locale rule segmenter
//!
//! Built once per locale from its TOML configuration, read-only afterwards.

use std::collections::HashSet;

/// Terminator lookup with an ASCII fast path
#[derive(Debug, Clone)]
pub struct TermTable {
    ascii_table: [bool; 128],
    non_ascii: HashSet<char>,
}

impl TermTable {
    /// Create from list of terminator characters
    pub fn new(terminators: impl IntoIterator<Item = char>) -> Self {
        let mut ascii_table = [false; 128];
        let mut non_ascii = HashSet::new();

        for ch in terminators {
            if ch.is_ascii() {
                ascii_table[ch as usize] = true;
            } else {
                non_ascii.insert(ch);
            }
        }

        Self {
            ascii_table,
            non_ascii,
        }
    }

    /// Check if character is a terminator
    #[inline]
    pub fn is_terminator(&self, ch: char) -> bool {
        if ch.is_ascii() {
            self.ascii_table[ch as usize]
        } else {
            self.non_ascii.contains(&ch)
        }
    }
}

/// Role of a `.` in context
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DotRole {
    /// Regular sentence-ending period
    Ordinary,
    /// Part of a dot run (`...`)
    Ellipsis,
    /// Decimal point (`3.14`)
    Decimal,
}

/// Classify a dot from its neighbours
#[inline]
pub fn dot_role(prev: Option<char>, next: Option<char>) -> DotRole {
    if let (Some(p), Some(n)) = (prev, next) {
        if p.is_ascii_digit() && n.is_ascii_digit() {
            return DotRole::Decimal;
        }
    }

    if prev == Some('.') || next == Some('.') {
        return DotRole::Ellipsis;
    }

    DotRole::Ordinary
}

/// Ellipsis patterns and whether they end a sentence
#[derive(Debug, Clone)]
pub struct EllipsisSet {
    patterns: Vec<String>,
    treat_as_boundary: bool,
}

impl EllipsisSet {
    /// Create ellipsis detector
    pub fn new(patterns: Vec<String>, treat_as_boundary: bool) -> Self {
        Self {
            patterns,
            treat_as_boundary,
        }
    }

    /// True when a terminator run contains one of the ellipsis patterns
    pub fn matches(&self, run: &str) -> bool {
        self.patterns.iter().any(|p| !p.is_empty() && run.contains(p.as_str()))
    }

    /// Should ellipsis be treated as boundary?
    pub fn treat_as_boundary(&self) -> bool {
        self.treat_as_boundary
    }

    /// First characters of all patterns; they must be scanned like terminators
    pub fn leading_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.patterns.iter().filter_map(|p| p.chars().next())
    }
}

/// Case-insensitive abbreviation set
#[derive(Debug, Clone, Default)]
pub struct AbbreviationSet {
    words: HashSet<String>,
}

impl AbbreviationSet {
    /// Build from configuration categories
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a Vec<String>>) -> Self {
        let words = categories
            .into_iter()
            .flatten()
            .map(|abbr| abbr.trim_end_matches('.').to_lowercase())
            .filter(|abbr| !abbr.is_empty())
            .collect();
        Self { words }
    }

    /// Number of registered abbreviations
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no abbreviation is registered
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Does the word immediately before byte offset `dot_pos` form an abbreviation?
    ///
    /// The word may itself contain dots (`e.g`, `U.S`).
    pub fn ends_at(&self, text: &str, dot_pos: usize) -> bool {
        let before = &text[..dot_pos];
        let start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '.')
            .last()
            .map(|(i, _)| i)
            .unwrap_or(dot_pos);
        let word = before[start..].trim_start_matches('.');
        if word.is_empty() {
            return false;
        }

        // single capital initial ("J. Smith"), except the pronoun "I"
        let mut chars = word.chars();
        if let (Some(first), None) = (chars.next(), chars.next()) {
            if first.is_uppercase() && first != 'I' {
                return true;
            }
        }

        self.words.contains(&word.to_lowercase())
    }
}

/// Closing quotes and brackets that stay attached to a sentence end
#[derive(Debug, Clone, Default)]
pub struct CloserSet {
    closers: HashSet<char>,
}

impl CloserSet {
    /// Create from the closing side of the configured enclosure pairs
    pub fn new(closers: impl IntoIterator<Item = char>) -> Self {
        Self {
            closers: closers.into_iter().collect(),
        }
    }

    /// Is this a closing delimiter?
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.closers.contains(&ch)
    }
}
