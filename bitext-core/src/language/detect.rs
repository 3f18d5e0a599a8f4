//! Two-script language detection
//!
//! Scores text against the Arabic script and the Latin alphabet. Arabic
//! letters and Arabic-specific punctuation are weighted above plain counts,
//! Latin letters are combined with ASCII punctuation density.

use super::Language;

/// Multiplier applied to the Arabic proportion
const ARABIC_WEIGHT: f64 = 1.25;

/// Arabic punctuation counts this many times an ordinary Arabic letter
const ARABIC_PUNCT_WEIGHT: f64 = 2.0;

/// Contribution of ASCII punctuation density to the Latin score
const ASCII_PUNCT_WEIGHT: f64 = 0.5;

/// A winner must beat the other score by this factor to report its own score
const DOMINANCE_MARGIN: f64 = 1.10;

/// Latin letters needed (with at least one Arabic character) to call text mixed
const MIXED_MIN_LATIN: usize = 3;

/// Result of [`detect`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Detected language
    pub language: Language,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Detection {
    fn unknown() -> Self {
        Self {
            language: Language::Unknown,
            confidence: 0.0,
        }
    }
}

/// Raw per-script character counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    /// Non-whitespace characters
    pub total: usize,
    /// Letters in the Arabic blocks
    pub arabic: usize,
    /// Arabic-specific punctuation
    pub arabic_punct: usize,
    /// ASCII Latin letters and Latin-1 letters
    pub latin: usize,
    /// ASCII punctuation
    pub ascii_punct: usize,
}

impl ScriptCounts {
    /// Count script membership of every non-whitespace character
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for ch in text.chars().filter(|c| !c.is_whitespace()) {
            counts.total += 1;
            if is_arabic_punct(ch) {
                counts.arabic_punct += 1;
            } else if is_arabic(ch) {
                counts.arabic += 1;
            } else if is_latin_letter(ch) {
                counts.latin += 1;
            } else if ch.is_ascii_punctuation() {
                counts.ascii_punct += 1;
            }
        }
        counts
    }

    fn arabic_score(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let weighted = self.arabic as f64 + ARABIC_PUNCT_WEIGHT * self.arabic_punct as f64;
        weighted / self.total as f64 * ARABIC_WEIGHT
    }

    fn latin_score(&self) -> f64 {
        if self.total == 0 || self.latin == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.latin as f64 / total + ASCII_PUNCT_WEIGHT * self.ascii_punct as f64 / total
    }
}

/// Collapse whitespace runs and drop bidirectional control marks
pub fn normalize_for_detection(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().filter(|c| !is_bidi_control(*c)).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detect the language of `text`
pub fn detect(text: &str) -> Detection {
    let normalized = normalize_for_detection(text);
    let counts = ScriptCounts::of(&normalized);

    let ar = counts.arabic_score();
    let en = counts.latin_score();

    if ar == 0.0 && en == 0.0 {
        return Detection::unknown();
    }

    if ar > en * DOMINANCE_MARGIN {
        return Detection {
            language: Language::Ar,
            confidence: ar.clamp(0.0, 1.0),
        };
    }
    if en > ar * DOMINANCE_MARGIN {
        return Detection {
            language: Language::En,
            confidence: en.clamp(0.0, 1.0),
        };
    }

    let diff = (ar - en).abs().clamp(0.0, 1.0);
    if ar > en {
        Detection {
            language: Language::Ar,
            confidence: diff,
        }
    } else if en > ar {
        Detection {
            language: Language::En,
            confidence: diff,
        }
    } else {
        Detection::unknown()
    }
}

/// Classify text for cataloging: `mixed` wins over the two-score detector
pub fn classify(text: &str) -> Language {
    let normalized = normalize_for_detection(text);
    let counts = ScriptCounts::of(&normalized);
    if counts.latin >= MIXED_MIN_LATIN && counts.arabic + counts.arabic_punct >= 1 {
        return Language::Mixed;
    }
    detect(&normalized).language
}

fn is_bidi_control(ch: char) -> bool {
    matches!(
        ch,
        '\u{200E}' | '\u{200F}' | '\u{061C}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

fn is_arabic(ch: char) -> bool {
    matches!(
        ch,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFC}'
    )
}

fn is_arabic_punct(ch: char) -> bool {
    matches!(ch, '،' | '؛' | '؟' | '۔' | '٪' | '٫' | '٬')
}

fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '\u{00C0}'..='\u{00FF}' if ch.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_digits_are_unknown() {
        assert_eq!(detect("").language, Language::Unknown);
        assert_eq!(detect("   \n\t").confidence, 0.0);
        assert_eq!(detect("1234 5678").language, Language::Unknown);
    }

    #[test]
    fn test_english_text() {
        let d = detect("The quick brown fox jumps over the lazy dog.");
        assert_eq!(d.language, Language::En);
        assert!(d.confidence > 0.9);
        assert!(d.confidence <= 1.0);
    }

    #[test]
    fn test_arabic_text_clamped_confidence() {
        let d = detect("ذهب الولد إلى المدرسة؟ نعم، ذهب.");
        assert_eq!(d.language, Language::Ar);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn test_bidi_marks_ignored() {
        let plain = detect("hello world");
        let marked = detect("\u{200F}hello\u{200E} \u{202B}world\u{202C}");
        assert_eq!(plain, marked);
    }

    #[test]
    fn test_close_scores_report_difference() {
        // five arabic letters (5/11 * 1.25) against six latin letters (6/11)
        let d = detect("abcdef مرحبا");
        assert_eq!(d.language, Language::Ar);
        assert!((d.confidence - 0.25 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_mixed_requires_three_latin_letters() {
        assert_eq!(classify("الفصل الأول abc"), Language::Mixed);
        assert_eq!(classify("الفصل الأول ab"), Language::Ar);
        assert_eq!(classify("plain english only"), Language::En);
    }

    #[test]
    fn test_script_counts() {
        let counts = ScriptCounts::of("Hi، يا!");
        assert_eq!(counts.latin, 2);
        assert_eq!(counts.arabic, 2);
        assert_eq!(counts.arabic_punct, 1);
        assert_eq!(counts.ascii_punct, 1);
        assert_eq!(counts.total, 6);
    }
}
