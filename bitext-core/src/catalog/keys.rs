//! Identity keys derived from file paths
//!
//! Keys are pure functions of a name so that pairing can be tested without
//! touching the file system.

use crate::language::Language;

const ARABIC_TOKENS: &[&str] = &["ar", "ara", "arabic"];
const ENGLISH_TOKENS: &[&str] = &["en", "eng", "english"];

/// Wildcard written in place of a language token in directory signatures
pub const SIGNATURE_WILDCARD: &str = "*";

fn language_of_token(token: &str) -> Option<Language> {
    if ARABIC_TOKENS.contains(&token) {
        Some(Language::Ar)
    } else if ENGLISH_TOKENS.contains(&token) {
        Some(Language::En)
    } else {
        None
    }
}

/// Lowercase alphanumeric tokens, with letter/digit runs split apart
fn tokens(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let mut out = Vec::new();
    for word in lower.split(|c: char| !c.is_alphanumeric()) {
        let mut current = String::new();
        let mut current_digit = None;
        for ch in word.chars() {
            let is_digit = ch.is_ascii_digit();
            if current_digit.is_some_and(|d| d != is_digit) {
                out.push(std::mem::take(&mut current));
            }
            current.push(ch);
            current_digit = Some(is_digit);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

/// Value of a canonical roman numeral made of `i v x l c`, up to 399
pub fn roman_value(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > 12 {
        return None;
    }

    let digit = |c: char| match c {
        'i' => Some(1),
        'v' => Some(5),
        'x' => Some(10),
        'l' => Some(50),
        'c' => Some(100),
        _ => None,
    };

    let values: Vec<u32> = token.chars().map(digit).collect::<Option<_>>()?;
    let mut total = 0;
    for (i, value) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(next) if next > value => total -= *value as i64,
            _ => total += *value as i64,
        }
    }

    let total = u32::try_from(total).ok().filter(|v| (1..400).contains(v))?;
    // "iiii" or "vx" parse to a number but are not numerals
    (to_roman(total) == token).then_some(total)
}

fn to_roman(mut value: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for &(n, s) in TABLE {
        while value >= n {
            out.push_str(s);
            value -= n;
        }
    }
    out
}

fn canonical_number(token: &str) -> Option<String> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        if token.len() <= 2 {
            return token.parse::<u32>().ok().map(|n| format!("{n:02}"));
        }
        return Some(token.to_string());
    }
    roman_value(token).map(|n| format!("{n:02}"))
}

/// Normalized basename key: language tokens stripped, numbers canonical
///
/// `"Chapter_IV_AR"` and `"Chapter 04 English"` both give `"chapter 04"`.
pub fn normalized_key(stem: &str) -> String {
    tokens(stem)
        .into_iter()
        .filter(|t| language_of_token(t).is_none())
        .map(|t| canonical_number(&t).unwrap_or(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// First standalone 1-3 digit number of a key, else its first roman numeral
pub fn numeric_key(key: &str) -> Option<String> {
    let parts = tokens(key);

    let number = parts.iter().find_map(|t| {
        (t.len() <= 3 && t.chars().all(|c| c.is_ascii_digit()))
            .then(|| t.parse::<u32>().ok())
            .flatten()
    });

    number
        .or_else(|| parts.iter().find_map(|t| roman_value(t)))
        .map(|n| format!("{n:02}"))
}

/// Path with every language token replaced by a wildcard
///
/// Takes a project-relative path without extension; `book/ar/ch1` and
/// `book/en/ch1` share the signature `book/*/ch1`.
pub fn dir_signature(rel_path_without_ext: &str) -> String {
    let lower = rel_path_without_ext.to_lowercase().replace('\\', "/");
    let mut out = String::with_capacity(lower.len());
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        if language_of_token(word).is_some() {
            out.push_str(SIGNATURE_WILDCARD);
        } else {
            out.push_str(word);
        }
        word.clear();
    };

    for ch in lower.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
        } else {
            flush(&mut word, &mut out);
            out.push(ch);
        }
    }
    flush(&mut word, &mut out);
    out
}

/// Language named by a token in the path, nearest to the file first
pub fn path_language(rel_path_without_ext: &str) -> Option<Language> {
    rel_path_without_ext
        .split(['/', '\\'])
        .rev()
        .find_map(|segment| {
            let found: Vec<Language> = tokens(segment)
                .iter()
                .filter_map(|t| language_of_token(t))
                .collect();
            // a segment naming both languages says nothing about the file
            match found.as_slice() {
                [] => None,
                [first, rest @ ..] if rest.iter().all(|l| l == first) => Some(Some(*first)),
                _ => Some(None),
            }
        })
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_values() {
        assert_eq!(roman_value("iv"), Some(4));
        assert_eq!(roman_value("xii"), Some(12));
        assert_eq!(roman_value("xcix"), Some(99));
        assert_eq!(roman_value("cccxcix"), Some(399));
        assert_eq!(roman_value("iiii"), None);
        assert_eq!(roman_value("vx"), None);
        assert_eq!(roman_value("civil"), None);
        assert_eq!(roman_value("mix"), None);
        assert_eq!(roman_value(""), None);
    }

    #[test]
    fn test_normalized_key_equivalence() {
        assert_eq!(normalized_key("Chapter_IV_AR"), "chapter 04");
        assert_eq!(normalized_key("Chapter 04 English"), "chapter 04");
        assert_eq!(normalized_key("Chapter IV (AR)"), normalized_key("Chapter 04 - English"));
    }

    #[test]
    fn test_normalized_key_splits_digit_runs() {
        assert_eq!(normalized_key("ch1"), "ch 01");
        assert_eq!(normalized_key("ch1-en"), "ch 01");
        assert_eq!(normalized_key("part123"), "part 123");
    }

    #[test]
    fn test_normalized_key_keeps_other_words() {
        assert_eq!(normalized_key("The__Long   Road"), "the long road");
        assert_eq!(normalized_key("arena"), "arena");
        assert_eq!(normalized_key("en"), "");
    }

    #[test]
    fn test_numeric_key() {
        assert_eq!(numeric_key("chapter 04"), Some("04".to_string()));
        assert_eq!(numeric_key("book 2 part 3"), Some("02".to_string()));
        assert_eq!(numeric_key("year 2024"), None);
        assert_eq!(numeric_key("part ix"), Some("09".to_string()));
        assert_eq!(numeric_key("preface"), None);
    }

    #[test]
    fn test_dir_signature() {
        assert_eq!(dir_signature("book/ar/ch1"), "book/*/ch1");
        assert_eq!(dir_signature("book/en/ch1"), "book/*/ch1");
        assert_eq!(dir_signature("Book/Arabic/Ch1_AR"), "book/*/ch1_*");
        assert_eq!(dir_signature("docs/alpha"), "docs/alpha");
        assert_ne!(dir_signature("docs/alpha"), dir_signature("docs/beta"));
    }

    #[test]
    fn test_path_language() {
        assert_eq!(path_language("books/ar/ch1"), Some(Language::Ar));
        assert_eq!(path_language("books/en/ch1"), Some(Language::En));
        assert_eq!(path_language("books/arabic/ch1_en"), Some(Language::En));
        assert_eq!(path_language("translations/ch1"), None);
        assert_eq!(path_language("docs/ar-en/notes"), None);
        assert_eq!(path_language("content/arena/notes"), None);
    }
}
