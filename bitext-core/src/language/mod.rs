//! Language labels and script-based detection

mod detect;

pub use detect::{classify, detect, normalize_for_detection, Detection, ScriptCounts};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language label attached to files and segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic script text
    Ar,
    /// Latin script (English) text
    En,
    /// Strong presence of both scripts
    Mixed,
    /// Could not be determined
    #[default]
    Unknown,
}

impl Language {
    /// Get the language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
            Language::Mixed => "mixed",
            Language::Unknown => "unknown",
        }
    }

    /// Get the full language name
    pub fn name(&self) -> &'static str {
        match self {
            Language::Ar => "Arabic",
            Language::En => "English",
            Language::Mixed => "Mixed",
            Language::Unknown => "Unknown",
        }
    }

    /// True for the two concrete languages a document can be written in
    pub fn is_concrete(&self) -> bool {
        matches!(self, Language::Ar | Language::En)
    }

    /// The other concrete language, if any
    pub fn counterpart(&self) -> Option<Language> {
        match self {
            Language::Ar => Some(Language::En),
            Language::En => Some(Language::Ar),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "ara" | "arabic" => Ok(Language::Ar),
            "en" | "eng" | "english" => Ok(Language::En),
            "mixed" => Ok(Language::Mixed),
            "unknown" => Ok(Language::Unknown),
            other => Err(format!("unknown language code: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
