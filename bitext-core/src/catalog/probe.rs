//! Content sampling for cataloged files

use super::FormatKind;
use crate::config::defaults;
use crate::corpus::{markers, sources};
use crate::error::{BitextError, Result};
use crate::language::{self, Language};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What the content of a file says about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub language: Language,
    pub has_markers: bool,
}

impl Probe {
    /// Structured files are bilingual by construction
    pub fn structured() -> Self {
        Self {
            language: Language::Mixed,
            has_markers: false,
        }
    }
}

/// Classify a text sample
///
/// A sample with both an Arabic and an English section marker is a marker
/// file and counts as mixed.
pub fn probe_text(sample: &str) -> Probe {
    let mut seen_ar = false;
    let mut seen_en = false;
    for line in sample.lines() {
        match markers::marker_language(line) {
            Some(Language::Ar) => seen_ar = true,
            Some(Language::En) => seen_en = true,
            _ => {}
        }
        if seen_ar && seen_en {
            return Probe {
                language: Language::Mixed,
                has_markers: true,
            };
        }
    }

    Probe {
        language: language::classify(sample),
        has_markers: false,
    }
}

/// Read the leading part of a document as text
pub fn read_sample(path: &Path, format: FormatKind) -> Result<String> {
    match format {
        FormatKind::DocxLike => {
            let mut sample = String::new();
            for paragraph in sources::docx_paragraphs(path)? {
                if sample.len() >= defaults::PROBE_BYTES {
                    break;
                }
                sample.push_str(&paragraph);
                sample.push('\n');
            }
            Ok(sample)
        }
        _ => {
            let file = File::open(path).map_err(|e| BitextError::io(path, e))?;
            let mut buf = Vec::with_capacity(4096);
            file.take(defaults::PROBE_BYTES as u64)
                .read_to_end(&mut buf)
                .map_err(|e| BitextError::io(path, e))?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
    }
}

/// Sample and classify a file, degrading to `unknown` when it cannot be read
pub fn probe_file(path: &Path, format: FormatKind) -> Probe {
    if format.is_structured() {
        return Probe::structured();
    }

    match read_sample(path, format) {
        Ok(sample) => probe_text(&sample),
        Err(e) => {
            log::debug!("content probe failed: {e}");
            Probe {
                language: Language::Unknown,
                has_markers: false,
            }
        }
    }
}
