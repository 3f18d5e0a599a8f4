//! Confidence score for automatic pairing

use crate::catalog::FileRecord;

/// Identical normalized basename keys
pub const KEY_WEIGHT: f64 = 0.65;
/// Identical, non-null numeric keys
pub const NUMERIC_WEIGHT: f64 = 0.15;
/// Identical directory signatures
pub const SIGNATURE_WEIGHT: f64 = 0.12;
/// Same parent directory
pub const PARENT_WEIGHT: f64 = 0.08;
/// Same extension
pub const EXTENSION_WEIGHT: f64 = 0.05;

/// Score in [0, 1], rounded to two decimals
pub fn confidence(a: &FileRecord, b: &FileRecord) -> f64 {
    let mut score = 0.0;

    if a.key == b.key {
        score += KEY_WEIGHT;
    }
    if a.numeric_key.is_some() && a.numeric_key == b.numeric_key {
        score += NUMERIC_WEIGHT;
    }
    if a.dir_signature == b.dir_signature {
        score += SIGNATURE_WEIGHT;
    }
    if a.parent() == b.parent() {
        score += PARENT_WEIGHT;
    }
    if a.extension == b.extension {
        score += EXTENSION_WEIGHT;
    }

    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}
