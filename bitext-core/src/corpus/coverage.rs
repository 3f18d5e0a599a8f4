//! Coverage counters and miss bookkeeping shared across workers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Why a file produced no aligned output
///
/// Variants are declared in the alphabetical order of their codes so that
/// sorting by reason matches sorting by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    LangDetectionFailed,
    NoTargetMatch,
    TooShort,
    UnsupportedFormat,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::LangDetectionFailed => "lang_detection_failed",
            MissReason::NoTargetMatch => "no_target_match",
            MissReason::TooShort => "too_short",
            MissReason::UnsupportedFormat => "unsupported_format",
        }
    }
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file path and the reason it was missed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissRecord {
    pub reason: MissReason,
    pub path: String,
}

impl MissRecord {
    pub fn new(path: impl Into<String>, reason: MissReason) -> Self {
        Self {
            reason,
            path: path.into(),
        }
    }
}

/// Per-path miss log; the first reason recorded for a path wins
#[derive(Debug, Default)]
pub struct MissLog {
    entries: Mutex<BTreeMap<String, MissReason>>,
}

impl MissLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, MissReason>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a miss, returning false when the path already had one
    pub fn record(&self, path: impl Into<String>, reason: MissReason) -> bool {
        let path = path.into();
        let mut entries = self.lock();
        if entries.contains_key(&path) {
            return false;
        }
        log::debug!("miss {path}: {reason}");
        entries.insert(path, reason);
        true
    }

    /// Record a batch of misses in order
    pub fn extend<I: IntoIterator<Item = MissRecord>>(&self, misses: I) {
        for miss in misses {
            self.record(miss.path, miss.reason);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Misses sorted by reason then path, skipping paths in `exclude`
    pub fn sorted(&self, exclude: &BTreeSet<String>) -> Vec<MissRecord> {
        let mut misses: Vec<MissRecord> = self
            .lock()
            .iter()
            .filter(|(path, _)| !exclude.contains(*path))
            .map(|(path, reason)| MissRecord::new(path.clone(), *reason))
            .collect();
        misses.sort();
        misses
    }
}

/// Count misses per reason code
pub fn reason_counts(misses: &[MissRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for miss in misses {
        *counts.entry(miss.reason.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Run-scoped segment counters
#[derive(Debug, Default)]
pub struct CoverageTracker {
    sources_found: AtomicUsize,
    targets_found: AtomicUsize,
    matched_segments: AtomicUsize,
}

/// Counter values at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoverageSnapshot {
    pub sources_found: usize,
    pub targets_found: usize,
    pub matched_segments: usize,
}

impl CoverageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sources(&self, n: usize) {
        self.sources_found.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_targets(&self, n: usize) {
        self.targets_found.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_matched(&self, n: usize) {
        self.matched_segments.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CoverageSnapshot {
        CoverageSnapshot {
            sources_found: self.sources_found.load(Ordering::Relaxed),
            targets_found: self.targets_found.load(Ordering::Relaxed),
            matched_segments: self.matched_segments.load(Ordering::Relaxed),
        }
    }
}

impl CoverageSnapshot {
    /// `matched / max(sources, 1) * 100`, clamped to [0, 100], two decimals
    pub fn coverage_pct(&self) -> f64 {
        let pct = self.matched_segments as f64 / self.sources_found.max(1) as f64 * 100.0;
        (pct.clamp(0.0, 100.0) * 100.0).round() / 100.0
    }
}
