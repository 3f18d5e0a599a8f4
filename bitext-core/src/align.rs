//! Positional sentence alignment
//!
//! Segments are paired by index. Order is taken as document order and is
//! never changed, so a translation that merges or splits sentences shows up
//! as length outliers rather than being realigned.

use crate::config::defaults;
use crate::segment::{Segment, Span};
use serde::{Deserialize, Serialize};

/// Alignment status of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignStatus {
    Aligned,
    TargetMissing,
    SourceMissing,
    LengthOutlier,
}

impl AlignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignStatus::Aligned => "aligned",
            AlignStatus::TargetMissing => "target-missing",
            AlignStatus::SourceMissing => "source-missing",
            AlignStatus::LengthOutlier => "length-outlier",
        }
    }
}

/// Ratio bounds for the `aligned` status
///
/// The 0.3 / 3.0 defaults are assumed values, not measured ones; adjust
/// them through the run configuration for corpora with a different length
/// profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignOptions {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            min_ratio: defaults::MIN_LENGTH_RATIO,
            max_ratio: defaults::MAX_LENGTH_RATIO,
        }
    }
}

/// One aligned source/target position
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedEntry {
    pub source: String,
    pub target: String,
    pub status: AlignStatus,
    /// `max(len(target), 1) / max(len(source), 1)` in characters
    pub ratio: f64,
    pub source_span: Option<Span>,
    pub target_span: Option<Span>,
}

/// Target/source length ratio, both lengths floored at 1
pub fn length_ratio(source: &str, target: &str) -> f64 {
    let src = source.chars().count().max(1) as f64;
    let tgt = target.chars().count().max(1) as f64;
    tgt / src
}

fn status_for(source: &str, target: &str, ratio: f64, options: &AlignOptions) -> AlignStatus {
    if target.is_empty() {
        AlignStatus::TargetMissing
    } else if source.is_empty() {
        AlignStatus::SourceMissing
    } else if ratio < options.min_ratio || ratio > options.max_ratio {
        AlignStatus::LengthOutlier
    } else {
        AlignStatus::Aligned
    }
}

/// Align two segment lists position by position
///
/// Emits `max(len(source), len(target))` entries; the shorter side is padded
/// with empty text.
pub fn align(source: &[Segment], target: &[Segment], options: &AlignOptions) -> Vec<AlignedEntry> {
    let len = source.len().max(target.len());
    (0..len)
        .map(|i| {
            let src = source.get(i);
            let tgt = target.get(i);
            let src_text = src.map(|s| s.text.as_str()).unwrap_or("");
            let tgt_text = tgt.map(|s| s.text.as_str()).unwrap_or("");
            let ratio = length_ratio(src_text, tgt_text);

            AlignedEntry {
                source: src_text.to_string(),
                target: tgt_text.to_string(),
                status: status_for(src_text, tgt_text, ratio, options),
                ratio,
                source_span: src.and_then(|s| s.span),
                target_span: tgt.and_then(|s| s.span),
            }
        })
        .collect()
}

/// Fold `source-missing` entries into the preceding entry's target
///
/// Target text never stands without a source: trailing target sentences are
/// appended to the last sourced entry, whose ratio and status are
/// recomputed. Entries with no sourced predecessor are dropped.
pub fn fold_orphan_targets(entries: Vec<AlignedEntry>, options: &AlignOptions) -> Vec<AlignedEntry> {
    let mut out: Vec<AlignedEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.status != AlignStatus::SourceMissing {
            out.push(entry);
            continue;
        }

        let Some(last) = out.last_mut() else {
            continue;
        };
        if last.target.is_empty() {
            last.target = entry.target;
            last.target_span = entry.target_span;
        } else {
            last.target.push(' ');
            last.target.push_str(&entry.target);
            last.target_span = match (last.target_span, entry.target_span) {
                (Some(first), Some(next)) => Some(Span {
                    start: first.start,
                    end: next.end,
                }),
                _ => None,
            };
        }
        last.ratio = length_ratio(&last.source, &last.target);
        last.status = status_for(&last.source, &last.target, last.ratio, options);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(texts: &[&str]) -> Vec<Segment> {
        let mut offset = 0;
        texts
            .iter()
            .map(|t| {
                let len = t.chars().count();
                let seg = Segment {
                    text: t.to_string(),
                    span: Some(Span {
                        start: offset,
                        end: offset + len,
                    }),
                };
                offset += len + 1;
                seg
            })
            .collect()
    }

    #[test]
    fn test_equal_lengths_align() {
        let out = align(
            &segs(&["مرحبا بكم.", "كيف حالك؟"]),
            &segs(&["Welcome.", "How are you?"]),
            &AlignOptions::default(),
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.status == AlignStatus::Aligned));
        assert_eq!(out[1].source_span, Some(Span { start: 11, end: 20 }));
    }

    #[test]
    fn test_trailing_source_entries() {
        let out = align(
            &segs(&["one.", "two.", "three."]),
            &segs(&["uno."]),
            &AlignOptions::default(),
        );
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].status, AlignStatus::TargetMissing);
        assert_eq!(out[2].target, "");
        assert_eq!(out[2].target_span, None);
    }

    #[test]
    fn test_trailing_target_entries() {
        let out = align(&[], &segs(&["orphan."]), &AlignOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].status, AlignStatus::SourceMissing);
        assert_eq!(out[0].source, "");
    }

    #[test]
    fn test_fold_appends_extra_targets_to_last_source() {
        let options = AlignOptions::default();
        let out = fold_orphan_targets(
            align(
                &segs(&["سافر.", "وصل."]),
                &segs(&["He left.", "He arrived.", "He rested."]),
                &options,
            ),
            &options,
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].source, "وصل.");
        assert_eq!(out[1].target, "He arrived. He rested.");
        assert_eq!(out[1].target_span, Some(Span { start: 9, end: 31 }));
        assert_eq!(out[1].status, AlignStatus::LengthOutlier);
        assert!(out.iter().all(|e| !e.source.is_empty()));
    }

    #[test]
    fn test_fold_drops_targets_without_any_source() {
        let options = AlignOptions::default();
        let out = fold_orphan_targets(align(&[], &segs(&["orphan."]), &options), &options);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fold_keeps_target_missing_entries() {
        let options = AlignOptions::default();
        let entries = align(&segs(&["one.", "two."]), &segs(&["uno."]), &options);
        assert_eq!(fold_orphan_targets(entries.clone(), &options), entries);
    }

    #[test]
    fn test_length_outlier() {
        let out = align(
            &segs(&["ab"]),
            &segs(&["a much much longer translation."]),
            &AlignOptions::default(),
        );
        assert_eq!(out[0].status, AlignStatus::LengthOutlier);
        assert_eq!(out[0].ratio, 15.5);
    }

    #[test]
    fn test_custom_bounds() {
        let loose = AlignOptions {
            min_ratio: 0.1,
            max_ratio: 20.0,
        };
        let out = align(&segs(&["ab"]), &segs(&["a much much longer translation."]), &loose);
        assert_eq!(out[0].status, AlignStatus::Aligned);
    }

    #[test]
    fn test_ratio_floors_empty_side() {
        assert_eq!(length_ratio("", ""), 1.0);
        assert_eq!(length_ratio("abcd", ""), 0.25);
        assert_eq!(length_ratio("", "abc"), 3.0);
    }
}
