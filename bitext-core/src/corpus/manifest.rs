//! Output artifacts: the parallel segment stream and the run manifest

use super::coverage::MissRecord;
use crate::align::AlignStatus;
use crate::error::{BitextError, Result};
use crate::language::Language;
use crate::segment::Span;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Segment stream file name inside the output directory
pub const SEGMENTS_FILE: &str = "parallel.jsonl";
/// Manifest file name inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Pointer back into an input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// One aligned unit of the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelSegment {
    /// `<rowId>:s<segmentIndex>`
    pub id: String,
    pub row_id: String,
    pub paragraph_index: usize,
    pub segment_index: usize,
    pub source: String,
    pub target: String,
    pub source_lang: Language,
    pub target_lang: Language,
    pub status: AlignStatus,
    pub ratio: f64,
    pub file_refs: Vec<FileRef>,
}

/// Per-origin counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    pub map_pairs: usize,
    pub folder_pairs: usize,
    pub auto_pairs: usize,
    pub single_file_entries: usize,
    pub matched_segments: usize,
}

/// Run manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub coverage_pct: f64,
    pub sources_found: usize,
    pub targets_found: usize,
    pub pair_count: usize,
    pub reasons_for_miss: BTreeMap<String, usize>,
    pub used_map: bool,
    pub summary: ManifestSummary,
    /// Sorted by reason then path, capped
    pub misses: Vec<MissRecord>,
    pub updated_at: DateTime<Utc>,
}

/// Round a ratio for serialization
pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 1000.0
}

fn output_error(path: &Path, source: std::io::Error) -> BitextError {
    BitextError::Output {
        path: path.to_path_buf(),
        source,
    }
}

/// Write segments as JSON lines in the given order
pub fn write_segments(path: &Path, segments: &[ParallelSegment]) -> Result<()> {
    let file = File::create(path).map_err(|e| output_error(path, e))?;
    let mut writer = BufWriter::new(file);

    for segment in segments {
        serde_json::to_writer(&mut writer, segment).map_err(|e| output_error(path, e.into()))?;
        writer.write_all(b"\n").map_err(|e| output_error(path, e))?;
    }

    writer.flush().map_err(|e| output_error(path, e))
}

/// Write the manifest as pretty-printed JSON
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let mut json = serde_json::to_string_pretty(manifest).map_err(|e| output_error(path, e.into()))?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| output_error(path, e))
}

/// Read a manifest written by a previous run
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let text = std::fs::read_to_string(path).map_err(|e| BitextError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| BitextError::malformed("json", path, e))
}

/// Read a segment stream written by a previous run
pub fn read_segments(path: &Path) -> Result<Vec<ParallelSegment>> {
    let text = std::fs::read_to_string(path).map_err(|e| BitextError::io(path, e))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| BitextError::malformed("jsonl", path, format!("line {}: {e}", i + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MissReason;
    use tempfile::TempDir;

    fn segment() -> ParallelSegment {
        ParallelSegment {
            id: "books/ar/ch1.txt#p0:s0".into(),
            row_id: "books/ar/ch1.txt#p0".into(),
            paragraph_index: 0,
            segment_index: 0,
            source: "مرحبا.".into(),
            target: "Hello.".into(),
            source_lang: Language::Ar,
            target_lang: Language::En,
            status: AlignStatus::Aligned,
            ratio: 1.0,
            file_refs: vec![
                FileRef {
                    path: "books/ar/ch1.txt".into(),
                    span: Some(Span { start: 0, end: 6 }),
                },
                FileRef {
                    path: "books/en/ch1.txt".into(),
                    span: None,
                },
            ],
        }
    }

    #[test]
    fn test_segment_field_names() {
        let value = serde_json::to_value(segment()).unwrap();
        assert_eq!(value["rowId"], "books/ar/ch1.txt#p0");
        assert_eq!(value["sourceLang"], "ar");
        assert_eq!(value["status"], "aligned");
        assert_eq!(value["fileRefs"][0]["span"]["end"], 6);
        assert!(value["fileRefs"][1].get("span").is_none());
    }

    #[test]
    fn test_manifest_field_names() {
        let manifest = Manifest {
            coverage_pct: 50.0,
            sources_found: 2,
            targets_found: 1,
            pair_count: 1,
            reasons_for_miss: BTreeMap::from([("no_target_match".to_string(), 1)]),
            used_map: true,
            summary: ManifestSummary::default(),
            misses: vec![MissRecord::new("a.txt", MissReason::NoTargetMatch)],
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&manifest).unwrap();
        for key in [
            "coveragePct",
            "sourcesFound",
            "targetsFound",
            "pairCount",
            "reasonsForMiss",
            "usedMap",
            "summary",
            "updatedAt",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value["summary"].get("singleFileEntries").is_some());
        assert_eq!(value["misses"][0]["reason"], "no_target_match");
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SEGMENTS_FILE);
        write_segments(&path, &[segment(), segment()]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(read_segments(&path).unwrap()[0], segment());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join(SEGMENTS_FILE);
        assert!(matches!(
            write_segments(&path, &[]),
            Err(BitextError::Output { .. })
        ));
    }

    #[test]
    fn test_round_ratio() {
        assert_eq!(round_ratio(2.0 / 3.0), 0.667);
    }
}
