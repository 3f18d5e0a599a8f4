//! Corpus assembly
//!
//! The assembler turns work units (document pairs and single-file bilingual
//! documents) into [`ParallelSegment`]s. Units are independent and run on a
//! rayon pool; results are collected in unit order so the output is the same
//! for every thread count. A unit that fails to load becomes a miss and the
//! run goes on.

mod coverage;
pub mod manifest;
pub mod markers;
pub mod records;
pub mod sources;

pub use coverage::{reason_counts, CoverageSnapshot, CoverageTracker, MissLog, MissReason, MissRecord};
pub use manifest::{FileRef, Manifest, ManifestSummary, ParallelSegment};

use crate::align::{self, AlignStatus, AlignedEntry};
use crate::catalog::{Catalog, Cataloger, FileRecord};
use crate::config::{defaults, RunConfig};
use crate::error::{BitextError, Result};
use crate::language::Language;
use crate::pairing::{DocumentPair, PairOrigin, Pairer, PairingOutcome, TranslationMap};
use crate::segment::{LocaleRegistry, Segment, Segmenter};
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Receives progress notifications while units are processed
pub trait ProgressSink: Send + Sync {
    /// Called once with the number of units
    fn start(&self, _total: usize) {}

    /// Called after each unit
    fn advance(&self, _unit: &str) {}

    /// Called when all units are done
    fn finish(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// One independent piece of work
#[derive(Debug, Clone)]
pub enum WorkUnit {
    Pair(DocumentPair),
    Markers(Arc<FileRecord>),
    Records(Arc<FileRecord>),
}

impl WorkUnit {
    /// Path naming the unit
    pub fn path(&self) -> &str {
        match self {
            WorkUnit::Pair(pair) => &pair.source.path,
            WorkUnit::Markers(record) | WorkUnit::Records(record) => &record.path,
        }
    }
}

/// Result of one unit
#[derive(Debug, Default)]
struct UnitOutput {
    segments: Vec<ParallelSegment>,
    /// Pair members to treat as paired
    paired: Vec<String>,
    origin: Option<PairOrigin>,
    single_file: bool,
}

/// Segments, aligns and accounts for work units
pub struct CorpusAssembler<'a> {
    config: &'a RunConfig,
    segmenter: Segmenter,
    coverage: CoverageTracker,
    misses: MissLog,
}

impl<'a> CorpusAssembler<'a> {
    pub fn new(config: &'a RunConfig, segmenter: Segmenter) -> Self {
        Self {
            config,
            segmenter,
            coverage: CoverageTracker::new(),
            misses: MissLog::new(),
        }
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    pub fn misses(&self) -> &MissLog {
        &self.misses
    }

    fn segment(&self, paragraph: &str, language: Language) -> Vec<Segment> {
        let hint = language.is_concrete().then_some(language);
        self.segmenter.segment(paragraph, hint)
    }

    /// Align one row and append its segments
    #[allow(clippy::too_many_arguments)]
    fn emit_row(
        &self,
        out: &mut Vec<ParallelSegment>,
        row_id: &str,
        paragraph_index: usize,
        source: &[Segment],
        target: &[Segment],
        langs: (Language, Language),
        refs: (&str, &str),
    ) {
        let options = self.config.align_options();
        let entries = align::align(source, target, &options);

        let sources = entries.iter().filter(|e| !e.source.is_empty()).count();
        let targets = entries.iter().filter(|e| !e.target.is_empty()).count();
        let entries = align::fold_orphan_targets(entries, &options);
        let matched = entries
            .iter()
            .filter(|e| e.status == AlignStatus::Aligned)
            .count();
        self.coverage.add_sources(sources);
        self.coverage.add_targets(targets);
        self.coverage.add_matched(matched);

        out.extend(entries.into_iter().enumerate().map(|(segment_index, entry)| {
            to_segment(row_id, paragraph_index, segment_index, entry, langs, refs)
        }));
    }

    /// Paragraph-by-paragraph alignment of a document pair
    pub fn process_pair(&self, pair: &DocumentPair) -> Result<Vec<ParallelSegment>> {
        let source_paragraphs = sources::load_paragraphs(&pair.source)?;
        let target_paragraphs = sources::load_paragraphs(&pair.target)?;
        let langs = self.pair_languages(pair);

        let mut out = Vec::new();
        let count = source_paragraphs.len().max(target_paragraphs.len());
        for index in 0..count {
            let source = source_paragraphs
                .get(index)
                .map(|p| self.segment(p, langs.0))
                .unwrap_or_default();
            let target = target_paragraphs
                .get(index)
                .map(|p| self.segment(p, langs.1))
                .unwrap_or_default();

            if source.is_empty() && target.is_empty() {
                log::debug!("{} paragraph {index}: nothing to align", pair.source.path);
                continue;
            }

            let row_id = format!("{}#p{index}", pair.source.path);
            self.emit_row(
                &mut out,
                &row_id,
                index,
                &source,
                &target,
                langs,
                (&pair.source.path, &pair.target.path),
            );
        }

        Ok(out)
    }

    fn pair_languages(&self, pair: &DocumentPair) -> (Language, Language) {
        let pick = |found: Language, fallback: Language| {
            if found.is_concrete() {
                found
            } else {
                fallback
            }
        };
        (
            pick(pair.source.language, self.config.source_language()),
            pick(pair.target.language, self.config.target_language()),
        )
    }

    /// Block-pair alignment of an inline-marker file
    pub fn process_markers(&self, record: &FileRecord) -> Result<Vec<ParallelSegment>> {
        let text = match record.format {
            crate::catalog::FormatKind::DocxLike => {
                sources::docx_paragraphs(&record.abs_path)?.join("\n")
            }
            _ => sources::read_text(&record.abs_path, "text")?,
        };

        let langs = (self.config.source_language(), self.config.target_language());
        let pairs = markers::parse_marker_pairs(&text, langs.0, langs.1);

        let mut out = Vec::new();
        for (index, pair) in pairs.iter().enumerate() {
            let source = self.segment(&pair.source, langs.0);
            let target = self.segment(&pair.target, langs.1);
            if source.is_empty() && target.is_empty() {
                continue;
            }
            let row_id = format!("{}#m{index}", record.path);
            self.emit_row(&mut out, &row_id, index, &source, &target, langs, (&record.path, &record.path));
        }
        Ok(out)
    }

    /// Record-by-record alignment of a JSON or JSONL file
    pub fn process_records(&self, record: &FileRecord) -> Result<Vec<ParallelSegment>> {
        let langs = (self.config.source_language(), self.config.target_language());
        let found = records::load_records(&record.abs_path, record.format, langs.0, langs.1)?;

        let mut out = Vec::new();
        for (index, entry) in found.iter().enumerate() {
            let source = self.segment(&entry.source, langs.0);
            let target = self.segment(&entry.target, langs.1);
            if source.is_empty() && target.is_empty() {
                continue;
            }
            let row_id = format!("{}#{}", record.path, entry.id);
            self.emit_row(&mut out, &row_id, index, &source, &target, langs, (&record.path, &record.path));
        }
        Ok(out)
    }

    /// Process one unit, turning failures into misses
    fn process(&self, unit: &WorkUnit) -> UnitOutput {
        match unit {
            WorkUnit::Pair(pair) => match self.process_pair(pair) {
                Ok(segments) => UnitOutput {
                    segments,
                    paired: vec![pair.source.path.clone(), pair.target.path.clone()],
                    origin: Some(pair.origin),
                    single_file: false,
                },
                Err(e) => {
                    log::warn!("{e}");
                    let failed = failing_path(&e, pair);
                    for member in [&pair.source, &pair.target] {
                        let reason = if Some(member.path.as_str()) == failed.as_deref() {
                            MissReason::UnsupportedFormat
                        } else {
                            MissReason::NoTargetMatch
                        };
                        self.misses.record(member.path.clone(), reason);
                    }
                    UnitOutput::default()
                }
            },
            WorkUnit::Markers(record) | WorkUnit::Records(record) => {
                let result = match unit {
                    WorkUnit::Markers(_) => self.process_markers(record),
                    _ => self.process_records(record),
                };
                match result {
                    Ok(segments) if segments.is_empty() => {
                        self.misses.record(record.path.clone(), MissReason::TooShort);
                        UnitOutput::default()
                    }
                    Ok(segments) => UnitOutput {
                        segments,
                        single_file: true,
                        ..UnitOutput::default()
                    },
                    Err(e) => {
                        log::warn!("{e}");
                        self.misses
                            .record(record.path.clone(), MissReason::UnsupportedFormat);
                        UnitOutput::default()
                    }
                }
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, units: &[WorkUnit], progress: &dyn ProgressSink) -> Result<Vec<UnitOutput>> {
        let threads = self.config.threads().unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| BitextError::Config(format!("failed to build thread pool: {e}")))?;

        Ok(pool.install(|| {
            units
                .par_iter()
                .map(|unit| {
                    let output = self.process(unit);
                    progress.advance(unit.path());
                    output
                })
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, units: &[WorkUnit], progress: &dyn ProgressSink) -> Result<Vec<UnitOutput>> {
        Ok(units
            .iter()
            .map(|unit| {
                let output = self.process(unit);
                progress.advance(unit.path());
                output
            })
            .collect())
    }

    /// Process every unit and build the manifest
    pub fn assemble(
        &self,
        units: &[WorkUnit],
        used_map: bool,
        progress: &dyn ProgressSink,
    ) -> Result<(Vec<ParallelSegment>, Manifest)> {
        progress.start(units.len());
        let outputs = self.process_all(units, progress)?;
        progress.finish();

        let mut summary = ManifestSummary::default();
        let mut paired = BTreeSet::new();
        let mut segments = Vec::new();

        for output in outputs {
            match output.origin {
                Some(PairOrigin::ExplicitMap) => summary.map_pairs += 1,
                Some(PairOrigin::FolderRule) => summary.folder_pairs += 1,
                Some(PairOrigin::AutoMatched) => summary.auto_pairs += 1,
                None => {}
            }
            if output.single_file {
                summary.single_file_entries += 1;
            }
            paired.extend(output.paired);
            segments.extend(output.segments);
        }

        let coverage = self.coverage.snapshot();
        summary.matched_segments = coverage.matched_segments;

        let misses = self.misses.sorted(&paired);
        let manifest = Manifest {
            coverage_pct: coverage.coverage_pct(),
            sources_found: coverage.sources_found,
            targets_found: coverage.targets_found,
            pair_count: summary.map_pairs + summary.folder_pairs + summary.auto_pairs,
            reasons_for_miss: reason_counts(&misses),
            used_map,
            summary,
            misses: misses.into_iter().take(defaults::MANIFEST_MISS_CAP).collect(),
            updated_at: Utc::now(),
        };

        Ok((segments, manifest))
    }
}

/// Which member of a pair an error is about
fn failing_path(error: &BitextError, pair: &DocumentPair) -> Option<String> {
    let path = match error {
        BitextError::Io { path, .. } | BitextError::MalformedDocument { path, .. } => path,
        _ => return None,
    };
    [&pair.source, &pair.target]
        .into_iter()
        .find(|member| &member.abs_path == path)
        .map(|member| member.path.clone())
}

fn to_segment(
    row_id: &str,
    paragraph_index: usize,
    segment_index: usize,
    entry: AlignedEntry,
    (source_lang, target_lang): (Language, Language),
    (source_path, target_path): (&str, &str),
) -> ParallelSegment {
    let file_refs = if source_path == target_path {
        vec![FileRef {
            path: source_path.to_string(),
            span: None,
        }]
    } else {
        let mut refs = Vec::with_capacity(2);
        if !entry.source.is_empty() {
            refs.push(FileRef {
                path: source_path.to_string(),
                span: entry.source_span,
            });
        }
        if !entry.target.is_empty() {
            refs.push(FileRef {
                path: target_path.to_string(),
                span: entry.target_span,
            });
        }
        refs
    };

    ParallelSegment {
        id: format!("{row_id}:s{segment_index}"),
        row_id: row_id.to_string(),
        paragraph_index,
        segment_index,
        source: entry.source,
        target: entry.target,
        source_lang,
        target_lang,
        status: entry.status,
        ratio: manifest::round_ratio(entry.ratio),
        file_refs,
    }
}

/// Everything a run produced
#[derive(Debug)]
pub struct RunReport {
    pub catalog: Catalog,
    pub pairing: PairingOutcome,
    pub segments: Vec<ParallelSegment>,
    pub manifest: Manifest,
    pub segments_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Build the segmenter for a run, registering extra locale files
pub fn build_segmenter(config: &RunConfig) -> Result<Segmenter> {
    let mut registry = LocaleRegistry::embedded()?;
    for path in config.locale_files() {
        let code = registry.register_file(&config.resolve(path))?;
        log::info!("registered locale '{code}' from {}", path.display());
    }
    Ok(Segmenter::new(Arc::new(registry), config.source_language())
        .with_min_len(config.min_segment_chars()))
}

/// Work units for a pairing outcome: pairs first, then single files
pub fn work_units(catalog: &Catalog, pairing: &PairingOutcome) -> Vec<WorkUnit> {
    let mut units: Vec<WorkUnit> = pairing.pairs.iter().cloned().map(WorkUnit::Pair).collect();
    units.extend(
        catalog
            .iter()
            .filter(|r| r.is_single_file() && !pairing.consumed.contains(&r.path))
            .map(|r| {
                if r.format.is_structured() {
                    WorkUnit::Records(Arc::clone(r))
                } else {
                    WorkUnit::Markers(Arc::clone(r))
                }
            }),
    );
    units
}

/// Full run without progress reporting
pub fn run(config: &RunConfig) -> Result<RunReport> {
    run_with_progress(config, &NoProgress)
}

/// Full run: catalog, pair, assemble, write both artifacts
pub fn run_with_progress(config: &RunConfig, progress: &dyn ProgressSink) -> Result<RunReport> {
    config.validate()?;
    let segmenter = build_segmenter(config)?;

    let cataloger = Cataloger::new(config)?;
    let mut catalog = cataloger.scan();

    let (map, used_map) = TranslationMap::load_or_empty(config.map_path());
    let pairing = Pairer::new(&cataloger).pair(&mut catalog, &map);

    let units = work_units(&catalog, &pairing);
    log::info!("processing {} work units", units.len());

    let assembler = CorpusAssembler::new(config, segmenter);
    assembler.misses().extend(pairing.misses.iter().cloned());
    let (segments, manifest) = assembler.assemble(&units, used_map, progress)?;

    let out_dir = config.output_dir();
    std::fs::create_dir_all(out_dir).map_err(|source| BitextError::Output {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let segments_path = out_dir.join(manifest::SEGMENTS_FILE);
    let manifest_path = out_dir.join(manifest::MANIFEST_FILE);
    manifest::write_segments(&segments_path, &segments)?;
    manifest::write_manifest(&manifest_path, &manifest)?;

    log::info!(
        "wrote {} segments, coverage {:.2}%",
        segments.len(),
        manifest.coverage_pct
    );

    Ok(RunReport {
        catalog,
        pairing,
        segments,
        manifest,
        segments_path,
        manifest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn assembler(config: &RunConfig) -> CorpusAssembler<'_> {
        CorpusAssembler::new(config, build_segmenter(config).unwrap())
    }

    fn record(config: &RunConfig, rel: &str) -> Arc<FileRecord> {
        let cataloger = Cataloger::new(config).unwrap();
        Arc::new(cataloger.record(&config.project_root().join(rel)).unwrap())
    }

    #[test]
    fn test_unequal_paragraph_counts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", "الفقرة الأولى.\n\nالفقرة الثانية.\n\nالفقرة الثالثة.\n");
        write(dir.path(), "books/en/ch1.txt", "First paragraph.\n\nSecond paragraph.\n");
        let config = RunConfig::for_root(dir.path());

        let pair = DocumentPair {
            source: record(&config, "books/ar/ch1.txt"),
            target: record(&config, "books/en/ch1.txt"),
            origin: PairOrigin::ExplicitMap,
            confidence: None,
        };
        let asm = assembler(&config);
        let segments = asm.process_pair(&pair).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].status, AlignStatus::TargetMissing);
        assert_eq!(segments[2].target, "");
        assert_eq!(segments[2].row_id, "books/ar/ch1.txt#p2");
        assert_eq!(segments[2].id, "books/ar/ch1.txt#p2:s0");
        assert_eq!(segments[2].file_refs.len(), 1);
        assert_eq!(asm.coverage().snapshot().matched_segments, 2);
        assert_eq!(asm.coverage().snapshot().sources_found, 3);
    }

    #[test]
    fn test_marker_file() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "books/bilingual.md",
            "## AR\nمرحبا بكم. كيف حالكم؟\n\n## EN\nWelcome. How are you?\n",
        );
        let config = RunConfig::for_root(dir.path());
        let segments = assembler(&config)
            .process_markers(&record(&config, "books/bilingual.md"))
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].row_id, "books/bilingual.md#m0");
        assert_eq!(segments[1].target, "How are you?");
        assert_eq!(
            segments[0].file_refs,
            vec![FileRef {
                path: "books/bilingual.md".into(),
                span: None
            }]
        );
    }

    #[test]
    fn test_malformed_records_become_miss() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/broken.json", "{ nope");
        let config = RunConfig::for_root(dir.path());
        let asm = assembler(&config);
        let unit = WorkUnit::Records(record(&config, "books/broken.json"));

        let output = asm.process(&unit);
        assert!(output.segments.is_empty());
        assert_eq!(
            asm.misses().sorted(&BTreeSet::new()),
            vec![MissRecord::new("books/broken.json", MissReason::UnsupportedFormat)]
        );
    }

    #[test]
    fn test_empty_records_are_too_short() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/empty.json", "{\"title\": \"nothing bilingual\"}");
        let config = RunConfig::for_root(dir.path());
        let asm = assembler(&config);
        asm.process(&WorkUnit::Records(record(&config, "books/empty.json")));
        assert_eq!(
            asm.misses().sorted(&BTreeSet::new())[0].reason,
            MissReason::TooShort
        );
    }

    #[test]
    fn test_failed_pair_member_is_unsupported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", "نص عربي.");
        write(dir.path(), "books/en/ch1.docx", "definitely not a zip");
        let config = RunConfig::for_root(dir.path());
        let asm = assembler(&config);

        let unit = WorkUnit::Pair(DocumentPair {
            source: record(&config, "books/ar/ch1.txt"),
            target: record(&config, "books/en/ch1.docx"),
            origin: PairOrigin::AutoMatched,
            confidence: Some(0.92),
        });
        let output = asm.process(&unit);
        assert!(output.paired.is_empty());
        assert_eq!(
            asm.misses().sorted(&BTreeSet::new()),
            vec![
                MissRecord::new("books/ar/ch1.txt", MissReason::NoTargetMatch),
                MissRecord::new("books/en/ch1.docx", MissReason::UnsupportedFormat),
            ]
        );
    }

    #[test]
    fn test_run_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", "جملة أولى. جملة ثانية.");
        write(dir.path(), "books/en/ch1.txt", "First sentence. Second sentence.");
        let config = RunConfig::builder(dir.path()).threads(Some(2)).build().unwrap();

        let report = run(&config).unwrap();
        assert!(report.segments_path.exists());
        assert!(report.manifest_path.exists());
        assert_eq!(report.manifest.pair_count, 1);
        assert_eq!(report.manifest.summary.auto_pairs, 1);
        assert_eq!(report.manifest.coverage_pct, 100.0);
        assert!(!report.manifest.used_map);
    }
}
