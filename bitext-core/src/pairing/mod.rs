//! Source/target document pairing
//!
//! Three tiers run in order, each consuming the files it pairs:
//!
//! 1. explicit pairs from the translation map
//! 2. folder rules from the translation map
//! 3. automatic matching by [`score::confidence`]
//!
//! Files left over that are not single-file bilingual documents become
//! misses.

pub mod map;
pub mod score;

pub use map::{FolderRule, PairEntry, TranslationMap};

use crate::catalog::{Catalog, Cataloger, FileRecord, FormatKind};
use crate::corpus::{MissReason, MissRecord};
use crate::language::Language;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// How a pair was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairOrigin {
    ExplicitMap,
    FolderRule,
    AutoMatched,
}

impl PairOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairOrigin::ExplicitMap => "explicit-map",
            PairOrigin::FolderRule => "folder-rule",
            PairOrigin::AutoMatched => "auto-matched",
        }
    }
}

/// A resolved source/target pair
#[derive(Debug, Clone)]
pub struct DocumentPair {
    pub source: Arc<FileRecord>,
    pub target: Arc<FileRecord>,
    pub origin: PairOrigin,
    /// Set for automatic matches only
    pub confidence: Option<f64>,
}

/// Result of the pairing stage
#[derive(Debug, Clone, Default)]
pub struct PairingOutcome {
    pub pairs: Vec<DocumentPair>,
    /// Paths of every pair member
    pub consumed: BTreeSet<String>,
    /// Misses found while pairing, never including a consumed path
    pub misses: Vec<MissRecord>,
}

impl PairingOutcome {
    /// Number of pairs found by one tier
    pub fn count(&self, origin: PairOrigin) -> usize {
        self.pairs.iter().filter(|p| p.origin == origin).count()
    }

    fn is_consumed(&self, record: &FileRecord) -> bool {
        self.consumed.contains(&record.path)
    }

    fn accept(
        &mut self,
        source: Arc<FileRecord>,
        target: Arc<FileRecord>,
        origin: PairOrigin,
        confidence: Option<f64>,
    ) {
        log::debug!(
            "{} pair: {} -> {}{}",
            origin.as_str(),
            source.path,
            target.path,
            confidence.map(|c| format!(" ({c:.2})")).unwrap_or_default()
        );
        self.consumed.insert(source.path.clone());
        self.consumed.insert(target.path.clone());
        self.pairs.push(DocumentPair {
            source,
            target,
            origin,
            confidence,
        });
    }

    fn miss(&mut self, path: impl Into<String>, reason: MissReason) {
        self.misses.push(MissRecord::new(path, reason));
    }
}

/// Resolves document pairs over a catalog
pub struct Pairer<'c, 'a> {
    cataloger: &'c Cataloger<'a>,
}

impl<'c, 'a> Pairer<'c, 'a> {
    pub fn new(cataloger: &'c Cataloger<'a>) -> Self {
        Self { cataloger }
    }

    /// Run all tiers
    ///
    /// The catalog may grow: explicit map members outside the scan roots are
    /// cataloged on demand.
    pub fn pair(&self, catalog: &mut Catalog, map: &TranslationMap) -> PairingOutcome {
        let mut outcome = PairingOutcome::default();

        self.explicit_pairs(catalog, map, &mut outcome);
        self.folder_rules(catalog, map, &mut outcome);
        self.auto_match(catalog, &mut outcome);
        self.leftovers(catalog, &mut outcome);

        // single-file documents are assembled on their own and never missed here
        let consumed = &outcome.consumed;
        outcome.misses.retain(|miss| {
            !consumed.contains(&miss.path)
                && !catalog.get(&miss.path).is_some_and(|r| r.is_single_file())
        });

        log::info!(
            "paired {} documents ({} explicit, {} folder, {} auto)",
            outcome.pairs.len(),
            outcome.count(PairOrigin::ExplicitMap),
            outcome.count(PairOrigin::FolderRule),
            outcome.count(PairOrigin::AutoMatched)
        );
        outcome
    }

    /// Resolve one explicit map member, or the reason it cannot be used
    ///
    /// `Err(None)` marks a structured member: it is left to the single-file
    /// path instead of being missed.
    fn resolve_member(
        &self,
        catalog: &mut Catalog,
        path: &Path,
    ) -> Result<Arc<FileRecord>, Option<MissRecord>> {
        let config = self.cataloger.config();
        let abs = config.resolve(path);
        let rel = self.cataloger.relative_path(&abs);

        let extension = abs
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let format = FormatKind::from_extension(&extension);

        if format == Some(FormatKind::DocxLike) && !config.include_docx() {
            return Err(Some(MissRecord::new(rel, MissReason::UnsupportedFormat)));
        }

        match self.cataloger.resolve(catalog, path) {
            Some(record) if record.format.is_structured() => {
                log::info!(
                    "explicit pair member {} is a record file, assembling it on its own",
                    record.path
                );
                Err(None)
            }
            Some(record) => Ok(record),
            None if abs.is_file() => Err(Some(MissRecord::new(rel, MissReason::UnsupportedFormat))),
            None => Err(Some(MissRecord::new(rel, MissReason::NoTargetMatch))),
        }
    }

    fn explicit_pairs(
        &self,
        catalog: &mut Catalog,
        map: &TranslationMap,
        outcome: &mut PairingOutcome,
    ) {
        for entry in &map.pairs {
            let source = self.resolve_member(catalog, &entry.source);
            let target = self.resolve_member(catalog, &entry.target);

            match (source, target) {
                (Ok(source), Ok(target)) => {
                    if outcome.is_consumed(&source) || outcome.is_consumed(&target) {
                        log::warn!(
                            "explicit pair {} -> {} reuses an already paired file, skipping",
                            source.path,
                            target.path
                        );
                        continue;
                    }
                    outcome.accept(source, target, PairOrigin::ExplicitMap, None);
                }
                (source, target) => {
                    for miss in [source.err(), target.err()].into_iter().flatten().flatten() {
                        log::warn!("explicit pair member {} unusable: {}", miss.path, miss.reason);
                        outcome.miss(miss.path, miss.reason);
                    }
                }
            }
        }
    }

    fn folder_rules(&self, catalog: &mut Catalog, map: &TranslationMap, outcome: &mut PairingOutcome) {
        let config = self.cataloger.config();

        for rule in &map.folders {
            let source_dir = config.resolve(&rule.source_dir);
            let target_dir = config.resolve(&rule.target_dir);

            let pattern = match glob::Pattern::new(&rule.pattern) {
                Ok(pattern) => pattern,
                Err(e) => {
                    log::warn!("folder rule pattern '{}' is invalid: {e}", rule.pattern);
                    continue;
                }
            };
            if !source_dir.is_dir() {
                log::warn!("folder rule source {} is not a directory", source_dir.display());
                continue;
            }

            let files = WalkDir::new(&source_dir)
                .max_depth(config.max_depth())
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file());

            for entry in files {
                let Ok(remainder) = entry.path().strip_prefix(&source_dir) else {
                    continue;
                };
                let remainder_str = remainder.to_string_lossy().replace('\\', "/");
                if !pattern.matches(&remainder_str) {
                    continue;
                }

                let Some(source) = self.cataloger.resolve(catalog, entry.path()) else {
                    continue;
                };
                if source.format.is_structured() || outcome.is_consumed(&source) {
                    continue;
                }

                let target = self
                    .cataloger
                    .resolve(catalog, &target_dir.join(remainder))
                    .filter(|target| !target.format.is_structured() && !outcome.is_consumed(target));

                match target {
                    Some(target) => outcome.accept(source, target, PairOrigin::FolderRule, None),
                    None => outcome.miss(source.path.clone(), MissReason::NoTargetMatch),
                }
            }
        }
    }

    fn auto_match(&self, catalog: &Catalog, outcome: &mut PairingOutcome) {
        let config = self.cataloger.config();
        let (source_lang, target_lang) = (config.source_language(), config.target_language());
        let threshold = config.auto_threshold();

        let candidates = |language: Language| -> Vec<&Arc<FileRecord>> {
            catalog
                .iter()
                .filter(|r| r.language == language && !r.is_single_file() && !outcome.is_consumed(r))
                .collect()
        };
        let sources = candidates(source_lang);
        let targets = candidates(target_lang);

        let mut scored: Vec<(f64, &Arc<FileRecord>, &Arc<FileRecord>)> = Vec::new();
        for &source in &sources {
            for &target in &targets {
                let score = score::confidence(source, target);
                if score >= threshold {
                    scored.push((score, source, target));
                }
            }
        }

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.path.cmp(&b.1.path))
                .then_with(|| a.2.path.cmp(&b.2.path))
        });

        let accepted: Vec<(f64, Arc<FileRecord>, Arc<FileRecord>)> = {
            let mut taken = BTreeSet::new();
            scored
                .into_iter()
                .filter(|(_, s, t)| {
                    if taken.contains(&s.path) || taken.contains(&t.path) {
                        return false;
                    }
                    taken.insert(s.path.clone());
                    taken.insert(t.path.clone());
                    true
                })
                .map(|(score, s, t)| (score, Arc::clone(s), Arc::clone(t)))
                .collect()
        };

        for (score, source, target) in accepted {
            outcome.accept(source, target, PairOrigin::AutoMatched, Some(score));
        }
    }

    fn leftovers(&self, catalog: &Catalog, outcome: &mut PairingOutcome) {
        let leftover: Vec<MissRecord> = catalog
            .iter()
            .filter(|r| !r.is_single_file() && !outcome.is_consumed(r))
            .map(|r| {
                let reason = if r.language == Language::Unknown {
                    MissReason::LangDetectionFailed
                } else {
                    MissReason::NoTargetMatch
                };
                MissRecord::new(r.path.clone(), reason)
            })
            .collect();
        outcome.misses.extend(leftover);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    const AR: &str = "هذا نص عربي للاختبار.";
    const EN: &str = "This is English test text.";

    fn run(dir: &TempDir, map: &TranslationMap) -> PairingOutcome {
        let config = RunConfig::for_root(dir.path());
        let cataloger = Cataloger::new(&config).unwrap();
        let mut catalog = cataloger.scan();
        Pairer::new(&cataloger).pair(&mut catalog, map)
    }

    fn pair_paths(outcome: &PairingOutcome) -> Vec<(&str, &str, PairOrigin)> {
        outcome
            .pairs
            .iter()
            .map(|p| (p.source.path.as_str(), p.target.path.as_str(), p.origin))
            .collect()
    }

    #[test]
    fn test_auto_match_parallel_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", AR);
        write(dir.path(), "books/en/ch1.txt", EN);
        write(dir.path(), "books/ar/ch2.txt", AR);
        write(dir.path(), "books/en/ch2.txt", EN);

        let outcome = run(&dir, &TranslationMap::default());
        assert_eq!(
            pair_paths(&outcome),
            vec![
                ("books/ar/ch1.txt", "books/en/ch1.txt", PairOrigin::AutoMatched),
                ("books/ar/ch2.txt", "books/en/ch2.txt", PairOrigin::AutoMatched),
            ]
        );
        assert_eq!(outcome.pairs[0].confidence, Some(0.97));
        assert!(outcome.misses.is_empty());
    }

    #[test]
    fn test_below_threshold_records_misses() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/alpha.txt", AR);
        write(dir.path(), "docs/beta.txt", EN);
        write(dir.path(), "docs/gamma.txt", "12345 67890");

        let outcome = run(&dir, &TranslationMap::default());
        assert!(outcome.pairs.is_empty());
        assert_eq!(
            outcome.misses,
            vec![
                MissRecord::new("docs/alpha.txt", MissReason::NoTargetMatch),
                MissRecord::new("docs/beta.txt", MissReason::NoTargetMatch),
                MissRecord::new("docs/gamma.txt", MissReason::LangDetectionFailed),
            ]
        );
    }

    #[test]
    fn test_explicit_pair_wins_over_auto() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", AR);
        write(dir.path(), "books/en/ch1.txt", EN);
        write(dir.path(), "books/en/other.txt", EN);

        let map = TranslationMap {
            pairs: vec![PairEntry {
                source: "books/ar/ch1.txt".into(),
                target: "books/en/other.txt".into(),
            }],
            folders: vec![],
        };
        let outcome = run(&dir, &map);
        assert_eq!(
            pair_paths(&outcome),
            vec![("books/ar/ch1.txt", "books/en/other.txt", PairOrigin::ExplicitMap)]
        );
        assert_eq!(
            outcome.misses,
            vec![MissRecord::new("books/en/ch1.txt", MissReason::NoTargetMatch)]
        );
    }

    #[test]
    fn test_explicit_pair_with_missing_member() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", AR);
        write(dir.path(), "books/en/ch1.txt", EN);

        let map = TranslationMap {
            pairs: vec![PairEntry {
                source: "books/ar/ch1.txt".into(),
                target: "books/en/gone.txt".into(),
            }],
            folders: vec![],
        };
        let outcome = run(&dir, &map);
        // the resolvable member stays available to later tiers
        assert_eq!(outcome.count(PairOrigin::AutoMatched), 1);
        assert_eq!(
            outcome.misses,
            vec![MissRecord::new("books/en/gone.txt", MissReason::NoTargetMatch)]
        );
    }

    #[test]
    fn test_explicit_docx_member_when_disabled() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", AR);
        write(dir.path(), "books/en/ch1.docx", "zip bytes");

        let config = RunConfig::builder(dir.path())
            .include_docx(false)
            .build()
            .unwrap();
        let cataloger = Cataloger::new(&config).unwrap();
        let mut catalog = cataloger.scan();
        let map = TranslationMap {
            pairs: vec![PairEntry {
                source: "books/ar/ch1.txt".into(),
                target: "books/en/ch1.docx".into(),
            }],
            folders: vec![],
        };
        let outcome = Pairer::new(&cataloger).pair(&mut catalog, &map);
        assert!(outcome.pairs.is_empty());
        assert!(outcome
            .misses
            .contains(&MissRecord::new("books/en/ch1.docx", MissReason::UnsupportedFormat)));
    }

    #[test]
    fn test_explicit_record_member_is_left_to_single_file_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/notes.jsonl", "{\"ar\":\"ملاحظة.\",\"en\":\"A note.\"}\n");
        write(dir.path(), "books/en/x.txt", EN);

        let map = TranslationMap {
            pairs: vec![PairEntry {
                source: "books/notes.jsonl".into(),
                target: "books/en/x.txt".into(),
            }],
            folders: vec![],
        };
        let outcome = run(&dir, &map);

        assert!(outcome.pairs.is_empty());
        assert!(!outcome.misses.iter().any(|m| m.path == "books/notes.jsonl"));
        assert_eq!(
            outcome.misses,
            vec![MissRecord::new("books/en/x.txt", MissReason::NoTargetMatch)]
        );
    }

    #[test]
    fn test_folder_rule_never_misses_marker_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/source/both.md", "## AR\nمرحبا بكم\n## EN\nWelcome\n");

        let map = TranslationMap {
            pairs: vec![],
            folders: vec![FolderRule {
                source_dir: "content/source".into(),
                target_dir: "content/dest".into(),
                pattern: "**/*.md".into(),
            }],
        };
        let outcome = run(&dir, &map);
        assert!(outcome.pairs.is_empty());
        assert!(outcome.misses.is_empty());
    }

    #[test]
    fn test_folder_rule() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/source/a/intro.md", AR);
        write(dir.path(), "content/source/a/outro.md", AR);
        write(dir.path(), "content/source/notes.txt", AR);
        write(dir.path(), "content/dest/a/intro.md", EN);

        let map = TranslationMap {
            pairs: vec![],
            folders: vec![FolderRule {
                source_dir: "content/source".into(),
                target_dir: "content/dest".into(),
                pattern: "**/*.md".into(),
            }],
        };
        let outcome = run(&dir, &map);
        assert_eq!(
            pair_paths(&outcome),
            vec![(
                "content/source/a/intro.md",
                "content/dest/a/intro.md",
                PairOrigin::FolderRule
            )]
        );
        assert!(outcome
            .misses
            .contains(&MissRecord::new("content/source/a/outro.md", MissReason::NoTargetMatch)));
    }

    #[test]
    fn test_single_file_documents_are_not_misses() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/records.jsonl", "{\"ar\":\"x\",\"en\":\"y\"}\n");
        write(dir.path(), "books/bilingual.md", "## AR\nمرحبا\n## EN\nHello\n");

        let outcome = run(&dir, &TranslationMap::default());
        assert!(outcome.pairs.is_empty());
        assert!(outcome.misses.is_empty());
    }

    #[test]
    fn test_pairs_are_disjoint() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "books/ar/ch1.txt", AR);
        write(dir.path(), "books/en/ch1.txt", EN);
        write(dir.path(), "books/en/ch1_v2.txt", EN);

        let outcome = run(&dir, &TranslationMap::default());
        let mut seen = BTreeSet::new();
        for pair in &outcome.pairs {
            assert!(seen.insert(pair.source.path.clone()));
            assert!(seen.insert(pair.target.path.clone()));
        }
        for miss in &outcome.misses {
            assert!(!seen.contains(&miss.path));
        }
    }
}
