//! Discovery and alignment of bilingual manuscripts
//!
//! This crate turns a loosely organized tree of Arabic and English documents
//! into a sentence-aligned parallel corpus. A run goes through four stages:
//!
//! - **Catalog**: walk the configured roots and classify every supported file
//!   by format and language, deriving the keys used for matching
//! - **Pairing**: resolve source/target documents through an explicit
//!   translation map, folder rules and confidence-scored auto-matching
//! - **Segmentation and alignment**: split paragraphs into sentences with
//!   locale rules (regex fallback) and align them position by position
//! - **Assembly**: drive the above for every pair and single-file bilingual
//!   document, track coverage and miss reasons, write the corpus and manifest
//!
//! # Example
//!
//! ```rust,no_run
//! use bitext_core::{run, RunConfig};
//!
//! let config = RunConfig::builder("/path/to/project")
//!     .exclude(["**/drafts/**"])
//!     .build()
//!     .unwrap();
//!
//! let report = run(&config).unwrap();
//! println!("coverage: {:.1}%", report.manifest.coverage_pct);
//! ```

pub mod align;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod language;
pub mod pairing;
pub mod segment;

pub use align::{align, AlignOptions, AlignStatus, AlignedEntry};
pub use catalog::{Catalog, Cataloger, FileRecord, FormatKind};
pub use config::{RunConfig, RunConfigBuilder};
pub use corpus::{
    run, run_with_progress, CorpusAssembler, CoverageTracker, Manifest, MissLog, MissReason,
    MissRecord, NoProgress, ParallelSegment, ProgressSink, RunReport,
};
pub use error::{BitextError, Result};
pub use language::{classify, detect, Detection, Language};
pub use pairing::{DocumentPair, PairOrigin, Pairer, PairingOutcome, TranslationMap};
pub use segment::{LocaleRegistry, Segment, Segmenter, SentenceSegmenter, Span};
