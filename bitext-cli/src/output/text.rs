//! Plain text summary formatter

use super::{total_misses, OutputFormatter};
use anyhow::Result;
use bitext_core::{Catalog, PairOrigin, RunReport};
use std::io::Write;

/// Human-readable formatter
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn write_report(&mut self, report: &RunReport, show_misses: usize) -> Result<()> {
        let manifest = &report.manifest;
        let w = &mut self.writer;

        writeln!(
            w,
            "Coverage: {:.2}% ({} of {} source segments matched)",
            manifest.coverage_pct, manifest.summary.matched_segments, manifest.sources_found
        )?;
        writeln!(
            w,
            "Segments: {} sources, {} targets, {} rows written",
            manifest.sources_found,
            manifest.targets_found,
            report.segments.len()
        )?;
        writeln!(
            w,
            "Pairs: {} (map {}, folder {}, auto {}), single-file entries: {}",
            manifest.pair_count,
            report.pairing.count(PairOrigin::ExplicitMap),
            report.pairing.count(PairOrigin::FolderRule),
            report.pairing.count(PairOrigin::AutoMatched),
            manifest.summary.single_file_entries
        )?;
        writeln!(
            w,
            "Translation map: {}",
            if manifest.used_map { "used" } else { "not used" }
        )?;
        writeln!(w, "Corpus: {}", report.segments_path.display())?;
        writeln!(w, "Manifest: {}", report.manifest_path.display())?;

        let total = total_misses(report);
        if total == 0 {
            writeln!(w, "Misses: none")?;
        } else {
            writeln!(w, "Misses: {total}")?;
            for (reason, count) in &manifest.reasons_for_miss {
                writeln!(w, "  {reason:<22} {count}")?;
            }

            let shown = show_misses.min(manifest.misses.len());
            if shown > 0 {
                writeln!(w)?;
                for miss in manifest.misses.iter().take(shown) {
                    writeln!(w, "  {:<22} {}", miss.reason, miss.path)?;
                }
                if total > shown {
                    writeln!(w, "  ... and {} more", total - shown)?;
                }
            }
        }

        w.flush()?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        for record in catalog.iter() {
            writeln!(
                self.writer,
                "{:<8} {:<10} {:<7} {}",
                record.language.code(),
                record.format.as_str(),
                if record.has_markers { "markers" } else { "-" },
                record.path
            )?;
        }

        let counts = catalog.language_counts();
        let summary: Vec<String> = counts
            .iter()
            .map(|(lang, count)| format!("{lang} {count}"))
            .collect();
        writeln!(
            self.writer,
            "{} files ({})",
            catalog.len(),
            if summary.is_empty() {
                "none".to_string()
            } else {
                summary.join(", ")
            }
        )?;

        self.writer.flush()?;
        Ok(())
    }
}
