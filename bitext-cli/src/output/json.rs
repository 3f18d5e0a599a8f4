//! JSON summary formatter

use super::{total_misses, OutputFormatter};
use anyhow::Result;
use bitext_core::{Catalog, FileRecord, RunReport};
use serde_json::json;
use std::io::Write;

/// JSON formatter writing one pretty-printed document
pub struct JsonFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn write_report(&mut self, report: &RunReport, show_misses: usize) -> Result<()> {
        let manifest = &report.manifest;
        let misses: Vec<_> = manifest.misses.iter().take(show_misses).collect();

        let value = json!({
            "coveragePct": manifest.coverage_pct,
            "sourcesFound": manifest.sources_found,
            "targetsFound": manifest.targets_found,
            "pairCount": manifest.pair_count,
            "usedMap": manifest.used_map,
            "segmentsWritten": report.segments.len(),
            "summary": manifest.summary,
            "reasonsForMiss": manifest.reasons_for_miss,
            "totalMisses": total_misses(report),
            "misses": misses,
            "segmentsPath": report.segments_path,
            "manifestPath": report.manifest_path,
        });
        self.emit(&value)
    }

    fn write_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        let records: Vec<&FileRecord> = catalog.iter().map(|r| r.as_ref()).collect();
        let value = serde_json::to_value(records)?;
        self.emit(&value)
    }
}
