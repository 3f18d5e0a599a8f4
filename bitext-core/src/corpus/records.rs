//! Bilingual records from JSON and JSONL files

use crate::catalog::FormatKind;
use crate::error::{BitextError, Result};
use crate::language::Language;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

const ID_FIELDS: &[&str] = &["id", "key", "uid", "segmentId", "segment_id"];
const ARABIC_FIELDS: &[&str] = &["ar", "arabic", "text_ar", "textAr"];
const ENGLISH_FIELDS: &[&str] = &["en", "english", "text_en", "textEn"];
const SOURCE_FIELDS: &[&str] = &["source", "src", "original"];
const TARGET_FIELDS: &[&str] = &["target", "tgt", "translation"];

/// One (id, source, target) record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilingualRecord {
    pub id: String,
    pub source: String,
    pub target: String,
}

fn language_fields(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ar => ARABIC_FIELDS,
        Language::En => ENGLISH_FIELDS,
        _ => &[],
    }
}

fn first_text(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

fn record_id(object: &Map<String, Value>) -> Option<String> {
    ID_FIELDS.iter().find_map(|field| match object.get(*field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

struct Extractor {
    source: Language,
    target: Language,
    records: Vec<BilingualRecord>,
    seen: HashSet<String>,
}

impl Extractor {
    fn new(source: Language, target: Language) -> Self {
        Self {
            source,
            target,
            records: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn visit(&mut self, value: &Value) {
        match value {
            Value::Array(items) => items.iter().for_each(|item| self.visit(item)),
            Value::Object(object) => {
                self.take(object);
                for child in object.values() {
                    if child.is_object() || child.is_array() {
                        self.visit(child);
                    }
                }
            }
            _ => {}
        }
    }

    fn take(&mut self, object: &Map<String, Value>) {
        let source = first_text(object, language_fields(self.source))
            .or_else(|| first_text(object, SOURCE_FIELDS));
        let target = first_text(object, language_fields(self.target))
            .or_else(|| first_text(object, TARGET_FIELDS));

        if source.is_none() && target.is_none() {
            return;
        }

        let position = self.records.len() + 1;
        let base = record_id(object).unwrap_or_else(|| format!("r{position}"));
        let mut id = base.clone();
        let mut suffix = position;
        while !self.seen.insert(id.clone()) {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }

        self.records.push(BilingualRecord {
            id,
            source: source.unwrap_or_default(),
            target: target.unwrap_or_default(),
        });
    }
}

/// Extract records from a parsed JSON value, walking nested containers
pub fn extract_records(value: &Value, source: Language, target: Language) -> Vec<BilingualRecord> {
    let mut extractor = Extractor::new(source, target);
    extractor.visit(value);
    extractor.records
}

/// Parse JSON or JSONL text into records
pub fn parse_records(
    text: &str,
    format: FormatKind,
    path: &Path,
    source: Language,
    target: Language,
) -> Result<Vec<BilingualRecord>> {
    match format {
        FormatKind::Json => {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| BitextError::malformed("json", path, e))?;
            Ok(extract_records(&value, source, target))
        }
        FormatKind::Jsonl => {
            let mut extractor = Extractor::new(source, target);
            for (line_no, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(line).map_err(|e| {
                    BitextError::malformed("jsonl", path, format!("line {}: {e}", line_no + 1))
                })?;
                extractor.visit(&value);
            }
            Ok(extractor.records)
        }
        other => Err(BitextError::malformed(
            other.as_str(),
            path,
            "not a structured document",
        )),
    }
}

/// Read and parse a structured file
pub fn load_records(
    path: &Path,
    format: FormatKind,
    source: Language,
    target: Language,
) -> Result<Vec<BilingualRecord>> {
    let text = super::sources::read_text(path, format.as_str())?;
    parse_records(&text, format, path, source, target)
}
