//! Paragraph loaders for text and word-processor documents

use crate::catalog::{FileRecord, FormatKind};
use crate::error::{BitextError, Result};
use crate::segment::normalize_paragraphs;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Read a UTF-8 file, reporting invalid encoding as a malformed document
pub fn read_text(path: &Path, kind: &'static str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| BitextError::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| BitextError::malformed(kind, path, e))
}

/// Split text into raw paragraphs on blank lines
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}

/// Raw paragraphs of a plain-text document
pub fn text_paragraphs(path: &Path) -> Result<Vec<String>> {
    Ok(split_paragraphs(&read_text(path, "text")?))
}

/// Raw paragraphs of a `.docx` document, one per `w:p` element
pub fn docx_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| BitextError::io(path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| BitextError::malformed("docx", path, e))?;

    let mut xml = Vec::new();
    archive
        .by_name(DOCUMENT_ENTRY)
        .map_err(|e| BitextError::malformed("docx", path, format!("{DOCUMENT_ENTRY}: {e}")))?
        .read_to_end(&mut xml)
        .map_err(|e| BitextError::io(path, e))?;

    parse_document_xml(&xml).map_err(|reason| BitextError::malformed("docx", path, reason))
}

/// Collect paragraph texts from WordprocessingML
pub fn parse_document_xml(xml: &[u8]) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_reader(Cursor::new(xml));
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" | b"br" => {
                    if let Some(text) = current.as_mut() {
                        text.push(' ');
                    }
                }
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|err| err.to_string())?;
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(e)) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(format!(
                    "XML error at position {}: {err}",
                    reader.buffer_position()
                ))
            }
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Normalized, non-empty paragraphs of a paired document
pub fn load_paragraphs(record: &FileRecord) -> Result<Vec<String>> {
    let raw = match record.format {
        FormatKind::Text => text_paragraphs(&record.abs_path)?,
        FormatKind::DocxLike => docx_paragraphs(&record.abs_path)?,
        FormatKind::Json | FormatKind::Jsonl => {
            return Err(BitextError::malformed(
                record.format.as_str(),
                &record.abs_path,
                "structured files cannot be paired as documents",
            ))
        }
    };
    Ok(normalize_paragraphs(&raw))
}
