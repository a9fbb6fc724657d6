//! PDF text and document-information extraction.

use super::PdfRecord;
use crate::error::{Result, SpotterError};
use chrono::NaiveDate;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use tracing::debug;

/// Value recorded for metadata the document does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Extract one record from a PDF file.
pub fn extract_pdf(path: &Path) -> Result<PdfRecord> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SpotterError::Ingest(format!("Invalid file name: {:?}", path)))?
        .to_string();

    let bytes = std::fs::read(path)?;
    let doc = Document::load_mem(&bytes)
        .map_err(|e| SpotterError::Ingest(format!("{}: {}", file_name, e)))?;

    let text = extract_text(&doc)?;
    let info = info_dictionary(&doc);
    let field = |key: &[u8]| {
        info.and_then(|d| info_string(&doc, d, key))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    debug!("Extracted {} characters from {}", text.len(), file_name);

    Ok(PdfRecord {
        title: field(b"Title"),
        author: field(b"Author"),
        creation_date: format_creation_date(
            info.and_then(|d| info_string(&doc, d, b"CreationDate")).as_deref(),
        ),
        subject: field(b"Subject"),
        keywords: field(b"Keywords"),
        file_name,
        text,
    })
}

/// Text of every page, concatenated in page order.
fn extract_text(doc: &Document) -> Result<String> {
    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        text.push_str(&doc.extract_text(&[*page_number])?);
    }
    Ok(text)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info)?.as_dict().ok()
}

fn info_string(doc: &Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    match resolve(doc, info.get(key).ok()?)? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with a byte-order mark,
/// otherwise PDFDocEncoding.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| pdf_doc_char(b)).collect()
}

/// One PDFDocEncoding byte. Outside 0x18-0x1F and 0x80-0xA0 the encoding
/// agrees with Latin-1; its undefined codes become U+FFFD.
fn pdf_doc_char(byte: u8) -> char {
    match byte {
        0x18 => '\u{02D8}',
        0x19 => '\u{02C7}',
        0x1A => '\u{02C6}',
        0x1B => '\u{02D9}',
        0x1C => '\u{02DD}',
        0x1D => '\u{02DB}',
        0x1E => '\u{02DA}',
        0x1F => '\u{02DC}',
        0x80 => '\u{2022}',
        0x81 => '\u{2020}',
        0x82 => '\u{2021}',
        0x83 => '\u{2026}',
        0x84 => '\u{2014}',
        0x85 => '\u{2013}',
        0x86 => '\u{0192}',
        0x87 => '\u{2044}',
        0x88 => '\u{2039}',
        0x89 => '\u{203A}',
        0x8A => '\u{2212}',
        0x8B => '\u{2030}',
        0x8C => '\u{201E}',
        0x8D => '\u{201C}',
        0x8E => '\u{201D}',
        0x8F => '\u{2018}',
        0x90 => '\u{2019}',
        0x91 => '\u{201A}',
        0x92 => '\u{2122}',
        0x93 => '\u{FB01}',
        0x94 => '\u{FB02}',
        0x95 => '\u{0141}',
        0x96 => '\u{0152}',
        0x97 => '\u{0160}',
        0x98 => '\u{0178}',
        0x99 => '\u{017D}',
        0x9A => '\u{0131}',
        0x9B => '\u{0142}',
        0x9C => '\u{0153}',
        0x9D => '\u{0161}',
        0x9E => '\u{017E}',
        0xA0 => '\u{20AC}',
        0x9F | 0xAD => char::REPLACEMENT_CHARACTER,
        other => other as char,
    }
}

/// Convert a PDF date (`D:YYYYMMDDHHmmSS...`) to `YYYY-MM-DD`.
///
/// Missing or unparsable dates yield [`NOT_AVAILABLE`].
pub fn format_creation_date(raw: Option<&str>) -> String {
    raw.map(|r| r.trim())
        .map(|r| r.strip_prefix("D:").unwrap_or(r))
        .and_then(|r| r.get(..8))
        .and_then(|ymd| NaiveDate::parse_from_str(ymd, "%Y%m%d").ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
