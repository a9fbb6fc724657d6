//! PDF ingestion: one JSON record per PDF in a directory.
//!
//! Independent of the question-answering pipeline. The records it writes are
//! the input of [`crate::index`].

mod pdf;

pub use pdf::{decode_pdf_string, extract_pdf, format_creation_date, NOT_AVAILABLE};

use crate::error::Result;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Text and document information extracted from one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfRecord {
    pub file_name: String,
    pub title: String,
    pub author: String,
    /// `YYYY-MM-DD` or `N/A`.
    pub creation_date: String,
    pub subject: String,
    pub keywords: String,
    pub text: String,
}

impl PdfRecord {
    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// JSON files written.
    pub written: Vec<PathBuf>,
    /// PDFs that could not be processed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Regular files in `dir` with a `.pdf` extension, sorted by path.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Write `<stem>.json` into `output_dir` with 4-space indentation.
pub fn write_record(record: &PdfRecord, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}.json", record.stem()));

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;

    std::fs::write(&path, buf)?;
    Ok(path)
}

/// Convert every PDF in `input_dir` to a JSON record in `output_dir`.
///
/// A file that fails is logged and reported, and the run continues.
pub fn ingest_directory(
    input_dir: &Path,
    output_dir: &Path,
    progress: &ProgressBar,
) -> Result<IngestReport> {
    std::fs::create_dir_all(output_dir)?;

    let pdfs = list_pdfs(input_dir)?;
    info!("Total PDF files found: {}", pdfs.len());
    progress.set_length(pdfs.len() as u64);

    let mut report = IngestReport::default();
    for path in pdfs {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            progress.set_message(name.to_string());
        }

        match extract_pdf(&path).and_then(|record| write_record(&record, output_dir)) {
            Ok(written) => report.written.push(written),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.failed.push((path, e.to_string()));
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}

/// Read a record previously written by [`write_record`].
pub fn read_record(path: &Path) -> Result<PdfRecord> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
