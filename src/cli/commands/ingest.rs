//! Ingest command: PDFs to JSON records.

use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::{ingest_directory, list_pdfs};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the ingest command.
pub fn run_ingest(input_dir: &str, output: Option<String>, settings: &Settings) -> Result<()> {
    let input = Settings::expand_path(input_dir);
    let output_dir = output
        .map(|o| Settings::expand_path(&o))
        .unwrap_or_else(|| settings.ingest_output_dir());

    if !input.is_dir() {
        anyhow::bail!("Input directory not found: {}", input.display());
    }

    let total = list_pdfs(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?
        .len();
    Output::info(&format!("Total PDF files found: {}", total));
    if total == 0 {
        return Ok(());
    }

    let progress = Output::progress_bar(total as u64, "Processing PDFs");
    let report = ingest_directory(&input, &output_dir, &progress)?;

    for (path, reason) in &report.failed {
        Output::warning(&format!("{}: {}", display_name(path), reason));
    }
    Output::success(&format!(
        "Wrote {} JSON records to {}",
        report.written.len(),
        output_dir.display()
    ));
    if !report.failed.is_empty() {
        Output::warning(&format!("{} file(s) could not be processed", report.failed.len()));
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
