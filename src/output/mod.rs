//! Output module for warmup reports
//!
//! This module handles:
//! - Summarizing a warmup into counters
//! - Rendering the summary as text or JSON

mod json;
mod summary;
mod text;

pub use json::format_json_report;
pub use summary::{FailedUrl, WarmupSummary};
pub use text::format_text_summary;

use crate::config::OutputFormat;
use crate::crawler::CacheWarmupResult;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders a report in the requested format
pub fn render_report(
    format: OutputFormat,
    summary: &WarmupSummary,
    result: &CacheWarmupResult,
) -> OutputResult<String> {
    match format {
        OutputFormat::Text => Ok(format_text_summary(summary)),
        OutputFormat::Json => format_json_report(summary, result),
    }
}

/// Writes a report in the requested format
///
/// # Arguments
///
/// * `writer` - Destination, typically stdout
/// * `format` - Text or JSON
/// * `summary` - Counters for the run
/// * `result` - Per-URL results, only included in JSON output
pub fn write_report<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    summary: &WarmupSummary,
    result: &CacheWarmupResult,
) -> OutputResult<()> {
    let report = render_report(format, summary, result)?;
    writer.write_all(report.as_bytes())?;
    if !report.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report_text() {
        let mut buffer = Vec::new();
        write_report(
            &mut buffer,
            OutputFormat::Text,
            &WarmupSummary::default(),
            &CacheWarmupResult::new(),
        )
        .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("=== Cache Warmup Summary ==="));
    }

    #[test]
    fn test_write_report_json() {
        let mut buffer = Vec::new();
        write_report(
            &mut buffer,
            OutputFormat::Json,
            &WarmupSummary::default(),
            &CacheWarmupResult::new(),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value["summary"].is_object());
        assert!(buffer.ends_with(b"\n"));
    }
}
