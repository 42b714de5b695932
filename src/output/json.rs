//! JSON report

use crate::crawler::CacheWarmupResult;
use crate::output::summary::WarmupSummary;
use crate::output::OutputResult;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a WarmupSummary,
    result: &'a CacheWarmupResult,
}

/// Formats the summary and every per-URL result as pretty-printed JSON
pub fn format_json_report(summary: &WarmupSummary, result: &CacheWarmupResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&JsonReport { summary, result })?)
}
