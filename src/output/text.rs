//! Plain text report

use crate::output::summary::WarmupSummary;

/// Formats a warmup summary as a human-readable report
pub fn format_text_summary(summary: &WarmupSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Cache Warmup Summary ===\n\n");

    if let (Some(started), Some(duration)) = (summary.started_at, summary.duration_ms) {
        out.push_str(&format!("Started:  {}\n", started.to_rfc3339()));
        out.push_str(&format!("Duration: {:.2}s\n", duration as f64 / 1000.0));
    }
    if let Some(hash) = &summary.config_hash {
        out.push_str(&format!("Config:   {}\n", hash));
    }
    if summary.started_at.is_some() || summary.config_hash.is_some() {
        out.push('\n');
    }

    out.push_str("Sitemaps:\n");
    out.push_str(&format!("  Accepted: {}\n", summary.sitemaps_accepted));
    out.push_str(&format!("  Excluded: {}\n", summary.sitemaps_excluded));
    out.push_str(&format!("  Failed:   {}\n\n", summary.sitemaps_failed));

    out.push_str("URLs:\n");
    out.push_str(&format!("  Accepted: {}\n", summary.urls_accepted));
    out.push_str(&format!("  Excluded: {}\n\n", summary.urls_excluded));

    out.push_str("Crawl:\n");
    out.push_str(&format!(
        "  Successful: {} ({:.1}%)\n",
        summary.urls_successful,
        summary.success_rate()
    ));
    out.push_str(&format!("  Failed:     {}\n", summary.urls_failed));
    if summary.cancelled {
        out.push_str(&format!(
            "  Cancelled after first failure, {} urls skipped\n",
            summary.urls_skipped()
        ));
    }

    if !summary.failed_sitemaps.is_empty() {
        out.push_str("\nFailed sitemaps:\n");
        for sitemap in &summary.failed_sitemaps {
            out.push_str(&format!("  - {}\n", sitemap));
        }
    }

    if !summary.failed_urls.is_empty() {
        out.push_str("\nFailed urls:\n");
        for failed in &summary.failed_urls {
            out.push_str(&format!("  - {}: {}\n", failed.url, failed.error));
        }
    }

    out
}
