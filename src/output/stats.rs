//! Statistics reporting.

use console::style;

use crate::cache::MediaCache;
use crate::download::DispatchReport;
use crate::media::MediaItem;

/// Print the outcome of downloading one record.
pub fn print_dispatch_report(record_id: &str, report: &DispatchReport) {
    println!();
    println!("{}", style(format!("Statistics for {}:", record_id)).bold());
    println!("  Pictures: {}", report.pic_count);
    println!("  Videos:   {}", report.vid_count);
    println!("  GIFs:     {}", report.gif_count);
    if let Some(archive) = &report.archive {
        println!("  Archive:  {}", archive);
    }
    for (strategy, reason) in &report.strategy_failures {
        println!(
            "  {} {} strategy abandoned: {}",
            style("Fallback:").yellow(),
            strategy,
            reason
        );
    }
    if report.failed_count() > 0 {
        println!("  Failed:   {}", style(report.failed_count()).red());
        for failure in &report.failed {
            println!("    {} ({})", failure.filename, failure.reason);
        }
    }
    println!("  Total:    {} downloaded", report.total_downloaded());
}

/// Print one line per cached item.
pub fn print_items(items: &[MediaItem]) {
    for item in items {
        let quoted = item
            .referenced_by
            .as_deref()
            .map(|outer| format!(" (quoted by {})", outer))
            .unwrap_or_default();
        println!(
            "  {:<5} {:<40} {}{}",
            item.kind,
            item.filename(),
            style(&item.source_url).dim(),
            quoted
        );
    }
}

/// Print a summary of the session cache.
pub fn print_cache_summary(cache: &MediaCache) {
    let records = cache
        .items()
        .iter()
        .map(|item| item.record_id.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    println!(
        "Session cache: {} items from {} records",
        style(cache.len()).green(),
        style(records).green()
    );
}
