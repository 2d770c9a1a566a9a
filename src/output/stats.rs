//! Console summary of a finished run

use crate::output::traits::RunSummary;
use std::fmt::Write;

/// Formats a run summary for the console
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Summary ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Domains: {}", summary.total_domains);
    let _ = writeln!(out, "  Product pages found: {}", summary.total_products());
    let _ = writeln!(out, "  Pages visited: {}", summary.total_pages_visited());
    let _ = writeln!(out, "  Duration: {:.1}s", summary.duration_seconds);
    let _ = writeln!(out);

    let _ = writeln!(out, "Per Domain:");
    // Most products first
    let mut domains: Vec<_> = summary.domains.iter().collect();
    domains.sort_by(|a, b| b.product_count.cmp(&a.product_count));

    for domain in domains {
        let marker = if domain.completed { "" } else { " (failed)" };
        let _ = writeln!(
            out,
            "  {}: {} products, {} pages{}",
            domain.domain, domain.product_count, domain.pages_visited, marker
        );
    }

    let failed = summary.failed_domains();
    if failed > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} of {} domains failed", failed, summary.total_domains);
    }

    out
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    print!("{}", format_summary(summary));
}
