//! Statistics reporting.

use console::style;

use crate::fetch::RunStats;

/// Print the final run summary.
///
/// Printed even when the run partially failed, so the counts are always
/// available for the record.
pub fn print_run_stats(username: &str, stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style(format!("Run summary for {}:", username)).bold());
    println!("  Posts processed:     {}", stats.posts_processed);
    println!("  Posts skipped:       {} (already captured)", stats.posts_skipped);
    if stats.posts_failed > 0 {
        println!(
            "  Posts failed:        {}",
            style(stats.posts_failed).red()
        );
    }
    println!("  Files moved:         {}", stats.files_moved);
    println!("  Hashes written:      {}", stats.hashes_written);
    println!("  Metadata transcoded: {}", stats.metadata_transcoded);
    println!("{}", style("═".repeat(50)).dim());
}
