//! Statistics reporting.

use console::style;

use crate::download::FeedStats;

/// Print statistics for a run, e.g. "memories feed" or "friends list".
pub fn print_feed_stats(label: &str, stats: &FeedStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style(format!("Statistics for {}:", label)).bold());
    println!("  Items:     {}", stats.items);
    println!("  Posts:     {}", stats.posts);
    println!("  Photos:    {}", stats.photos);
    println!("  Videos:    {}", stats.videos);
    println!("  Realmojis: {}", stats.realmojis);
    if stats.has_failures() {
        println!("  Failed:    {}", style(stats.items_failed).red());
    }
    println!("  Total:     {} downloaded", stats.total_downloaded());
    println!("{}", style("═".repeat(50)).dim());
}

/// Print a summary line for quick viewing.
pub fn print_summary(stats: &FeedStats) {
    println!(
        "Downloaded: {} photos, {} videos, {} realmojis ({} failed)",
        style(stats.photos).green(),
        style(stats.videos).green(),
        style(stats.realmojis).green(),
        style(stats.items_failed).yellow()
    );
}
