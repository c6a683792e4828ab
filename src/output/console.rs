//! Console output utilities.

use console::style;

use crate::download::{FeedJob, FriendsJob};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print a debug message.
pub fn print_debug(message: &str) {
    println!("{} {}", style("DEBUG").dim(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     BeFake                                            ║
║     Feed downloader for BeReal                        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print what a feed run is about to do.
pub fn print_feed_summary(job: &FeedJob) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Feed: {}", job.kind);
    println!("  Save location: {}", job.save_location);
    if let Some(template) = &job.realmoji_location {
        println!("  Realmoji location: {}", template);
    }
    if let Some(template) = &job.instant_realmoji_location {
        println!("  Instant realmoji location: {}", template);
    }
    println!("  Directory: {}", job.base_directory.display());
    println!();
}

/// Print the friends list download configuration.
pub fn print_friends_summary(job: &FriendsJob) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Save location: {}", job.save_location);
    println!("  Profile picture: {}", job.picture_name);
    println!("  Directory: {}", job.base_directory.display());
    println!();
}
