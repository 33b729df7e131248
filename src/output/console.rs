//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Instagram Downloader                              ║
║     Profile capture with MD5 custody manifests        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print run configuration summary.
pub fn print_config_summary(username: &str, profile_dir: &str, concurrency: usize) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Profile:     {}", username);
    println!("  Directory:   {}", profile_dir);
    println!("  Concurrency: {}", concurrency);
    println!();
}
