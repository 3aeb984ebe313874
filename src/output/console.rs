//! Console output utilities.

use console::style;

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

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     tweet-media-dl                                    ║
║     photos, videos and GIFs from GraphQL responses    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the settings a download runs with.
pub fn print_config_summary(record_id: &str, host: &str, download_dir: &str, bundle_images: bool) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Record: {}", record_id);
    println!("  Host: {}", host);
    println!("  Directory: {}", download_dir);
    println!(
        "  Images: {}",
        if bundle_images { "archive when more than one" } else { "individual" }
    );
    println!();
}
