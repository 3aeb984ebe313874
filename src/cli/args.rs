//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::fs::naming::TimestampZone;

/// Tweet media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tweet-media-dl",
    version,
    about = "Extract and download media from tweet GraphQL responses",
    long_about = "Extracts photos, videos and GIFs from captured GraphQL responses into a\n\
                  session cache, then downloads a record's media as individual files or a\n\
                  single ZIP archive. Records missing from the cache are fetched directly."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Directory downloads are written to.
    #[arg(short = 'd', long = "directory", global = true)]
    pub download_directory: Option<PathBuf>,

    /// Raw Cookie header of the browser session.
    #[arg(long, global = true, env = "TMD_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// CSRF token (defaults to the ct0 cookie).
    #[arg(long = "csrf-token", global = true, env = "TMD_CSRF_TOKEN", hide_env_values = true)]
    pub csrf_token: Option<String>,

    /// Platform host for the detail endpoint.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Session cache file.
    #[arg(long = "cache-file", global = true)]
    pub cache_file: Option<PathBuf>,

    /// Download every image individually instead of bundling a ZIP.
    #[arg(long = "no-archive", global = true)]
    pub no_archive: bool,

    /// Time zone for the timestamp part of filenames.
    #[arg(long = "timestamp-zone", global = true, value_enum)]
    pub timestamp_zone: Option<TimestampZoneArg>,

    /// Hide download progress information.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the deduplicated media items found in response files as JSON.
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merge media items found in response files into the session cache.
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show cached items, optionally only those of one record.
    List {
        /// Record id or status URL.
        record: Option<String>,
    },

    /// Download a record's media (cache first, then the detail endpoint).
    Download {
        /// Record id or status URL.
        record: String,
    },

    /// Clear the session cache.
    Reset,
}

/// CLI timestamp zone argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimestampZoneArg {
    Utc,
    Local,
}

impl From<TimestampZoneArg> for TimestampZone {
    fn from(arg: TimestampZoneArg) -> Self {
        match arg {
            TimestampZoneArg::Utc => TimestampZone::Utc,
            TimestampZoneArg::Local => TimestampZone::Local,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(cookie) = &self.cookie {
            config.account.cookie = Some(cookie.clone());
        }

        if let Some(token) = &self.csrf_token {
            config.account.csrf_token = Some(token.clone());
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(host) = &self.host {
            config.options.host = host.clone();
        }

        if let Some(zone) = self.timestamp_zone {
            config.options.timestamp_zone = zone.into();
        }

        if let Some(cache_file) = &self.cache_file {
            config.session.cache_file = Some(cache_file.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.no_archive {
            config.options.bundle_images = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_with_overrides() {
        let args = Args::try_parse_from([
            "tweet-media-dl",
            "download",
            "https://x.com/alice/status/42",
            "--no-archive",
            "--host",
            "twitter.com",
            "--timestamp-zone",
            "utc",
        ])
        .unwrap();

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert!(matches!(args.command, Command::Download { ref record } if record.ends_with("/42")));
        assert!(!config.options.bundle_images);
        assert_eq!(config.options.host, "twitter.com");
        assert_eq!(config.options.timestamp_zone, TimestampZone::Utc);
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = Args::try_parse_from(["tweet-media-dl", "reset"]).unwrap();
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert!(config.options.bundle_images);
        assert!(config.options.show_downloads);
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_ingest_requires_files() {
        assert!(Args::try_parse_from(["tweet-media-dl", "ingest"]).is_err());
    }
}
