//! tweet-media-dl - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tweet_media_dl::{
    api::TweetDetailApi,
    cache::{extract_response, ingest_response, MediaCache},
    cli::{Args, Command},
    config::{parse_record_id, validate_config, Config},
    dedup::dedupe,
    download::{
        download_record, media_client, BlobStore, Dispatcher, FsDownloadSink, HttpFetcher,
        RecordLookup,
    },
    error::{exit_codes, Error, Result},
    output::{
        create_spinner, print_banner, print_cache_summary, print_config_summary,
        print_dispatch_report, print_error, print_info, print_items, print_success,
        print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_) | Error::CredentialMissing | Error::Http(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_) | Error::Archive(_) | Error::BlobRevoked(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                Error::NoMediaFound(_) => ExitCode::from(exit_codes::NO_MEDIA as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging; stdout is reserved for command output
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    match &args.command {
        Command::Extract { files } => run_extract(&config, files),
        Command::Ingest { files } => run_ingest(&config, files),
        Command::List { record } => run_list(&config, record.as_deref()),
        Command::Download { record } => run_download(&config, record).await,
        Command::Reset => run_reset(&config),
    }
}

fn run_extract(config: &Config, files: &[PathBuf]) -> Result<()> {
    let options = config.extract_options();
    let mut items = Vec::new();

    for file in files {
        let body = std::fs::read(file)?;
        items.extend(extract_response(&body, &options));
    }

    let items = dedupe(items);
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn run_ingest(config: &Config, files: &[PathBuf]) -> Result<()> {
    let cache_file = config.cache_file();
    let mut cache = MediaCache::load(&cache_file)?;
    let options = config.extract_options();

    for file in files {
        let body = std::fs::read(file)?;
        let added = ingest_response(&body, &mut cache, &options);
        print_info(&format!("{}: {} new items", file.display(), added));
    }

    cache.save(&cache_file)?;
    print_cache_summary(&cache);
    Ok(())
}

fn run_list(config: &Config, record: Option<&str>) -> Result<()> {
    let cache = MediaCache::load(&config.cache_file())?;

    match record {
        Some(record) => {
            let record_id = parse_record_id(record)?;
            let items = cache.query_by_record(&record_id);
            print_info(&format!(
                "Record {}: {} media ({} including quoted records)",
                record_id,
                cache.count_for_record(&record_id),
                items.len()
            ));
            print_items(&items);
        }
        None => {
            print_cache_summary(&cache);
            print_items(cache.items());
        }
    }

    Ok(())
}

async fn run_download(config: &Config, record: &str) -> Result<()> {
    let record_id = parse_record_id(record)?;
    let download_dir = config.download_directory();

    print_banner();
    print_config_summary(
        &record_id,
        &config.options.host,
        &download_dir.display().to_string(),
        config.options.bundle_images,
    );

    let cache = MediaCache::load(&config.cache_file())?;
    let client = media_client(&config.account.user_agent)?;
    let blobs = BlobStore::new();

    let sink = FsDownloadSink::new(client.clone(), download_dir, blobs.clone())
        .with_progress(config.options.show_downloads);
    let dispatcher = Dispatcher::new(
        Arc::new(sink),
        Arc::new(HttpFetcher::new(client.clone())),
        blobs,
    )
    .with_bundling(config.options.bundle_images)
    .with_release_delay(config.archive_release_delay());

    let api = TweetDetailApi::new(client, &config.options.host, config.credentials())
        .with_options(config.extract_options());

    let lookups: [&dyn RecordLookup; 2] = [&cache, &api];

    let spinner = config
        .options
        .show_downloads
        .then(|| create_spinner(&format!("Downloading media of {}...", record_id)));
    let result = download_record(&record_id, &lookups, &dispatcher).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    print_dispatch_report(&record_id, &report);

    if report.failed_count() > 0 {
        return Err(Error::Download(format!(
            "{} file(s) failed",
            report.failed_count()
        )));
    }

    if report.fell_back() {
        print_warning("Archive could not be built; images were downloaded individually");
    }
    print_success(&format!("{} media downloaded", report.total_downloaded()));
    Ok(())
}

fn run_reset(config: &Config) -> Result<()> {
    let cache_file = config.cache_file();
    let mut cache = MediaCache::load(&cache_file)?;
    let dropped = cache.len();

    cache.reset();
    cache.save(&cache_file)?;

    print_success(&format!("Session cache cleared ({} items dropped)", dropped));
    Ok(())
}
