// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use memdex::config::{CommandLineInput, HarvestConfig, WallApiConfig};
use memdex::output::{deliver, render_table, DeliveryTarget};
use memdex::{
    harvest_all, AppError, BaseUrl, CachedTransport, ChannelHttpClient, CursorFetcher,
    CursorStreamSource, ListingTransport, PagedAlbumSource, PhotoSource, ProgressBars,
    ProgressObserver, SilentProgress, WallHttpClient,
};
use std::fs;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sets up logging configuration.
///
/// Console output goes to stderr so the table on stdout stays clean.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("memdex.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the shared wall transport, cached unless caching is disabled.
fn wall_transport(config: &WallApiConfig) -> Result<Arc<dyn ListingTransport>, AppError> {
    let http_client = WallHttpClient::new(config)?;
    if config.cache_capacity == 0 {
        log::info!("Cache disabled; all requests go to the wall API");
        Ok(Arc::new(http_client))
    } else {
        log::info!("Cache enabled ({} responses)", config.cache_capacity);
        Ok(Arc::new(CachedTransport::new(
            http_client,
            config.cache_capacity,
        )))
    }
}

/// Resolves every configured group and channel into a photo source.
async fn build_sources(
    config: &HarvestConfig,
    progress: Arc<dyn ProgressObserver>,
    cancel: &CancellationToken,
) -> Result<Vec<Box<dyn PhotoSource>>, AppError> {
    let mut sources: Vec<Box<dyn PhotoSource>> = Vec::new();

    if let Some(wall) = &config.wall {
        let transport = wall_transport(wall)?;
        for group in &config.groups {
            let source = PagedAlbumSource::connect(
                Arc::clone(&transport),
                group,
                Arc::clone(&progress),
                cancel.clone(),
            )
            .await?;
            sources.push(Box::new(source));
        }
    }

    if let Some(gateway) = &config.channel_gateway {
        let fetcher = Arc::new(channel_fetcher(gateway, cancel)?);
        for channel in &config.channels {
            sources.push(Box::new(CursorStreamSource::new(
                channel.clone(),
                Arc::clone(&fetcher),
                Arc::clone(&progress),
            )));
        }
    }

    Ok(sources)
}

fn channel_fetcher(
    gateway: &BaseUrl,
    cancel: &CancellationToken,
) -> Result<CursorFetcher, AppError> {
    let client = ChannelHttpClient::new(gateway.clone())?;
    Ok(CursorFetcher::new(Arc::new(client), cancel.clone()))
}

/// Harvests every source and delivers the combined table.
async fn execute_harvest(config: &HarvestConfig) -> Result<(), AppError> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; stopping after the current request");
            on_interrupt.cancel();
        }
    });

    let progress: Arc<dyn ProgressObserver> = if config.show_progress {
        Arc::new(ProgressBars::new())
    } else {
        Arc::new(SilentProgress)
    };

    let sources = build_sources(config, progress, &cancel).await?;
    let rows = harvest_all(&sources).await?;

    let table = render_table(&rows)?;
    let target = DeliveryTarget::from_option(config.output_file.clone());
    deliver(&target, &table)?;

    if let DeliveryTarget::WriteFile { path } = &target {
        eprintln!("✓ {} photos saved to {}", rows.len(), path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = HarvestConfig::resolve(cli)?;

    if let Err(err) = execute_harvest(&config).await {
        if err.is_data_inconsistency() {
            log::error!("The remote returned inconsistent data; no table was written");
        }
        return Err(err.into());
    }

    Ok(())
}
