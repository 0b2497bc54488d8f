mod config;
mod db;
mod dump;
mod errors;
mod ingest;
mod store;
#[cfg(test)]
mod testing;
mod youtube;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{DatabaseSettings, YoutubeSettings};
use crate::db::init_db;
use crate::errors::AppError;
use crate::ingest::{IngestionPipeline, TimeWindow};
use crate::store::PgStore;
use crate::youtube::YoutubeClient;

/// Collects the live streams of a YouTube playlist into a named event.
#[derive(Parser)]
#[command(name = "relive-aggregator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store every video of a playlist under an event
    Retrieve {
        /// Event the videos belong to, created if absent
        event_name: String,

        /// Source playlist id
        playlist_id: String,

        /// Include a video only if its actual start time is not after this RFC 3339 time
        #[arg(long, value_parser = parse_rfc3339)]
        start_before: Option<DateTime<FixedOffset>>,

        /// Include a video only if its actual start time is not before this RFC 3339 time
        #[arg(long, value_parser = parse_rfc3339)]
        start_after: Option<DateTime<FixedOffset>>,
    },

    /// Write all events and their videos as JSON under a directory
    Dump {
        /// Output directory, created if absent
        result_dir: PathBuf,
    },
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| format!("invalid RFC 3339 time: {}", e))
}

async fn retrieve(
    event_name: String,
    playlist_id: String,
    window: TimeWindow,
) -> Result<(), AppError> {
    let youtube_settings = YoutubeSettings::from_env()?;
    let database_settings = DatabaseSettings::from_env()?;

    let pool = init_db(&database_settings).await?;
    let store = PgStore::new(pool.clone());
    let client = YoutubeClient::new(youtube_settings);

    tracing::info!("playlistId {}", playlist_id);

    let result = IngestionPipeline::new(&client, &store)
        .run(&event_name, &playlist_id, &window)
        .await;
    pool.close().await;

    let summary = result?;
    tracing::info!(
        "Stored {} new videos ({} already present, {} outside the time window)",
        summary.created,
        summary.already_stored,
        summary.outside_window
    );
    Ok(())
}

async fn dump(result_dir: PathBuf) -> Result<(), AppError> {
    let database_settings = DatabaseSettings::from_env()?;

    let target_dir = std::env::current_dir()?.join(result_dir);
    let pool = init_db(&database_settings).await?;
    let store = PgStore::new(pool.clone());

    let result = dump::dump(&store, &target_dir).await;
    pool.close().await;

    let report = result?;
    tracing::info!(
        "Dumped {} events into {} files",
        report.events,
        report.files.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relive_aggregator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Retrieve {
            event_name,
            playlist_id,
            start_before,
            start_after,
        } => retrieve(event_name, playlist_id, TimeWindow::new(start_before, start_after)).await,
        Commands::Dump { result_dir } => dump(result_dir).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.log_chain();
            ExitCode::FAILURE
        }
    }
}
