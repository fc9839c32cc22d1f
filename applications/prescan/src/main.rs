/// Series prescan - refresh the local TheTVDB metadata cache
use clap::{Parser, Subcommand};
use series_prescan::config::PrescanConfig;
use series_sync::{LocalEntities, SyncCoordinator, SyncOutcome, TimestampStore};
use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tvdb_client::{ResourcePool, TvdbClient};

#[derive(Parser)]
#[command(name = "series-prescan")]
#[command(about = "Refresh cached TheTVDB series metadata", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PRESCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass against TheTVDB
    Run,
    /// Show the state of the local cache
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "series_prescan=info,series_sync=info,tvdb_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = PrescanConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => run(config).await?,
        Commands::Status => status(config).await?,
    }

    Ok(())
}

async fn run(config: PrescanConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting series prescan");
    tracing::info!("Cache root: {}", config.sync.cache_root.display());

    // The pool outlives every client built from it
    let pool = ResourcePool::new(config.tvdb.max_concurrent_requests);
    let client = Arc::new(TvdbClient::new(config.tvdb.client_config(), pool)?);
    let coordinator = SyncCoordinator::new(&config.sync, Arc::clone(&client), client);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling sync");
                cancel.cancel();
            }
        }
    });

    match coordinator.run(&cancel).await? {
        SyncOutcome::Fresh { age } => {
            tracing::info!(
                "Last sync was {} minutes ago, nothing to do",
                age.as_secs() / 60
            );
        }
        SyncOutcome::Completed(summary) => {
            tracing::info!(
                "Sync complete ({:?}): {} updated, {} skipped, marker {}",
                summary.mode,
                summary.updated,
                summary.skipped,
                summary.marker
            );
        }
    }

    Ok(())
}

async fn status(config: PrescanConfig) -> anyhow::Result<()> {
    let root = &config.sync.cache_root;
    let store = TimestampStore::new(root);

    println!("Cache root:  {}", root.display());

    let is_dir = tokio::fs::metadata(root)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        println!("Cache root does not exist yet");
        return Ok(());
    }

    let marker = store.read_marker().await?;
    let series = LocalEntities::scan(root).await?;

    if marker.is_blank() {
        println!("Marker:      (none, next run refreshes everything)");
    } else {
        println!("Marker:      {}", marker);
    }

    match store.last_synced().await? {
        Some(at) => println!("Last sync:   {}", at.to_rfc3339()),
        None => println!("Last sync:   never"),
    }

    println!("Series:      {}", series.len());

    Ok(())
}
