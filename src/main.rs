//! Fabula - Story Generation Service with a Feedback Loop
//!
//! This is the main entry point for the Fabula server: the HTTP boundary,
//! the shared feedback store, and the daily batch scheduler are constructed
//! here and torn down together on shutdown.

use clap::{Parser, Subcommand};
use fabula_core::{
    api::{ApiServer, ApiServerConfig},
    config::FabulaConfig,
    error::Result,
    scheduler::{BatchScheduler, CountingProcessor},
    services::{AggregationService, IngestionService, StoryService},
    storage::{libsql::LibsqlFeedbackStore, FeedbackStore},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fabula")]
#[command(about = "Story generation service with a feedback ingestion pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path (overrides config file and FABULA_DATABASE__PATH)
    #[arg(long)]
    db_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the daily feedback scheduler
    Serve {
        /// Server address (overrides config)
        #[arg(long)]
        addr: Option<String>,

        /// Don't start the daily feedback-processing scheduler
        #[arg(long)]
        no_scheduler: bool,
    },

    /// Initialize the feedback database
    Init,

    /// Print the current feedback summary
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use the specified level for fabula, but keep noisy HTTP-layer crates
    // at warn
    let filter = EnvFilter::new(format!(
        "fabula={level},fabula_core={level},tower_http=warn,hyper=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Fabula v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = FabulaConfig::load()?;
    if let Some(db_path) = cli.db_path {
        config.database.path = db_path;
    }

    match cli.command {
        Some(Commands::Serve { addr, no_scheduler }) => serve(config, addr, no_scheduler).await,
        Some(Commands::Init) => {
            debug!("Initializing database...");
            LibsqlFeedbackStore::from_path(&config.database.path).await?;
            println!("Feedback database ready at {}", config.database.path);
            Ok(())
        }
        Some(Commands::Summary) => {
            let store: Arc<dyn FeedbackStore> =
                Arc::new(LibsqlFeedbackStore::from_path(&config.database.path).await?);
            let summary = AggregationService::new(store).summarize().await?;

            println!("Feedback Summary:");
            println!("Thumbs Up: {}", summary.positive);
            println!("Thumbs Down: {}", summary.negative);
            Ok(())
        }
        None => serve(config, None, false).await,
    }
}

/// Construct the store, services, and scheduler, then serve until ctrl-c
async fn serve(config: FabulaConfig, addr: Option<String>, no_scheduler: bool) -> Result<()> {
    let addr: SocketAddr = addr
        .unwrap_or_else(|| config.server.addr.clone())
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    // Single store handle, shared by the services and the scheduler
    let store: Arc<dyn FeedbackStore> =
        Arc::new(LibsqlFeedbackStore::from_path(&config.database.path).await?);

    let ingestion = Arc::new(IngestionService::new(store.clone()));
    let aggregation = Arc::new(AggregationService::new(store.clone()));

    let story = match FabulaConfig::api_key() {
        Some(api_key) => Some(Arc::new(StoryService::new(config.story.clone(), api_key)?)),
        None => {
            warn!("ANTHROPIC_API_KEY not set; story generation disabled");
            None
        }
    };

    let scheduler = if config.scheduler.enabled && !no_scheduler {
        info!("Starting daily feedback-processing scheduler");
        Some(BatchScheduler::new(store, Arc::new(CountingProcessor)).start())
    } else {
        None
    };

    let server = ApiServer::new(ApiServerConfig { addr }, ingestion, aggregation, story);
    server.serve().await?;

    // Server is down; stop the scheduler before exiting
    if let Some(handle) = scheduler {
        handle.shutdown().await;
    }

    info!("Fabula stopped");
    Ok(())
}
