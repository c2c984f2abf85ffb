//! StudentDash - Student Analytics Dashboard API
//!
//! A single-process HTTP service over a synthetically generated student
//! cohort: aggregate statistics, percentile ranks, and narrative
//! insights condensed by an Ollama-backed summarizer.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bind failure, config error, etc.)

mod analytics;
mod cli;
mod config;
mod generator;
mod models;
mod report;
mod server;
mod summarizer;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use generator::RecordStore;
use server::AppState;
use std::sync::Arc;
use summarizer::client::OllamaConfig;
use summarizer::{DisabledSummarizer, OllamaSummarizer, Summarizer};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("StudentDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Server failed: {}", e);
            eprintln!("\nError: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .studentdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".studentdash.toml");

    if path.exists() {
        eprintln!(".studentdash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .studentdash.toml")?;

    println!("Created .studentdash.toml with default settings.");
    println!("Edit it to customize port, cohort size, and summarizer model.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Generate the record store and run the dashboard.
async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Build the immutable record store once; it is read-only from here on.
    let store = Arc::new(RecordStore::generate(config.generator.students));
    info!("Record store ready with {} students", store.len());

    // Handle --report-only: print the cohort narrative and exit
    if args.report_only {
        let summary = analytics::summarize(store.records());
        print!("{}", report::cohort_narrative(&summary));
        return Ok(());
    }

    // Build the summarization capability
    let summarizer: Arc<dyn Summarizer> = if config.summarizer.enabled {
        info!(
            "Summarizer: {} at {}",
            config.summarizer.model, config.summarizer.url
        );
        Arc::new(
            OllamaSummarizer::new(OllamaConfig {
                base_url: config.summarizer.url.clone(),
                model: config.summarizer.model.clone(),
                timeout_seconds: config.summarizer.timeout_seconds,
            })
            .map_err(|e| anyhow::anyhow!("Failed to build summarizer client: {}", e))?,
        )
    } else {
        warn!("Summarizer disabled; analytics endpoints return full narratives");
        Arc::new(DisabledSummarizer)
    };

    let state = Arc::new(AppState::new(
        store,
        summarizer,
        config.summarizer.min_length,
        config.summarizer.max_length,
    ));

    // Bind and serve
    let addr = format!("{}:{}", config.general.bind, config.general.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::run(listener, state).await
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .studentdash.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
