//! Daemon entrypoint for chorus
//!
//! This is the main binary that wires together all layers using
//! dependency injection: configuration, invoker adapters, HTTP boundary.

use anyhow::Result;
use chorus_application::ModelInvoker;
use chorus_infrastructure::{ConfigLoader, FallbackInvoker, HttpModelInvoker};
use chorus_server::AppState;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Multi-model inference orchestration and response-merge service
#[derive(Parser, Debug)]
#[command(name = "chorusd", version, about)]
struct Cli {
    /// Path to a config file (overrides discovered files)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip config file discovery and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Listen address override (e.g. 0.0.0.0:7410)
    #[arg(long)]
    listen: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting chorusd");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    let timeout = config.runner.timeout_seconds.map(Duration::from_secs);

    // === Dependency Injection ===
    // Primary runner invoker, wrapped in a fallback chain when secondary
    // endpoints are configured
    let primary = Arc::new(HttpModelInvoker::with_timeout(
        config.runner.endpoint.as_str(),
        timeout,
    )?) as Arc<dyn ModelInvoker>;

    let invoker: Arc<dyn ModelInvoker> = if config.runner.fallback_endpoints.is_empty() {
        primary
    } else {
        let mut backends = vec![primary];
        for endpoint in &config.runner.fallback_endpoints {
            backends.push(Arc::new(HttpModelInvoker::with_timeout(
                endpoint.as_str(),
                timeout,
            )?));
        }
        Arc::new(FallbackInvoker::new(backends))
    };

    let state = AppState::new(invoker).with_default_strategy(config.job.default_strategy);

    let addr = cli.listen.unwrap_or(config.server.listen);
    info!(
        %addr,
        runner = %config.runner.endpoint,
        strategy = %config.job.default_strategy,
        "Configuration loaded"
    );

    chorus_server::run(state, &addr).await?;

    Ok(())
}
