//! HerLens — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Load the knowledge graph (before anything is served)
//!   5. Build the provider chain
//!   6. Serve the HTTP API until Ctrl-C

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use herlens::config;
use herlens::error::AppError;
use herlens::fallback::FallbackController;
use herlens::graph::GraphHandle;
use herlens::llm::providers;
use herlens::{http, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        bind = %config.server.bind,
        graph_mode = config.graph.enabled,
        graph_path = %config.graph.path.display(),
        log_level = %config.log_level,
        openai_key = config.openai_key_present(),
        hf_key = config.hf_key_present(),
        "config loaded"
    );

    let graph = GraphHandle::load(&config.graph.path);
    if config.graph.enabled && !graph.is_loaded().await {
        warn!(
            path = %graph.path().display(),
            "graph mode is on but the graph is unavailable; queries go to providers"
        );
    }

    let chain = providers::build_chain(&config)
        .map_err(|e| AppError::Config(format!("provider setup: {e}")))?;
    info!(
        providers = ?chain.iter().map(|p| p.name()).collect::<Vec<_>>(),
        "provider chain ready"
    );

    let controller = FallbackController::new(config.graph.enabled, graph, chain);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received, shutting down");
                signal.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for ctrl-c"),
        }
    });

    http::serve(&config.server.bind, controller, shutdown).await
}
