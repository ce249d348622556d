//! cirs-ir - Issue Reporting Microservice
//!
//! Accepts citizen issue reports (text, image, audio/video), enriches each
//! with an automatically inferred category via the intake pipeline, and
//! serves role-gated listing and update endpoints for operators and
//! admins.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use cirs_ir::config::{ConfigOverrides, ServiceConfig};
use cirs_ir::services::{
    CategorizationOrchestrator, HttpMediaFetcher, IdentityClient, SpeechClient, TokenVerifier,
    VisionClient,
};
use cirs_ir::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "cirs-ir", about = "CIRS Issue Reporting service")]
struct Cli {
    /// Root folder for service data (database lives here)
    #[arg(long, env = "CIRS_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// HTTP bind address
    #[arg(long, env = "CIRS_BIND_ADDRESS")]
    bind: Option<String>,

    /// Identity provider base URL
    #[arg(long, env = "CIRS_IDENTITY_URL")]
    identity_url: Option<String>,

    /// Object-detection service base URL
    #[arg(long, env = "CIRS_VISION_URL")]
    vision_url: Option<String>,

    /// Speech-to-text service base URL
    #[arg(long, env = "CIRS_SPEECH_URL")]
    speech_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting CIRS Issue Reporting (cirs-ir) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        root_folder: cli.root_folder,
        bind_address: cli.bind,
        identity_url: cli.identity_url,
        vision_url: cli.vision_url,
        speech_url: cli.speech_url,
    };

    let config = ServiceConfig::resolve(&overrides);

    // Initialize database connection pool (creates tables on first run)
    let pool = cirs_ir::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    // External collaborators: identity provider and inference sidecars
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(IdentityClient::new(config.identity_url.clone())?);
    let fetcher = Arc::new(HttpMediaFetcher::new()?);
    let classifier = Arc::new(VisionClient::new(config.vision_url.clone())?);
    let transcriber = Arc::new(SpeechClient::new(config.speech_url.clone())?);

    let orchestrator = Arc::new(CategorizationOrchestrator::new(
        fetcher,
        classifier,
        transcriber,
    ));

    let state = AppState::new(pool, verifier, orchestrator);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("cirs-ir listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
