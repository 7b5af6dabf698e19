use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use job_ingest::config::Config;
use job_ingest::notion::NotionClient;
use job_ingest::reconcile::Reconciler;
use job_ingest::session::{FileSession, SessionProvider};
use job_ingest::web::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting job-ingest");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        notion_api_url = %config.notion_api_url,
        jobs_db_id = %config.jobs_db_id,
        companies_db_id = %config.companies_db_id,
        "Configuration loaded"
    );

    let session = FileSession::new(&config.session_state_path);
    if session.is_available() {
        info!(path = %session.path().display(), "Browser session found");
    } else {
        warn!(
            path = %session.path().display(),
            "Browser session not found - ingest requests will fail until it is captured"
        );
    }

    let notion = NotionClient::from_config(&config).context("Failed to create Notion client")?;

    let reconciler = Reconciler::new(
        Arc::new(notion),
        Arc::new(session),
        &config.companies_db_id,
        &config.jobs_db_id,
    );
    let state = AppState {
        reconciler: Arc::new(reconciler),
    };

    let mut web_handle = tokio::spawn(async move {
        if let Err(e) = web::serve(&config, state).await {
            error!("Web server error: {e:#}");
        }
    });

    tokio::select! {
        () = shutdown_signal() => {
            info!("Shutting down...");
            web_handle.abort();
        }
        result = &mut web_handle => {
            result.context("Web server task panicked")?;
            anyhow::bail!("Web server exited unexpectedly");
        }
    }

    info!("Shutdown complete");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,job_ingest=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
