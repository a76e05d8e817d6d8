//! Hakim intake service
//!
//! Classifies citizen complaints into the municipal category catalog. Tries the
//! generative model first and falls back to keyword heuristics, over HTTP or as a
//! one-shot command.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hakim_classifiers::Orchestrator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

mod config;
mod routes;

use config::{ConfigOverrides, IntakeConfig};

#[derive(Parser, Debug)]
#[command(name = "hakim-intake")]
#[command(about = "Hakim complaint classification service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Model endpoint credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Catalog store URL
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Catalog store service key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Listen address
        #[arg(short = 'l', long, default_value = "0.0.0.0")]
        listen: String,

        /// Listen port
        #[arg(short = 'P', long, default_value = "8080")]
        port: u16,
    },

    /// Classify a single complaint and print the outcome as JSON
    Classify {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Image URL; repeat for several
        #[arg(long = "image")]
        images: Vec<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve {
            listen: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            openai_api_key: self.openai_api_key.clone(),
            supabase_url: self.supabase_url.clone(),
            supabase_key: self.supabase_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = IntakeConfig::load(&cli.config, &cli.overrides())?;
    let orchestrator = Arc::new(Orchestrator::from_config(&config.classifier)?);
    info!(
        ai_tier = orchestrator.ai_enabled(),
        remote_catalog = config.classifier.catalog.is_remote(),
        "Classifier ready"
    );

    match cli.command.unwrap_or_default() {
        Command::Serve { listen, port } => serve(config, orchestrator, &listen, port).await,
        Command::Classify {
            title,
            description,
            images,
        } => {
            let outcome = orchestrator.classify(&title, &description, &images).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
    }
}

async fn serve(
    config: IntakeConfig,
    orchestrator: Arc<Orchestrator>,
    listen: &str,
    port: u16,
) -> Result<()> {
    let metrics_handle = init_metrics()?;
    let state = routes::AppState {
        orchestrator,
        metrics_handle,
    };

    let addr: SocketAddr = format!("{}:{}", listen, port).parse()?;
    let app = routes::create_router(state, config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Intake listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("hakim=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hakim=info"))
    };

    // stdout carries the JSON outcome for `classify`
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "hakim_classifications_total",
        "Classification outcomes by tier and status"
    );
    metrics::describe_counter!(
        "hakim_ai_fallbacks_total",
        "AI tier failures answered by the heuristic tier"
    );
    metrics::describe_histogram!(
        "hakim_classification_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end classification latency in microseconds by tier"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
