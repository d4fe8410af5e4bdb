//! CLI entry point (C9/C10): parses arguments, loads config, initializes
//! logging, wires the registry and sink pools, and serves the HTTP control
//! plane until a shutdown signal arrives.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use eventer::config::{self, Config};
use eventer::http::{self, AppState};
use eventer_generator::GeneratorRegistry;
use eventer_kafka::KafkaSinkPool;
use eventer_sql::SqlSinkPool;

#[derive(Parser)]
#[command(name = "eventer", about = "Synthetic event generator service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Starts the service: loads `config`, binds the control plane, and runs
    /// generators until a shutdown signal arrives.
    Start {
        #[arg(long, default_value = "config.yaml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.command {
        Some(Command::Start { config }) => config,
        None => "config.yaml".to_string(),
    };

    let config = config::load(&config_path)?;
    init_logging(&config.logging.level);

    info!(config = %config_path, "loaded configuration");
    run(config).await
}

fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: Config) -> anyhow::Result<()> {
    let registry = Arc::new(GeneratorRegistry::new(config.instance_id.clone()));
    let kafka_pool = Arc::new(KafkaSinkPool::new(config.kafka.clone()));
    let sql_pool = Arc::new(SqlSinkPool::new(config.postgres.clone()));

    let state = AppState {
        registry,
        kafka_pool,
        sql_pool,
    };

    let router = http::router(state);
    let listener = tokio::net::TcpListener::bind(&config.service.listen).await?;
    info!(addr = %config.service.listen, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}
