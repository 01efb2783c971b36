use std::sync::Arc;

use clap::Parser;
use rota_engine::AssignmentEngine;
use rota_server::{RotationConfig, ServerConfig};
use rota_store::{seed::seed_demo_data, InMemoryStore};

#[derive(Debug, Parser)]
#[command(name = "rota", about = "Task rotation service")]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "ROTA_PORT", default_value_t = 9292)]
    port: u16,

    /// Seconds between rotation sweeps. Non-positive falls back to 120,
    /// anything below 5 is clamped up.
    #[arg(long, env = "ROTA_ROTATION_INTERVAL_SECS", default_value_t = 120)]
    rotation_interval_secs: i64,

    /// Populate the store with demo users and tasks at startup.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting Rota server");

    let store = Arc::new(InMemoryStore::new());
    if cli.seed {
        seed_demo_data(&store);
    }

    let rotation = RotationConfig {
        interval_secs: cli.rotation_interval_secs,
    };
    // A task lives through at least one full interval before it can be
    // declared done, so creation and completion never coincide.
    let engine =
        Arc::new(AssignmentEngine::new(Arc::clone(&store)).min_task_age(rotation.interval()));

    let config = ServerConfig {
        port: cli.port,
        rotation,
    };
    let handle = rota_server::start(config, engine, store).await?;
    tracing::info!(port = handle.port, "Rota server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down");
    handle.shutdown();

    Ok(())
}
