//! Beacon node binary: logging, wiring, the expiry sweep, and a clean stop.
//!
//! The transport layer (out of scope here) attaches client connections via
//! [`BeaconNode::join`] and forwards what their handles yield.

use anyhow::Result;
use beacon_runtime::BeaconNode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("===========================================");
    info!("  Beacon Node v0.1.0");
    info!("===========================================");

    let node = BeaconNode::new();
    let sweep = node.spawn_expiry_sweep(BeaconNode::DEFAULT_SWEEP_PERIOD);
    info!(
        period_secs = BeaconNode::DEFAULT_SWEEP_PERIOD.as_secs(),
        "Expiry sweep running"
    );

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("Initiating graceful shutdown...");
    sweep.abort();
    info!("Shutdown complete");

    Ok(())
}
