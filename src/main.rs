//! fan-panel — a side panel for watching and switching fan profiles.
//!
//! Run with:  `RUST_LOG=info fan-panel`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("fan-panel v{} starting", env!("CARGO_PKG_VERSION"));

    fan_panel_ui::run().map_err(Into::into)
}
