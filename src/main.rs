//! Golden Eggs Server Binary
//!
//! Reads configuration from the environment (`PORT`, `FORCE_WIN`,
//! `FORCE_BONUS`, `LOG_PATH`) and serves the game endpoints.

use tracing::info;
use tracing_subscriber::EnvFilter;

use golden_eggs::network::server::{serve, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(
        version = %config.version,
        addr = %config.bind_addr,
        force_win = config.force_win,
        force_bonus = config.force_bonus,
        log_path = %config.log_path.display(),
        "starting golden eggs server"
    );

    serve(config).await
}
