//! Tile match adapter runner (default binary).
//!
//! Serves sessions over TCP, or a single session over stdin/stdout when
//! `TILE_MATCH_STDIO` is set. Log output goes to stderr and is filtered with `RUST_LOG`.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tile_match::adapter::{run_server, run_stdio, ServerConfig};
use tile_match::core::GameConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let game = GameConfig::from_env().context("invalid TILE_MATCH_* game settings")?;
    game.validate().context("invalid game configuration")?;
    let server = ServerConfig::from_env().context("invalid TILE_MATCH_* server settings")?;

    info!(
        grid_size = game.grid_size,
        moves = game.move_budget,
        seed = game.seed,
        stdio = server.stdio,
        "starting tile-match"
    );

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(async move {
        if server.stdio {
            run_stdio(server, game).await
        } else {
            run_server(server, game, None).await
        }
    })
}
