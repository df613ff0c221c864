use anyhow::Context;
use clap::Parser;

use niche_records::{build_router, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Cli::parse());
    let addr = config.bind_addr()?;
    log::info!(
        "serving datasets from {} (default '{}', cache capacity {})",
        config.data_dir.display(),
        config.default_dataset,
        config.cache_capacity
    );

    let state = AppState::new(config);

    if state.config.preload {
        // Already logged; a missing dataset must not stop the server.
        let _ = state.preload().await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
