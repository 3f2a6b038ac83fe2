use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;

use advent_edge::{AdventState, Config, advent_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    advent_edge::logging::init(&cfg.loglevel);

    info!(
        listen_addr = %cfg.listen_addr,
        supabase_url = %cfg.supabase_url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
    );

    let state = AdventState::from_config(&cfg)?;
    let app = advent_router(state);

    let listener = TcpListener::bind(cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
