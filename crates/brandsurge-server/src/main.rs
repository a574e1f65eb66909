mod api;
mod cache;
mod middleware;

use std::sync::Arc;

use brandsurge_core::Environment;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::SnapshotCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = brandsurge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sources = brandsurge_core::load_sources(&config.sources_path)?;
    let source_count = sources.sources.len();
    tracing::info!(
        env = %config.env,
        path = %config.sources_path.display(),
        sources = source_count,
        ttl_secs = config.cache_ttl_secs,
        "loaded sources file"
    );

    let cache = Arc::new(SnapshotCache::new(
        sources.sources,
        config.cache_ttl(),
        config.max_concurrent_sources,
    ));
    let snapshot = cache.get().await?;
    require_loaded_sources(&config.env, source_count, snapshot.skipped_sources)?;

    let app = build_app(AppState { cache });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Outside development, a configured source list where nothing loads is a
/// deployment error rather than an empty dashboard.
fn require_loaded_sources(
    env: &Environment,
    configured: usize,
    skipped: usize,
) -> anyhow::Result<()> {
    if configured == 0 || skipped < configured {
        return Ok(());
    }
    if matches!(env, Environment::Development) {
        tracing::warn!(
            sources = configured,
            "none of the configured sources loaded; serving an empty snapshot"
        );
        return Ok(());
    }
    anyhow::bail!("none of the {configured} configured sources loaded in {env}")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
