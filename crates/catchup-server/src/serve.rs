use crate::config::{Config, Provider};
use catchup_core::{
    CatchUpService, ClaudeGenerator, GeminiGenerator, SummaryGenerator, TtlCache,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the generator selected by the config.
pub fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn SummaryGenerator>> {
    let api_key = config
        .api_key()
        .ok_or_else(|| anyhow::anyhow!("no API key configured for {:?}", config.provider))?;
    let options = config.generator_options();

    let generator: Arc<dyn SummaryGenerator> = match config.provider {
        Provider::Claude => {
            let mut g = ClaudeGenerator::new(api_key, options)?;
            if let Some(model) = &config.model {
                g = g.with_model(model.as_str());
            }
            info!("Summary generator: claude (model: {})", g.model());
            Arc::new(g)
        }
        Provider::Gemini => {
            let mut g = GeminiGenerator::new(api_key, options)?;
            if let Some(model) = &config.model {
                g = g.with_model(model.as_str());
            }
            info!("Summary generator: gemini (model: {})", g.model());
            Arc::new(g)
        }
    };

    Ok(generator)
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    info!("Starting catch-up server v{}", env!("CARGO_PKG_VERSION"));

    let cache_config = config.cache_config();
    info!(
        "Cache: ttl {}h, sweep every {}s",
        cache_config.ttl.as_secs() / 3600,
        cache_config.sweep_interval.as_secs()
    );
    let cache = Arc::new(TtlCache::start(cache_config));

    let generator = build_generator(&config)?;
    let service = Arc::new(CatchUpService::new(cache.clone(), generator));

    let static_dir = if config.static_dir.is_dir() {
        info!("Serving static files from {:?}", config.static_dir);
        Some(config.static_dir.as_path())
    } else {
        warn!(
            "Static directory {:?} not found, serving API only",
            config.static_dir
        );
        None
    };

    let app = crate::http::create_router(crate::http::AppState { service }, static_dir);
    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cache.close();
    info!("Cache sweeper stopped ({} entries discarded)", cache.len());

    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received, draining connections...");
}
