use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use arc_metrics_poller::{
    api::{self, AppState},
    config, fetchers,
    poller::Poller,
    render::PageRenderer,
    rpc,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stdout)
        .with_target(false) // cleaner logs
        .init();

    info!("ARC metrics poller starting...");

    let cfg = config::load()?;
    info!("  RPC URL: {}", cfg.rpc_http_url);
    info!("  Explorer API: {}", cfg.explorer_api_url);
    info!("  Poll interval: {:?}", cfg.poll_interval);
    info!("  Port: {}", cfg.port);

    let client = rpc::build_client(cfg.request_timeout)?;
    let renderer = Arc::new(PageRenderer::new(cfg.tx_base_url()));

    let poller = Arc::new(Poller::new(fetchers::from_config(&cfg, &client), renderer.clone()));
    poller.initialize();

    // Spawn API task
    let api_handle = tokio::spawn({
        let state = AppState {
            renderer: Arc::clone(&renderer),
            explorer_base_url: cfg.explorer_base_url.clone(),
        };
        let port = cfg.port;
        async move { api::serve(port, state).await }
    });

    // Spawn poll loop
    let mut poller_handle = poller.spawn(cfg.poll_interval);
    let mut poller_running = true;

    // Graceful shutdown
    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        res = poller_handle.task_mut() => {
            poller_running = false;
            match res {
                Ok(Ok(_)) => info!("Poller exited cleanly"),
                Ok(Err(e)) => error!("Poller error: {:?}", e),
                Err(e) => error!("Poller task panicked: {:?}", e),
            }
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    if poller_running {
        poller_handle.stop().await?;
    }

    info!("ARC metrics poller stopped.");
    Ok(())
}
