mod config;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use forum_api::{AppStateInner, create_router};
use forum_engine::Engine;
use forum_sim::{ApiClient, SimConfig, SimTarget, Simulator};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum=debug,forum_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppStateInner::new(Arc::new(Engine::new()), config.stats_top_n);

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Forum server listening on {}", addr);

    if let Some(users) = config.simulate_users {
        let sim_config = SimConfig {
            users,
            target: SimTarget::Http(local_base_url(listener.local_addr()?)),
            ..SimConfig::from_env()?
        };
        tokio::spawn(simulate(sim_config));
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Base URL the server can reach itself on.
fn local_base_url(mut addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        addr.set_ip(Ipv4Addr::LOCALHOST.into());
    }
    format!("http://{addr}")
}

async fn simulate(config: SimConfig) {
    let SimTarget::Http(base_url) = &config.target else {
        return;
    };
    info!(users = config.users, "Starting self-simulation against {}", base_url);

    let client = Arc::new(ApiClient::new(base_url.clone()));
    match Simulator::new(config).run(client).await {
        Ok(report) => report.log(),
        Err(e) => error!("Self-simulation failed: {e:#}"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
