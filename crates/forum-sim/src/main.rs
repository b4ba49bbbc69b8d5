use std::sync::Arc;

use tracing::info;

use forum_engine::Engine;
use forum_sim::{ApiClient, SimConfig, SimTarget, Simulator};

const MAILBOX_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_sim=info,forum_actor=info".into()),
        )
        .init();

    let config = SimConfig::from_env()?;
    let simulator = Simulator::new(config.clone());

    let report = match &config.target {
        SimTarget::Actor => {
            info!("Simulating against an in-process engine actor");
            let (handle, actor) = forum_actor::spawn(Arc::new(Engine::new()), MAILBOX_CAPACITY)?;
            let report = simulator.run(Arc::new(handle.clone())).await?;
            handle.shutdown().await?;
            tokio::task::spawn_blocking(move || actor.join())
                .await?
                .map_err(|_| anyhow::anyhow!("engine actor panicked"))?;
            report
        }
        SimTarget::Http(base_url) => {
            info!("Simulating against {}", base_url);
            simulator.run(Arc::new(ApiClient::new(base_url.clone()))).await?
        }
    };

    report.log();
    Ok(())
}
