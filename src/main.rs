use std::time::Duration;

use sockhttp::config::Config;
use sockhttp::server::Server;

/// How long in-flight connections get to finish after Ctrl-C.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    let server = Server::bind(&cfg.server).await?;
    let shutdown = server.shutdown_handle();
    let mut running = tokio::spawn(server.run());

    tokio::select! {
        res = &mut running => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            shutdown.shutdown();
            match tokio::time::timeout(DRAIN_TIMEOUT, running).await {
                Ok(res) => res??,
                Err(_) => tracing::warn!("Workers still busy, exiting anyway"),
            }
        }
    }

    Ok(())
}
