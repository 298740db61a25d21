//! Process startup (§2, §6): parse configuration, init logging, open the
//! database pool, build the router, serve, and shut down cleanly on
//! Ctrl-C — generalized from the teacher's one-shot `main` into a
//! long-lived service, patterned on
//! `examples/original_source/src/cmd/linkcrawler-server/main.go`'s
//! `Main.Run`/`Main.Close` split.

use std::sync::Arc;

use clap::Parser;
use linkcrawler::config::Config;
use linkcrawler::http::{router, AppState};
use linkcrawler::orchestrator::Orchestrator;
use linkcrawler::storage::postgres::PostgresStorage;
use linkcrawler::storage::Storage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let storage = PostgresStorage::connect(&config.database_url).await?;
    storage.migrate().await?;
    let storage: Arc<dyn Storage> = Arc::new(storage);

    let orchestrator = Orchestrator::new(Arc::clone(&storage), config.fetch_timeout());
    let app = router(AppState {
        storage,
        orchestrator,
    });

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %config.addr, "linkcrawler listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    tracing::info!("shutdown signal received");
}
