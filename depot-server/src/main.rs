use std::sync::Arc;

use anyhow::Context;
use content_store::{ContentStore, SqliteRepository, TextAnalytics};

use crate::config::Config;
use crate::state::AppState;

mod config;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("Fatal: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let repo = Arc::new(
        SqliteRepository::open(&config.db_path).with_context(|| {
            format!("opening database at {}", config.db_path.display())
        })?,
    );
    let store = ContentStore::new(repo);
    let analytics = TextAnalytics::new(store.clone());

    let app = routes::router(AppState { store, analytics });

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    log::info!("Depot server listening on http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
