//! Offerbook server binary.

use std::sync::Arc;

use offerbook_core::{OfferStore, DEFAULT_MAX_QUANTITY};
use offerbook_server::{init_logging, App, LogConfig, Server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut log_config = match std::env::var("OFFERBOOK_ENV").as_deref() {
        Ok("development") => LogConfig::development(),
        _ => LogConfig::production(),
    };
    if let Ok(level) = std::env::var("OFFERBOOK_LOG") {
        log_config = log_config.with_level(level);
    }
    init_logging(&log_config)?;

    let config = ServerConfig::from_env();
    let store = Arc::new(OfferStore::generate(DEFAULT_MAX_QUANTITY));
    tracing::info!(offers = store.len(), "fixture generated");

    let app = App::new(store);
    Server::new(config, app).run().await?;
    Ok(())
}
