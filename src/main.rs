use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod calendar;
mod config;
mod error;
mod feed;
mod pandascore;

use calendar::CalendarCache;
use config::Config;
use feed::AppState;
use pandascore::PandaScoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    if config.pandascore_token.is_none() {
        warn!("PANDASCORE_TOKEN is not set – upstream requests will be unauthenticated");
    }

    let pandascore = PandaScoreClient::new(
        &config.pandascore_api_url,
        config.pandascore_token.clone(),
        config.upstream_timeout(),
        config.per_page,
    )?;

    let cache = CalendarCache::new(
        Arc::new(pandascore),
        config.cache_ttl(),
        config.cache_capacity(),
    );
    info!(
        "Calendar cache ready (ttl={:?}, capacity={})",
        config.cache_ttl(),
        config.cache_capacity
    );

    let app = feed::router(AppState { cache });
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Serving calendar feeds on http://{}/calendar/{{league_id}}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
