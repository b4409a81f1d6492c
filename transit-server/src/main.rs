use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::cache::{CacheConfig, CachedFeedClient};
use transit_server::feed::{FeedClient, FeedConfig};
use transit_server::planner::PlannerConfig;
use transit_server::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut feed_config = FeedConfig::default();
    if let Ok(url) = std::env::var("TRANSIT_FEED_URL") {
        feed_config = feed_config.with_base_url(url);
    }
    if let Ok(raw) = std::env::var("TRANSIT_MAX_CONCURRENT") {
        match raw.parse::<usize>() {
            Ok(n) => feed_config = feed_config.with_max_concurrent(n),
            Err(e) => warn!(%raw, error = %e, "ignoring invalid TRANSIT_MAX_CONCURRENT"),
        }
    }
    info!(
        base_url = %feed_config.base_url,
        max_concurrent = feed_config.max_concurrent,
        "using transport feed"
    );

    let feed_client = FeedClient::new(feed_config).expect("Failed to create feed client");
    let cached_feed = CachedFeedClient::new(feed_client, &CacheConfig::default());

    let planner_config = PlannerConfig::default();
    let state = AppState::new(cached_feed, planner_config);
    let app = create_router(state);

    let bind = std::env::var("TRANSIT_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(%bind, error = %e, "invalid TRANSIT_BIND_ADDR");
            std::process::exit(2);
        }
    };

    info!("Transit route planner listening on http://{addr}");
    info!("  GET /health");
    info!("  GET /api/route/plan?origin=<stop>&destination=<stop>");
    info!("  GET /api/stops/search?q=<text>&limit=<n>");
    info!("  GET /api/stops/<id>/estimates");
    info!("  GET /api/lines/search?q=<text>");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
