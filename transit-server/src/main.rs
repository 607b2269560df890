use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use transit_server::config::ServerConfig;
use transit_server::graph::{BuildConfig, Graph};
use transit_server::gtfs::Feed;
use transit_server::planner::SearchConfig;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Startup parsing happens before the listener binds; a feed with no
    // stops means no request could ever be served, so exit non-zero.
    let feed = match Feed::load(&config.gtfs_path) {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = %e, "failed to load GTFS feed");
            std::process::exit(1);
        }
    };
    let graph = Graph::from_feed(&feed, &BuildConfig::default());

    let state = AppState::new(graph, SearchConfig::default());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 50051));
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
