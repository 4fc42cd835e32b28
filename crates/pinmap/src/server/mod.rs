// ── HTTP server ──
//
// axum router over the records gateway and the location resolver. Every
// request re-fetches from upstream; the only shared state is the pair of
// HTTP clients and the geocoder's rate limiter.

mod databases;
mod embed;
mod error;
mod geocode;
mod writes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use pinmap_core::{GeocodeService, LocationResolver, RecordsGateway};

pub use error::ApiError;

/// Long-lived handles shared by all requests.
#[derive(Debug)]
pub struct Services {
    pub gateway: RecordsGateway,
    pub resolver: LocationResolver<GeocodeService>,
    /// Base URL embed snippets point at.
    pub public_url: Url,
}

pub type AppState = Arc<Services>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_router())
        .merge(writes::router())
        .route("/embed", get(embed::page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/databases", get(databases::list))
        .route("/api/databases/{id}", get(databases::schema))
        .route("/api/databases/{id}/pages", get(databases::pages))
        .route("/api/databases/{id}/markers", get(databases::markers))
        .route("/api/geocode", get(geocode::lookup))
        .route("/api/embed", get(embed::snippet))
}

async fn health() -> &'static str {
    "ok"
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, public_url = %state.public_url, "pinmap listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}
