//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - HTML pages at `/`, `/login`, `/logout` and `/generate`
/// - JSON at `/api/agents` and a liveness check at `/healthz`
/// - Static files (logo, placeholder image, CSS, JS) under `/assets`
pub fn build_router(state: AppState, static_dir: PathBuf) -> Router {
    // The JSON endpoints may be read from other origins; pages may not.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/agents", get(handlers::api_agents))
        .route("/healthz", get(handlers::healthz))
        .layer(cors);

    let page_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/generate", post(handlers::generate));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .nest_service("/assets", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind_addr`, serve `router` on a Tokio task and return the bound
/// address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Web server stopped: {e}");
        }
    });

    Ok(addr)
}
