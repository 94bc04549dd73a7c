//! HTTP boundary for a roundchain node.
//!
//! Routes:
//! - `POST /blocks` (and the `POST /block` alias) merges a JSON array of blocks
//! - `GET /blocks?offset=..&limit=..` returns the blocks in `[offset, limit)`
//!
//! Every route sits behind permissive CORS and a panic guard that turns a
//! handler panic into a 500 response. Request bodies are not size-capped:
//! peers push their whole chain on every step.

pub mod api;
pub mod error;
pub mod logging;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use roundchain_chain::Chain;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Chain,
}

/// The block routes, without the boundary layers.
pub fn routes(chain: Chain) -> Router {
    Router::new()
        .route("/blocks", get(api::get_blocks).post(api::post_blocks))
        .route("/block", post(api::post_blocks))
        .layer(DefaultBodyLimit::disable())
        .with_state(AppState { chain })
}

/// Wrap `router` in panic recovery and CORS.
pub fn boundary(router: Router) -> Router {
    // Credentials rule out a literal `*`, so the request origin is echoed
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true);

    router
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(cors)
}

/// The complete application.
pub fn app(chain: Chain) -> Router {
    boundary(routes(chain))
}

/// Serve the application on `addr` until ctrl-c.
pub async fn serve(chain: Chain, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app(chain))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
