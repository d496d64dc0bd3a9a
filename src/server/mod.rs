//! HTTP surface.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /api/generate/caption` | [`handlers::generate_caption`] |
//! | `POST /api/generate/poster` | [`handlers::generate_poster`] |
//! | `POST /api/schedule/plan` | [`handlers::schedule_plan`] |
//! | `POST /api/export/zip` | [`handlers::export_zip`] |
//! | `GET /health` | [`handlers::health`] |
//! | anything else | static file from the public directory |
//!
//! Every JSON response carries `ok`. Failures answer `{ "ok": false, "error": "..." }`
//! with a fixed user-facing message; the cause is logged.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use extract::ApiJson;
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_mb * 1024 * 1024;
    let static_files = ServeDir::new(state.public_dir());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/generate/caption", post(handlers::generate_caption))
        .route("/api/generate/poster", post(handlers::generate_poster))
        .route("/api/schedule/plan", post(handlers::schedule_plan))
        .route("/api/export/zip", post(handlers::export_zip))
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, create the outputs directory, and serve until the process stops.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    std::fs::create_dir_all(state.outputs_dir())?;

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("larisin listening on http://{}", addr);
    tracing::info!("Serving static files from {}", state.public_dir().display());
    if state.config.llm.api_key().is_none() {
        tracing::warn!("LLM_API_KEY not set, captions will be offline placeholders");
    }

    axum::serve(listener, build_router(state)).await
}
