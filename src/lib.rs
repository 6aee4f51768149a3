// Library exports so integration tests can mount the real app.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::http::StatusCode;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router: pages, API, tracing, and a 404 catch-all.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::home::router())
        .merge(routes::dashboard::router())
        .merge(routes::api::router())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
