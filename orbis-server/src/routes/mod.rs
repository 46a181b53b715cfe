//! HTTP route handlers and router configuration

mod admin;
mod countries;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(admin::health))
        .route("/status", get(admin::status))
        .route("/countries", get(countries::list))
        .route("/countries/refresh", post(countries::refresh))
        // Registered before `/{name}` so "image" is never treated as a country.
        .route("/countries/image", get(countries::image))
        .route(
            "/countries/{name}",
            get(countries::get_one).delete(countries::delete_one),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
