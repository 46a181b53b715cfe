use axum::Json;
use axum::extract::State;
use serde::Serialize;

use orbis::StatusReport;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusReport>> {
    Ok(Json(state.orbis.status().await?))
}
