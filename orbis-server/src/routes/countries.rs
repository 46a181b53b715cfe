use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use orbis::{Country, CountryQuery, OrbisError, RefreshReport, SortKey, SortOrder};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the number of rows matching the filter.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    region: Option<String>,
    currency: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    skip: Option<u64>,
    limit: Option<u64>,
}

impl ListParams {
    fn into_query(self) -> Result<CountryQuery, OrbisError> {
        let mut q = CountryQuery::new().skip(self.skip.unwrap_or(0));
        if let Some(region) = self.region {
            q = q.region(region);
        }
        if let Some(currency) = self.currency {
            q = q.currency(currency);
        }
        if let Some(key) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            q = q.sort(key.parse::<SortKey>()?);
        }
        if let Some(order) = self.order.as_deref().filter(|s| !s.trim().is_empty()) {
            q = q.order(order.parse::<SortOrder>()?);
        }
        if let Some(limit) = self.limit {
            q = q.limit(limit);
        }
        Ok(q)
    }
}

pub async fn refresh(State(state): State<AppState>) -> ApiResult<Json<RefreshReport>> {
    let report = state.orbis.refresh().await?;
    Ok(Json(report))
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page = state.orbis.countries(&params.into_query()?).await?;

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total));
    Ok((headers, Json(page.items)).into_response())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Country>> {
    Ok(Json(state.orbis.country(&name).await?))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.orbis.delete_country(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn image(State(state): State<AppState>) -> ApiResult<Response> {
    match tokio::fs::read(&state.image_path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(OrbisError::not_found("summary image").into())
        }
        Err(e) => Err(OrbisError::render(format!(
            "reading {}: {e}",
            state.image_path.display()
        ))
        .into()),
    }
}
