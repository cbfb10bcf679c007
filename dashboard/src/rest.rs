use crate::device::ReadingSource;
use crate::errors::Error;
use crate::export::CSV_FILENAME;
use crate::model::Reading;
use crate::service::{CurrentReading, TelemetryService, DEFAULT_HISTORY_LIMIT};
use crate::stats::Statistics;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::num::IntErrorKind;
use std::sync::Arc;
use tracing::{error, warn};

struct AppState<S> {
    service: Arc<TelemetryService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// `limit` is kept as raw text so a bad value falls back to the default
/// instead of rejecting the request
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<String>,
}

pub fn create_router<S: ReadingSource>(service: Arc<TelemetryService<S>>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/api/data", get(get_data::<S>))
        .route(
            "/api/history",
            get(get_history::<S>).delete(clear_history::<S>),
        )
        .route("/api/stats", get(get_stats::<S>))
        .route("/api/export", get(export_csv::<S>))
        .route("/health", get(health::<S>))
        .with_state(state)
}

/// Leading decimal digits of `raw`, so `"12abc"` and `"5.7"` read as 12
/// and 5. Values past `usize::MAX` saturate; anything without leading
/// digits, or zero, falls back to the default.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.map(|v| {
        let v = v.trim();
        let v = v.strip_prefix('+').unwrap_or(v);
        let end = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
        &v[..end]
    })
    .and_then(|digits| match digits.parse::<usize>() {
        Ok(limit) => Some(limit),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    })
    .filter(|&limit| limit > 0)
    .unwrap_or(DEFAULT_HISTORY_LIMIT)
}

async fn get_data<S: ReadingSource>(State(state): State<AppState<S>>) -> Response {
    match state.service.get_current_reading().await {
        CurrentReading::Online(reading) => Json(reading).into_response(),
        CurrentReading::Offline(offline) => {
            (StatusCode::SERVICE_UNAVAILABLE, Json(offline)).into_response()
        }
    }
}

async fn get_history<S: ReadingSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<Reading>> {
    let limit = parse_limit(params.limit.as_deref());
    Json(state.service.get_history(limit).await)
}

async fn get_stats<S: ReadingSource>(State(state): State<AppState<S>>) -> Json<Statistics> {
    Json(state.service.get_statistics().await)
}

async fn clear_history<S: ReadingSource>(
    State(state): State<AppState<S>>,
) -> Json<serde_json::Value> {
    state.service.clear_history().await;
    Json(json!({ "message": "History cleared" }))
}

async fn export_csv<S: ReadingSource>(
    State(state): State<AppState<S>>,
) -> Result<Response, AppError> {
    let csv = state.service.export_csv().await?;
    let disposition = format!("attachment; filename={}", CSV_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

async fn health<S: ReadingSource>(State(state): State<AppState<S>>) -> Json<serde_json::Value> {
    let length = state.service.history_len().await;
    Json(json!({ "status": "ok", "historyLength": length }))
}

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::EmptyHistory => {
                warn!("Export requested with empty history");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "No data to export" })),
                )
                    .into_response()
            }
            other => {
                error!("API error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": format!("Internal server error: {}", other) })),
                )
                    .into_response()
            }
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
