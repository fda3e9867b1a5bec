//! Endpoints for cleaning logs and the media browser.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use shared::{ApiResponse, CreateCleaningLogRequest};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_cleaning_logs(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/cleaning-logs");
    match state.cleaning_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list cleaning logs: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_cleaning_log(
    State(state): State<AppState>,
    Json(request): Json<CreateCleaningLogRequest>,
) -> impl IntoResponse {
    info!("POST /api/cleaning-logs - {} on {}", request.area, request.log_date);
    match state.cleaning_service.create(request) {
        Ok(log) => (StatusCode::CREATED, Json(ApiResponse::success(log))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create cleaning log: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MediaQuery {
    pub date: String,
    pub area: String,
}

pub async fn get_media(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> impl IntoResponse {
    info!("GET /api/media - {:?}", query);
    match state.cleaning_service.media_for(&query.date, &query.area) {
        Ok(media) => (StatusCode::OK, Json(ApiResponse::success(media))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load media: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
