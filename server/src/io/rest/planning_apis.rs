//! Endpoints for delivery schedules and per-mosque requirements.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use shared::{
    ApiResponse, CreateRequirementsRequest, CreateSchedulesRequest, DeleteRequirementRequest,
    UpdateRequirementRequest, UpdateScheduleRequest,
};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_schedules(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/schedules");
    match state.schedule_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list schedules: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_schedules(
    State(state): State<AppState>,
    Json(request): Json<CreateSchedulesRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/schedules - {} date(s) for {}",
        request.schd_dates.len(),
        request.recipe_type
    );
    match state.schedule_service.create_many(request) {
        Ok(response) => {
            let message = if response.skipped_duplicates > 0 {
                format!(
                    "{} schedule(s) created, {} duplicate(s) skipped",
                    response.created_count, response.skipped_duplicates
                )
            } else {
                format!("{} schedule(s) created", response.created_count)
            };
            (StatusCode::CREATED, Json(ApiResponse::success_with_message(response, message)))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create schedules: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Json(request): Json<UpdateScheduleRequest>,
) -> impl IntoResponse {
    info!("PUT /api/schedules - {}", request.schd_date);
    match state.schedule_service.update(request) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update schedule: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_requirements(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/requirements");
    match state.requirement_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list requirements: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_requirements(
    State(state): State<AppState>,
    Json(request): Json<CreateRequirementsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/requirements - {} to {}, {} entr(ies)",
        request.req_date_from,
        request.req_date_to,
        request.entries.len()
    );
    match state.requirement_service.create_bulk(request) {
        Ok(response) => {
            let message = if response.skipped_duplicates > 0 {
                format!(
                    "{} requirement(s) created, {} duplicate(s) skipped",
                    response.created_count, response.skipped_duplicates
                )
            } else {
                format!("{} requirement(s) created", response.created_count)
            };
            (StatusCode::CREATED, Json(ApiResponse::success_with_message(response, message)))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create requirements: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_requirement(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequirementRequest>,
) -> impl IntoResponse {
    info!("PUT /api/requirements - {} / {}", request.req_date, request.masjid_code);
    match state.requirement_service.update(request) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update requirement: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn delete_requirement(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequirementRequest>,
) -> impl IntoResponse {
    info!("DELETE /api/requirements - {} / {}", request.req_date, request.masjid_code);
    match state.requirement_service.delete(request) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Failed to delete requirement: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
