//! Endpoints for day-requirement derivation and purchase planning.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use shared::{ApiResponse, CreateBulkRequirementRequest, CreateRetailRequirementRequest};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_headers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/day-requirements");
    match state.purchase_service.list_headers() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list day requirements: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn get_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/day-requirements/by-date/{}", date);
    match state.purchase_service.requirements_by_date(&date) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load date data: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn get_recipe_items(
    State(state): State<AppState>,
    Path(recipe_type): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/day-requirements/recipe-items/{}", recipe_type);
    match state.purchase_service.recipe_items(&recipe_type) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load recipe items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn get_recipe_totpkt(
    State(state): State<AppState>,
    Path(recipe_type): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/day-requirements/recipe-totpkt/{}", recipe_type);
    match state.purchase_service.recipe_totpkt(&recipe_type) {
        Ok(totpkt) => (StatusCode::OK, Json(ApiResponse::success(totpkt))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load recipe totpkt: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeriveQuery {
    pub date: String,
    pub recipe_type: String,
}

pub async fn derive_retail(
    State(state): State<AppState>,
    Query(query): Query<DeriveQuery>,
) -> impl IntoResponse {
    info!("GET /api/day-requirements/derive - {:?}", query);
    match state.purchase_service.derive_retail(&query.date, &query.recipe_type) {
        Ok(derivation) => (StatusCode::OK, Json(ApiResponse::success(derivation))).into_response(),
        Err(e) => {
            tracing::error!("Failed to derive retail requirement: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn create_retail(
    State(state): State<AppState>,
    Json(request): Json<CreateRetailRequirementRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/day-requirements/retail - {} / {}",
        request.day_req_date, request.recipe_type
    );
    match state.purchase_service.create_retail(request) {
        Ok(response) => (StatusCode::CREATED, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create retail requirement: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn create_bulk(
    State(state): State<AppState>,
    Json(request): Json<CreateBulkRequirementRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/day-requirements/bulk - {} to {}",
        request.from_date, request.to_date
    );
    match state.purchase_service.create_bulk(request) {
        Ok(response) => (StatusCode::CREATED, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create bulk requirement: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
