//! Endpoints that render report files under the data directory.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use shared::{ApiResponse, RequisitionQuery};

use crate::AppState;

pub async fn export_allocation_register(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/exports/allocation/{}", date);
    match state.export_service.export_allocation_register(&date) {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to export allocation register: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn export_delivery_register(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/exports/delivery/{}", date);
    match state.export_service.export_delivery_register(&date) {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to export delivery register: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn export_day_requirement_sheet(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/exports/day-requirements/{}", date);
    match state.export_service.export_day_requirement_sheet(&date) {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to export day-requirement sheet: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SupplierRequisitionExportRequest {
    pub cat_code: String,
    pub day_req_date: String,
    pub recipe_code: String,
    pub sup_name: String,
}

pub async fn export_supplier_requisition(
    State(state): State<AppState>,
    Json(request): Json<SupplierRequisitionExportRequest>,
) -> impl IntoResponse {
    info!("POST /api/exports/supplier-requisition - {:?}", request);
    let query = RequisitionQuery {
        cat_code: request.cat_code,
        day_req_date: request.day_req_date,
        recipe_code: request.recipe_code,
    };
    match state.export_service.export_supplier_requisition(query, &request.sup_name) {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to export supplier requisition: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
