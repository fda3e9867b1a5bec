//! Endpoints for material receipts and supplier requisitions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use shared::{ApiResponse, CreateReceiptsRequest, RequisitionQuery};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_receipts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/material-receipts");
    match state.receipt_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list material receipts: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn get_supplier_by_category(
    State(state): State<AppState>,
    Path(cat_code): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/suppliers/by-category/{}", cat_code);
    match state.receipt_service.supplier_for_category(&cat_code) {
        Ok(Some(supplier)) => (StatusCode::OK, Json(ApiResponse::success(supplier))).into_response(),
        Ok(None) => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error("No supplier for this category")))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to look up supplier: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReceivableQuery {
    pub day_req_date: String,
    pub purc_type: String,
    pub cat_name: String,
}

pub async fn get_receivable_items(
    State(state): State<AppState>,
    Query(query): Query<ReceivableQuery>,
) -> impl IntoResponse {
    info!("GET /api/material-receipts/receivable - {:?}", query);
    match state
        .receipt_service
        .receivable_items(&query.day_req_date, &query.purc_type, &query.cat_name)
    {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load receivable items: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn create_receipts(
    State(state): State<AppState>,
    Json(request): Json<CreateReceiptsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/material-receipts - {} row(s) for {}",
        request.rows.len(),
        request.day_req_date
    );
    match state.receipt_service.create_receipts(request) {
        Ok(count) => {
            let message = format!("{} material receipt(s) saved", count);
            (StatusCode::CREATED, Json(ApiResponse::success_with_message(count, message)))
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create receipts: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn get_requisition_items(
    State(state): State<AppState>,
    Query(query): Query<RequisitionQuery>,
) -> impl IntoResponse {
    info!("GET /api/requisition-items - {:?}", query);
    match state.purchase_service.requisition_items(query) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load requisition items: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
