//! Endpoints for food allocation and delivery recording.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use shared::{
    ApiResponse, CreateAllocationsRequest, CreateDeliveryRequest, SetAvailableQtyRequest,
};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_allocations(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/allocations");
    match state.allocation_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list allocations: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn get_allocation_date_data(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/allocations/date-data/{}", date);
    match state.allocation_service.date_data(&date) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load allocation date data: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn create_allocations(
    State(state): State<AppState>,
    Json(request): Json<CreateAllocationsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/allocations - {} with {} entr(ies)",
        request.alloc_date,
        request.entries.len()
    );
    match state.allocation_service.create_allocations(request) {
        Ok(response) => (StatusCode::CREATED, Json(ApiResponse::success(response))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create allocations: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(format!("{:#}", e))))
                .into_response()
        }
    }
}

pub async fn set_available_qty(
    State(state): State<AppState>,
    Json(request): Json<SetAvailableQtyRequest>,
) -> impl IntoResponse {
    info!("POST /api/available-qty - {} = {}", request.avail_date, request.avbl_qty);
    match state.allocation_service.set_available_qty(request) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Failed to set available qty: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_deliveries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/deliveries");
    match state.delivery_service.list() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list deliveries: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn get_delivery_candidates(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/deliveries/candidates/{}", date);
    match state.delivery_service.candidates(&date) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load delivery candidates: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn create_delivery(
    State(state): State<AppState>,
    Json(request): Json<CreateDeliveryRequest>,
) -> impl IntoResponse {
    info!("POST /api/deliveries - {} on {}", request.location, request.delivery_date);
    match state.delivery_service.record(request) {
        Ok(record) => (StatusCode::CREATED, Json(ApiResponse::success(record))).into_response(),
        Err(e) => {
            tracing::error!("Failed to record delivery: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use shared::{
        AllocationEntry, CreateLocationRequest, CreateRecipeTypeRequest,
        CreateRequirementsRequest, CreateSchedulesRequest, RequirementEntry,
    };
    use tempfile::{tempdir, TempDir};

    use crate::storage::CsvConnection;
    use crate::AppState;

    fn setup_test_state() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path().to_path_buf()).unwrap();
        let state = AppState::new(conn);

        state
            .master_service
            .create_recipe_type(CreateRecipeTypeRequest {
                recipe_type: "Pongal".to_string(),
                recipe_perkg: 1.0,
                recipe_totpkt: 50.0,
                created_by: "admin".to_string(),
            })
            .unwrap();
        state
            .master_service
            .create_location(CreateLocationRequest {
                masjid_name: "North Masjid".to_string(),
                address: String::new(),
                city: String::new(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        state
            .schedule_service
            .create_many(CreateSchedulesRequest {
                schd_dates: vec!["2024-03-01".to_string()],
                recipe_type: "Pongal".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        state
            .requirement_service
            .create_bulk(CreateRequirementsRequest {
                req_date_from: "2024-03-01".to_string(),
                req_date_to: "2024-03-01".to_string(),
                entries: vec![RequirementEntry {
                    masjid_name: "North Masjid".to_string(),
                    req_qty: 60.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap();

        (dir, state)
    }

    #[tokio::test]
    async fn test_over_allocation_comes_back_as_bad_request() {
        let (_dir, state) = setup_test_state();

        let response = set_available_qty(
            State(state.clone()),
            Json(SetAvailableQtyRequest {
                avail_date: "2024-03-01".to_string(),
                avbl_qty: 50.0,
                created_by: "admin".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = create_allocations(
            State(state),
            Json(CreateAllocationsRequest {
                alloc_date: "2024-03-01".to_string(),
                entries: vec![AllocationEntry {
                    masjid_name: "North Masjid".to_string(),
                    alloc_qty: 60.0,
                }],
                created_by: "admin".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_allocation_date_data_handler() {
        let (_dir, state) = setup_test_state();

        let response =
            get_allocation_date_data(State(state.clone()), axum::extract::Path("2024-03-01".to_string()))
                .await
                .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            get_allocation_date_data(State(state), axum::extract::Path("not-a-date".to_string()))
                .await
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
