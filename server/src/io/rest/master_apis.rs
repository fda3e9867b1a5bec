//! Endpoints for the master-data resources.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use shared::{
    ApiResponse, CreateBulkItemRequest, CreateCategoryRequest, CreateItemsRequest,
    CreateLocationRequest, CreateRecipeItemRequest, CreateRecipeTypeRequest,
    CreateSupplierRequest, CreateUnitRequest, UpdateCategoryRequest, UpdateItemRequest,
    UpdateLocationRequest, UpdateRecipeItemRequest, UpdateRecipeTypeRequest,
    UpdateSupplierRequest, UpdateUnitRequest,
};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn list_locations(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/locations");
    match state.master_service.list_locations() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list locations: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> impl IntoResponse {
    info!("POST /api/locations - {}", request.masjid_name);
    match state.master_service.create_location(request) {
        Ok(location) => (StatusCode::CREATED, Json(ApiResponse::success(location))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create location: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_location(
    State(state): State<AppState>,
    Json(request): Json<UpdateLocationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/locations - {}", request.masjid_code);
    match state.master_service.update_location(request) {
        Ok(location) => (StatusCode::OK, Json(ApiResponse::success(location))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update location: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");
    match state.master_service.list_categories() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list categories: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories - {}", request.cat_name);
    match state.master_service.create_category(request) {
        Ok(category) => (StatusCode::CREATED, Json(ApiResponse::success(category))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create category: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_category(
    State(state): State<AppState>,
    Json(request): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/categories - {}", request.cat_code);
    match state.master_service.update_category(request) {
        Ok(category) => (StatusCode::OK, Json(ApiResponse::success(category))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update category: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_units(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/units");
    match state.master_service.list_units() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list units: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_unit(
    State(state): State<AppState>,
    Json(request): Json<CreateUnitRequest>,
) -> impl IntoResponse {
    info!("POST /api/units - {}", request.unit_short);
    match state.master_service.create_unit(request) {
        Ok(unit) => (StatusCode::CREATED, Json(ApiResponse::success(unit))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create unit: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_unit(
    State(state): State<AppState>,
    Json(request): Json<UpdateUnitRequest>,
) -> impl IntoResponse {
    info!("PUT /api/units - {}", request.unit_short);
    match state.master_service.update_unit(request) {
        Ok(unit) => (StatusCode::OK, Json(ApiResponse::success(unit))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update unit: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/items");
    match state.master_service.list_items() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_items(
    State(state): State<AppState>,
    Json(request): Json<CreateItemsRequest>,
) -> impl IntoResponse {
    info!("POST /api/items - {} row(s)", request.items.len());
    match state.master_service.create_items(request) {
        Ok(items) => (StatusCode::CREATED, Json(ApiResponse::success(items))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create items: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_item(
    State(state): State<AppState>,
    Json(request): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/items - {}", request.item_code);
    match state.master_service.update_item(request) {
        Ok(item) => (StatusCode::OK, Json(ApiResponse::success(item))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update item: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_bulk_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/bulk-items");
    match state.master_service.list_bulk_items() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list bulk items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_bulk_item(
    State(state): State<AppState>,
    Json(request): Json<CreateBulkItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/bulk-items - {}", request.item_name);
    match state.master_service.create_bulk_item(request) {
        Ok(bulk_item) => (StatusCode::CREATED, Json(ApiResponse::success(bulk_item))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create bulk item: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_suppliers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/suppliers");
    match state.master_service.list_suppliers() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list suppliers: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<CreateSupplierRequest>,
) -> impl IntoResponse {
    info!("POST /api/suppliers - {}", request.sup_name);
    match state.master_service.create_supplier(request) {
        Ok(supplier) => (StatusCode::CREATED, Json(ApiResponse::success(supplier))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create supplier: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Json(request): Json<UpdateSupplierRequest>,
) -> impl IntoResponse {
    info!("PUT /api/suppliers - {}", request.sup_code);
    match state.master_service.update_supplier(request) {
        Ok(supplier) => (StatusCode::OK, Json(ApiResponse::success(supplier))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update supplier: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_recipe_types(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/recipe-types");
    match state.master_service.list_recipe_types() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list recipe types: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_recipe_type(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeTypeRequest>,
) -> impl IntoResponse {
    info!("POST /api/recipe-types - {}", request.recipe_type);
    match state.master_service.create_recipe_type(request) {
        Ok(recipe_type) => {
            (StatusCode::CREATED, Json(ApiResponse::success(recipe_type))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create recipe type: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_recipe_type(
    State(state): State<AppState>,
    Json(request): Json<UpdateRecipeTypeRequest>,
) -> impl IntoResponse {
    info!("PUT /api/recipe-types - {}", request.recipe_code);
    match state.master_service.update_recipe_type(request) {
        Ok(recipe_type) => (StatusCode::OK, Json(ApiResponse::success(recipe_type))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe type: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn list_recipe_items(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/recipes");
    match state.master_service.list_recipe_items() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list recipe items: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_recipe_item(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/recipes - {} / {}", request.recipe_type, request.item_name);
    match state.master_service.create_recipe_item(request) {
        Ok(recipe_item) => {
            (StatusCode::CREATED, Json(ApiResponse::success(recipe_item))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create recipe item: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn update_recipe_item(
    State(state): State<AppState>,
    Json(request): Json<UpdateRecipeItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/recipes - {} / {}", request.recipe_code, request.item_name);
    match state.master_service.update_recipe_item(request) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Failed to update recipe item: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
