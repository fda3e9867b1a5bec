//! Endpoints for user registration, login, the module registry, and
//! permission grants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use serde::Deserialize;

use shared::{
    ApiResponse, CreateModuleRequest, GrantPermissionRequest, LoginRequest, RegisterUserRequest,
};

use super::SERVER_ERROR_MESSAGE;
use crate::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/register - {}", request.user_name);
    match state.user_service.register(request) {
        Ok(user_code) => (StatusCode::CREATED, Json(ApiResponse::success(user_code))).into_response(),
        Err(e) => {
            tracing::error!("Failed to register user: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/login - {}", request.user_name);
    match state.user_service.login(request) {
        Ok(session) => (StatusCode::OK, Json(ApiResponse::success(session))).into_response(),
        Err(e) => {
            tracing::error!("Login failed: {:#}", e);
            (StatusCode::UNAUTHORIZED, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/logout");
    match state.user_service.logout(&request.token) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(e) => {
            tracing::error!("Logout failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn list_modules(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/modules");
    match state.user_service.list_modules() {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list modules: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn create_module(
    State(state): State<AppState>,
    Json(request): Json<CreateModuleRequest>,
) -> impl IntoResponse {
    info!("POST /api/modules - {}:{}", request.mod_name, request.sub_mod_name);
    match state.user_service.create_module(request) {
        Ok(module) => (StatusCode::CREATED, Json(ApiResponse::success(module))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create module: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(user_code): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/permissions/{}", user_code);
    match state.user_service.permissions_for_user(&user_code) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::success(rows))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load permissions: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(SERVER_ERROR_MESSAGE)))
                .into_response()
        }
    }
}

pub async fn grant_permission(
    State(state): State<AppState>,
    Json(request): Json<GrantPermissionRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/permissions - {}:{} for {}",
        request.module_id, request.sub_mod_id, request.user_code
    );
    match state.user_service.grant_permission(request) {
        Ok(permission) => (StatusCode::CREATED, Json(ApiResponse::success(permission))).into_response(),
        Err(e) => {
            tracing::error!("Failed to grant permission: {:#}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}
