use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shared_database::{InsertOneResult, UpdateResult};
use shared_models::auth::UserRecord;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{CreateUserRequest, RoleLookup, UpdateRoleRequest};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = UserService::new(&state);
    Ok(Json(service.create_user(request).await?))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let service = UserService::new(&state);
    Ok(Json(service.list_users().await?))
}

#[axum::debug_handler]
pub async fn get_user_role(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<RoleLookup>, AppError> {
    let service = UserService::new(&state);
    Ok(Json(service.lookup_role(&email).await?))
}

#[axum::debug_handler]
pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = UserService::new(&state);
    Ok(Json(service.update_role(&user_id, request.role).await?))
}
