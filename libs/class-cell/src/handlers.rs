use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use shared_database::InsertOneResult;
use shared_models::error::AppError;
use shared_models::pagination::PageQuery;
use shared_utils::state::AppState;

use crate::models::{ClassPage, CreateClassRequest};
use crate::services::ClassService;

#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ClassPage>, AppError> {
    let service = ClassService::new(&state);
    Ok(Json(service.list_classes(&query).await?))
}

#[axum::debug_handler]
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateClassRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = ClassService::new(&state);
    Ok(Json(service.create_class(request).await?))
}
