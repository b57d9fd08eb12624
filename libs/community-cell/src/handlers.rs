use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};

use shared_database::InsertOneResult;
use shared_models::auth::UserRecord;
use shared_models::error::AppError;
use shared_models::pagination::PageQuery;
use shared_utils::state::AppState;

use crate::models::{CreatePostRequest, ForumPage, ForumPost, SubscribeRequest, Subscriber};
use crate::services::{ForumService, NewsletterService};

// ==============================================================================
// FORUM HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ForumPage>, AppError> {
    let service = ForumService::new(&state);
    Ok(Json(service.list_posts(&query).await?))
}

#[axum::debug_handler]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<ForumPost>, AppError> {
    let service = ForumService::new(&state);
    Ok(Json(service.get_post(&post_id).await?))
}

#[axum::debug_handler]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(author): Extension<UserRecord>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = ForumService::new(&state);
    Ok(Json(service.create_post(&author, request).await?))
}

// ==============================================================================
// NEWSLETTER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = NewsletterService::new(&state);
    Ok(Json(service.subscribe(request).await?))
}

#[axum::debug_handler]
pub async fn list_subscribers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Subscriber>>, AppError> {
    let service = NewsletterService::new(&state);
    Ok(Json(service.list_subscribers().await?))
}
