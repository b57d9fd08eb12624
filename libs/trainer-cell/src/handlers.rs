use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use shared_database::{DeleteResult, InsertOneResult, UpdateResult};
use shared_models::auth::IdentityClaim;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{ApplicationStatus, ApplyRequest, RejectRequest, TrainerApplication, TrainerError};
use crate::services::TrainerService;

// ==============================================================================
// PUBLIC TRAINER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_trainers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrainerApplication>>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.list_by_status(ApplicationStatus::Success).await?))
}

#[axum::debug_handler]
pub async fn get_trainer(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
) -> Result<Json<TrainerApplication>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.get_approved(&trainer_id).await?))
}

// ==============================================================================
// APPLICANT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<IdentityClaim>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.apply(&claim.email, request).await?))
}

#[axum::debug_handler]
pub async fn my_application(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<IdentityClaim>,
) -> Result<Json<TrainerApplication>, AppError> {
    let service = TrainerService::new(&state);
    let application = service
        .find_by_email(&claim.email)
        .await?
        .ok_or_else(|| TrainerError::NotFound(format!("for {}", claim.email)))?;

    Ok(Json(application))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TrainerApplication>>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.list_by_status(ApplicationStatus::Pending).await?))
}

#[axum::debug_handler]
pub async fn approve_application(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.approve(&trainer_id).await?))
}

#[axum::debug_handler]
pub async fn reject_application(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.reject(&trainer_id, &request.feedback).await?))
}

#[axum::debug_handler]
pub async fn remove_application(
    State(state): State<Arc<AppState>>,
    Path(trainer_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let service = TrainerService::new(&state);
    Ok(Json(service.remove(&trainer_id).await?))
}
