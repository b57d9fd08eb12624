use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use shared_database::InsertOneResult;
use shared_models::auth::IdentityClaim;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{AdminStats, CreatePaymentRequest, Payment};
use crate::services::{PaymentService, StatsService};

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<IdentityClaim>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    let service = PaymentService::new(&state);
    Ok(Json(service.record_payment(&claim.email, request).await?))
}

#[axum::debug_handler]
pub async fn my_payments(
    State(state): State<Arc<AppState>>,
    Extension(claim): Extension<IdentityClaim>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let service = PaymentService::new(&state);
    Ok(Json(service.payments_for(&claim.email).await?))
}

#[axum::debug_handler]
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStats>, AppError> {
    let service = StatsService::new(&state);
    Ok(Json(service.admin_stats().await?))
}
