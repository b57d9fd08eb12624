use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use class_cell::router::class_routes;
use community_cell::router::community_routes;
use payment_cell::router::payment_routes;
use shared_utils::state::AppState;
use trainer_cell::router::trainer_routes;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "gym server is running..." }))
        .merge(auth_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(trainer_routes(state.clone()))
        .merge(class_routes(state.clone()))
        .merge(payment_routes(state.clone()))
        .merge(community_routes(state))
}
