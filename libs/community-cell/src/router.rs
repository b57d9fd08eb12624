use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_utils::extractor::{admin_only, staff_only};
use shared_utils::state::AppState;

use crate::handlers;

pub fn community_routes(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/forums", get(handlers::list_posts))
        .route("/forums/{post_id}", get(handlers::get_post))
        .route("/newsletter", post(handlers::subscribe));

    // Trainers and admins
    let staff_routes = Router::new()
        .route("/forums", staff_only(&state, post(handlers::create_post)));

    let admin_routes = Router::new()
        .route("/newsletter", admin_only(&state, get(handlers::list_subscribers)));

    Router::new()
        .merge(public_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        .with_state(state)
}
