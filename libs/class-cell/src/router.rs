use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_utils::extractor::admin_only;
use shared_utils::state::AppState;

use crate::handlers;

pub fn class_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/classes", get(handlers::list_classes));

    let admin_routes = Router::new()
        .route("/classes", admin_only(&state, post(handlers::create_class)));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
