use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use shared_utils::extractor::admin_only;
use shared_utils::state::AppState;

use crate::handlers;

pub fn user_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/user/role/{email}", get(handlers::get_user_role));

    let admin_routes = Router::new()
        .route("/users", admin_only(&state, get(handlers::list_users)))
        .route("/users/{id}/role", admin_only(&state, patch(handlers::update_user_role)));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
