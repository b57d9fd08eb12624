use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_utils::state::AppState;

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/jwt", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .with_state(state)
}
