use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_utils::extractor::{admin_only, session_only};
use shared_utils::state::AppState;

use crate::handlers;

pub fn payment_routes(state: Arc<AppState>) -> Router {
    // Members (valid session required)
    let member_routes = Router::new()
        .route(
            "/payments",
            session_only(&state, get(handlers::my_payments).post(handlers::record_payment)),
        );

    // Admin routes
    let admin_routes = Router::new()
        .route("/admin-stats", admin_only(&state, get(handlers::admin_stats)));

    Router::new()
        .merge(member_routes)
        .merge(admin_routes)
        .with_state(state)
}
