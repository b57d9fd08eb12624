use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use shared_utils::extractor::{admin_only, session_only};
use shared_utils::state::AppState;

use crate::handlers;

pub fn trainer_routes(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/trainers", get(handlers::list_trainers))
        .route("/trainers/{trainer_id}", get(handlers::get_trainer));

    // Applicant routes (valid session required)
    let applicant_routes = Router::new()
        .route("/trainers", session_only(&state, post(handlers::apply)))
        .route("/trainers/application", session_only(&state, get(handlers::my_application)));

    // Admin routes (stored role must be admin)
    let admin_routes = Router::new()
        .route("/trainers/applications", admin_only(&state, get(handlers::list_applications)))
        .route(
            "/trainers/{trainer_id}",
            admin_only(
                &state,
                patch(handlers::approve_application).delete(handlers::remove_application),
            ),
        )
        .route(
            "/trainers/{trainer_id}/reject",
            admin_only(&state, patch(handlers::reject_application)),
        );

    Router::new()
        .merge(public_routes)
        .merge(applicant_routes)
        .merge(admin_routes)
        .with_state(state)
}
