use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_extra::extract::cookie::CookieJar;
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::debug;

use shared_models::auth::{IdentityClaim, Role};
use shared_models::error::AppError;

use crate::access::require_any_role;
use crate::jwt::verify_token;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// Session token from the `token` cookie, falling back to a bearer header.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Verifies the session token and attaches the decoded claim to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&jar, request.headers());
    let claim = verify_token(token.as_deref(), &state.config.jwt_secret)?;

    debug!("Authenticated request for {}", claim.email);
    request.extensions_mut().insert(claim);

    Ok(next.run(request).await)
}

/// Must run after `auth_middleware`.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(&state, request, next, &[Role::Admin]).await
}

/// Must run after `auth_middleware`.
pub async fn staff_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(&state, request, next, &[Role::Trainer, Role::Admin]).await
}

async fn require_roles(
    state: &AppState,
    mut request: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, AppError> {
    let claim = extract_claim(&request)?;
    let user = require_any_role(state.store(), &claim, allowed).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guards only the handlers already on `route`; unmatched paths and the 405
/// fallback stay unauthenticated.
pub fn session_only(
    state: &Arc<AppState>,
    route: MethodRouter<Arc<AppState>>,
) -> MethodRouter<Arc<AppState>> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

pub fn admin_only(
    state: &Arc<AppState>,
    route: MethodRouter<Arc<AppState>>,
) -> MethodRouter<Arc<AppState>> {
    let route = route.route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware));
    session_only(state, route)
}

pub fn staff_only(
    state: &Arc<AppState>,
    route: MethodRouter<Arc<AppState>>,
) -> MethodRouter<Arc<AppState>> {
    let route = route.route_layer(middleware::from_fn_with_state(state.clone(), staff_middleware));
    session_only(state, route)
}

pub fn extract_claim<B>(request: &axum::http::Request<B>) -> Result<IdentityClaim, AppError> {
    request
        .extensions()
        .get::<IdentityClaim>()
        .cloned()
        .ok_or(AppError::MissingToken)
}
