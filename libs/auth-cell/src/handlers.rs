use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_models::auth::{IdentityClaim, LoginResponse, Role};
use shared_models::error::AppError;
use shared_models::validation::validate_email;
use shared_utils::access::find_user_by_email;
use shared_utils::extractor::TOKEN_COOKIE;
use shared_utils::jwt::issue_token;
use shared_utils::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

fn same_site(config: &AppConfig) -> SameSite {
    if config.is_production() {
        SameSite::None
    } else {
        SameSite::Strict
    }
}

pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(config.is_production())
        .same_site(same_site(config))
        .path("/")
        .build()
}

fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE)
        .http_only(true)
        .secure(config.is_production())
        .same_site(same_site(config))
        .path("/")
        .build()
}

/// Issues a session token. A stored user record decides the role; the
/// client-supplied role only applies to users not yet in the store.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    validate_email(&request.email)?;
    debug!("Issuing session token for {}", request.email);

    let role = match find_user_by_email(state.store(), &request.email).await? {
        Some(user) => user.role,
        None => request.role.unwrap_or_default(),
    };

    let claim = IdentityClaim::new(request.email, role);
    let token = issue_token(&claim, &state.config.jwt_secret)?;

    info!("User {} logged in as {}", claim.email, claim.role);
    let jar = jar.add(session_cookie(&state.config, token.clone()));

    Ok((jar, Json(LoginResponse { success: true, token })))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    debug!("Clearing session cookie");
    let jar = jar.remove(removal_cookie(&state.config));
    (jar, Json(json!({ "success": true })))
}
