use tracing::{debug, warn};

use shared_database::{collections, from_document, DocumentStore, Filter};
use shared_models::auth::{IdentityClaim, Role, UserRecord};
use shared_models::error::AppError;

pub async fn find_user_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Option<UserRecord>, AppError> {
    let document = store
        .find_one(collections::USERS, &Filter::new().eq("email", email))
        .await?;

    Ok(document.map(from_document::<UserRecord>).transpose()?)
}

/// Checks the caller's role against the stored user record. The role embedded in
/// the token is never consulted: roles can change after a token is issued.
pub async fn require_role(
    store: &dyn DocumentStore,
    claim: &IdentityClaim,
    required: Role,
) -> Result<UserRecord, AppError> {
    require_any_role(store, claim, &[required]).await
}

pub async fn require_any_role(
    store: &dyn DocumentStore,
    claim: &IdentityClaim,
    allowed: &[Role],
) -> Result<UserRecord, AppError> {
    let Some(user) = find_user_by_email(store, &claim.email).await? else {
        warn!("Role check for unknown user {}", claim.email);
        return Err(AppError::Forbidden("unauthorize access".to_string()));
    };

    if !allowed.contains(&user.role) {
        warn!(
            "User {} with role {} denied, requires one of {:?}",
            user.email, user.role, allowed
        );
        return Err(AppError::Forbidden("unauthorize access".to_string()));
    }

    debug!("User {} passed role check as {}", user.email, user.role);
    Ok(user)
}
