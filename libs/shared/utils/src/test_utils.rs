use std::sync::Arc;

use axum::{body::to_bytes, response::Response};
use chrono::Utc;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::{collections, new_id, to_document, DocumentStore, MemoryStore};
use shared_models::auth::{IdentityClaim, Role, UserRecord};

use crate::jwt::{issue_token_at, TOKEN_TTL_SECONDS};
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub environment: String,
    pub trainer_reapply_after_rejection: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            environment: "test".to_string(),
            trainer_reapply_after_rejection: false,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            environment: self.environment.clone(),
            trainer_reapply_after_rejection: self.trainer_reapply_after_rejection,
            ..AppConfig::default()
        }
    }
}

/// Application state over a fresh in-memory store, with the store kept at hand
/// for seeding and assertions.
pub struct TestContext {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(config: TestConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(config.to_app_config(), store.clone()));
        Self { state, store }
    }

    pub fn secret(&self) -> &str {
        &self.state.config.jwt_secret
    }

    pub fn token_for(&self, user: &TestUser) -> String {
        JwtTestUtils::create_test_token(user, self.secret())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::member("test@example.com")
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: new_id(),
            email: email.to_string(),
            role,
        }
    }

    pub fn member(email: &str) -> Self {
        Self::new(email, Role::Member)
    }

    pub fn trainer(email: &str) -> Self {
        Self::new(email, Role::Trainer)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_claim(&self) -> IdentityClaim {
        IdentityClaim::new(self.email.clone(), self.role)
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            email: self.email.clone(),
            name: Some(format!("Test {}", self.role)),
            image: None,
            role: self.role,
            created_at: Some(Utc::now()),
        }
    }

    /// Stores the user record so role checks can find it.
    pub async fn seed(&self, store: &dyn DocumentStore) {
        let document = to_document(&self.to_record()).expect("user record serializes");
        store
            .insert_one(collections::USERS, document)
            .await
            .expect("seed user");
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str) -> String {
        Self::create_token_issued_at(user, secret, Utc::now().timestamp())
    }

    pub fn create_token_issued_at(user: &TestUser, secret: &str, issued_at: i64) -> String {
        issue_token_at(&user.to_claim(), secret, issued_at).expect("test token")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        let issued_at = Utc::now().timestamp() - TOKEN_TTL_SECONDS - 60;
        Self::create_token_issued_at(user, secret, issued_at)
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    if body.is_empty() {
        return json!(null);
    }
    serde_json::from_slice(&body).expect("JSON response body")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let app_config = TestConfig::default().to_app_config();

        assert!(!app_config.jwt_secret.is_empty());
        assert!(!app_config.is_production());
        assert!(!app_config.has_database());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::trainer("coach@example.com");
        assert_eq!(user.email, "coach@example.com");
        assert_eq!(user.role, Role::Trainer);

        let record = user.to_record();
        assert_eq!(record.email, user.email);
        assert_eq!(record.role, user.role);
        assert_eq!(record.id, user.id);
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let token = JwtTestUtils::create_test_token(&user, "test-secret");

        assert_eq!(token.split('.').count(), 3);
    }
}
