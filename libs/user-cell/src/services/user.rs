use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use shared_database::{
    collections, from_document, new_id, to_document, Document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder, UpdateOptions, UpdateResult,
};
use shared_models::auth::{Role, UserRecord};
use shared_models::error::AppError;
use shared_models::validation::validate_email;
use shared_utils::access::find_user_by_email;
use shared_utils::state::AppState;

use crate::models::{CreateUserRequest, RoleLookup};

pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// New users always start as members.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<InsertOneResult, AppError> {
        validate_email(&request.email)?;

        if find_user_by_email(self.store.as_ref(), &request.email).await?.is_some() {
            debug!("User {} already exists", request.email);
            return Err(AppError::AlreadyExists("user already exists".to_string()));
        }

        let user = UserRecord {
            id: new_id(),
            email: request.email,
            name: request.name,
            image: request.image,
            role: Role::Member,
            created_at: Some(Utc::now()),
        };

        let result = self
            .store
            .insert_one(collections::USERS, to_document(&user)?)
            .await?;

        info!("Created user {}", user.email);
        Ok(result)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let options = FindOptions::default().sort_by("createdAt", SortOrder::Descending);
        let documents = self
            .store
            .find(collections::USERS, &Filter::new(), &options)
            .await?;

        documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(AppError::from))
            .collect()
    }

    pub async fn lookup_role(&self, email: &str) -> Result<RoleLookup, AppError> {
        Ok(match find_user_by_email(self.store.as_ref(), email).await? {
            Some(user) => RoleLookup::Found { role: user.role },
            None => RoleLookup::Missing {
                message: "user not found".to_string(),
            },
        })
    }

    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<UpdateResult, AppError> {
        let mut set = Document::new();
        set.insert("role".to_string(), json!(role));

        let result = self
            .store
            .update_one(collections::USERS, &Filter::by_id(user_id), set, UpdateOptions::default())
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        info!("User {} is now {}", user_id, role);
        Ok(result)
    }
}
