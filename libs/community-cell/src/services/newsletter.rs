use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use shared_database::{
    collections, from_document, new_id, to_document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder,
};
use shared_models::error::AppError;
use shared_models::validation::{require_non_empty, validate_email};
use shared_utils::state::AppState;

use crate::models::{SubscribeRequest, Subscriber};

pub struct NewsletterService {
    store: Arc<dyn DocumentStore>,
}

impl NewsletterService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<InsertOneResult, AppError> {
        require_non_empty("name", &request.name)?;
        validate_email(&request.email)?;
        let email = request.email.trim().to_string();

        let existing = self
            .store
            .find_one(collections::NEWSLETTER, &Filter::new().eq("email", email.as_str()))
            .await?;
        if existing.is_some() {
            debug!("{} is already subscribed", email);
            return Err(AppError::AlreadyExists("already subscribed".to_string()));
        }

        let subscriber = Subscriber {
            id: new_id(),
            name: request.name.trim().to_string(),
            email,
            created_at: Utc::now(),
        };

        let result = self
            .store
            .insert_one(collections::NEWSLETTER, to_document(&subscriber)?)
            .await?;

        info!("New newsletter subscriber {}", subscriber.email);
        Ok(result)
    }

    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>, AppError> {
        let options = FindOptions::default().sort_by("createdAt", SortOrder::Descending);
        let documents = self
            .store
            .find(collections::NEWSLETTER, &Filter::new(), &options)
            .await?;

        documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(AppError::from))
            .collect()
    }
}
