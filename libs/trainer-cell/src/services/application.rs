use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use shared_database::{
    collections, from_document, new_id, to_document, DeleteResult, Document, DocumentStore, Filter,
    FindOptions, InsertOneResult, SortOrder, UpdateOptions, UpdateResult,
};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::validation::require_non_empty;
use shared_utils::state::AppState;

use crate::models::{ApplicationStatus, ApplyRequest, TrainerApplication, TrainerError};

/// Drives trainer applications through `pending -> success | rejected`.
pub struct TrainerService {
    store: Arc<dyn DocumentStore>,
    reapply_after_rejection: bool,
}

impl TrainerService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone(), state.config.trainer_reapply_after_rejection)
    }

    pub fn with_store(store: Arc<dyn DocumentStore>, reapply_after_rejection: bool) -> Self {
        Self {
            store,
            reapply_after_rejection,
        }
    }

    /// Files a new `pending` application. An existing application for the same
    /// email blocks it; with re-application enabled a rejected one is replaced.
    pub async fn apply(&self, email: &str, request: ApplyRequest) -> Result<InsertOneResult, AppError> {
        require_non_empty("name", &request.name)?;
        debug!("Trainer application from {}", email);

        let mut replaced = None;
        if let Some(existing) = self.find_by_email(email).await? {
            let replaceable =
                self.reapply_after_rejection && existing.status == ApplicationStatus::Rejected;
            if !replaceable {
                return Err(TrainerError::AlreadyApplied {
                    email: email.to_string(),
                    status: existing.status,
                }
                .into());
            }
            replaced = Some(existing.id);
        }

        let application = TrainerApplication {
            id: new_id(),
            email: email.to_string(),
            name: request.name,
            age: request.age,
            image: request.image,
            experience: request.experience,
            skills: request.skills,
            slots: request.slots,
            status: ApplicationStatus::Pending,
            feedback_message: None,
            created_at: Utc::now(),
        };

        let result = self
            .store
            .insert_one(collections::TRAINERS, to_document(&application)?)
            .await?;

        // the rejected record only goes once its replacement is stored
        if let Some(old_id) = replaced {
            info!("Replacing rejected application {} for {}", old_id, email);
            self.store
                .delete_one(collections::TRAINERS, &Filter::by_id(&old_id))
                .await?;
        }

        info!("Trainer application {} filed for {}", result.inserted_id, email);
        Ok(result)
    }

    /// Sets the status to `success` whatever it was, and promotes the applicant.
    pub async fn approve(&self, id: &str) -> Result<UpdateResult, AppError> {
        let application = self.get(id).await?;

        let result = self
            .set_fields(id, Self::status_update(ApplicationStatus::Success))
            .await?;
        self.set_user_role(&application.email, Role::Trainer).await?;

        info!("Trainer application {} approved", id);
        Ok(result)
    }

    /// Sets the status to `rejected` whatever it was, recording the feedback.
    pub async fn reject(&self, id: &str, feedback: &str) -> Result<UpdateResult, AppError> {
        let mut set = Self::status_update(ApplicationStatus::Rejected);
        set.insert("feedbackMessage".to_string(), json!(feedback));

        let result = self.set_fields(id, set).await?;

        info!("Trainer application {} rejected", id);
        Ok(result)
    }

    /// Deletes the application; an approved trainer drops back to member.
    pub async fn remove(&self, id: &str) -> Result<DeleteResult, AppError> {
        let application = self.get(id).await?;

        let result = self
            .store
            .delete_one(collections::TRAINERS, &Filter::by_id(id))
            .await?;
        if result.deleted_count == 0 {
            return Err(TrainerError::NotFound(id.to_string()).into());
        }

        if application.status == ApplicationStatus::Success {
            self.set_user_role(&application.email, Role::Member).await?;
        }

        info!("Trainer application {} removed", id);
        Ok(result)
    }

    pub async fn get(&self, id: &str) -> Result<TrainerApplication, AppError> {
        let document = self
            .store
            .find_one(collections::TRAINERS, &Filter::by_id(id))
            .await?
            .ok_or_else(|| TrainerError::NotFound(id.to_string()))?;

        Ok(from_document(document)?)
    }

    pub async fn get_approved(&self, id: &str) -> Result<TrainerApplication, AppError> {
        let application = self.get(id).await?;
        if application.status != ApplicationStatus::Success {
            return Err(TrainerError::NotFound(id.to_string()).into());
        }
        Ok(application)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<TrainerApplication>, AppError> {
        let document = self
            .store
            .find_one(collections::TRAINERS, &Filter::new().eq("email", email))
            .await?;

        Ok(document.map(from_document::<TrainerApplication>).transpose()?)
    }

    pub async fn list_by_status(&self, status: ApplicationStatus) -> Result<Vec<TrainerApplication>, AppError> {
        let options = FindOptions::default().sort_by("createdAt", SortOrder::Ascending);
        let documents = self
            .store
            .find(
                collections::TRAINERS,
                &Filter::new().eq("status", status.as_str()),
                &options,
            )
            .await?;

        documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(AppError::from))
            .collect()
    }

    fn status_update(status: ApplicationStatus) -> Document {
        let mut set = Document::new();
        set.insert("status".to_string(), json!(status));
        set
    }

    async fn set_fields(&self, id: &str, set: Document) -> Result<UpdateResult, AppError> {
        let result = self
            .store
            .update_one(collections::TRAINERS, &Filter::by_id(id), set, UpdateOptions::default())
            .await?;

        if result.matched_count == 0 {
            return Err(TrainerError::NotFound(id.to_string()).into());
        }
        Ok(result)
    }

    async fn set_user_role(&self, email: &str, role: Role) -> Result<(), AppError> {
        let mut set = Document::new();
        set.insert("role".to_string(), json!(role));

        let result = self
            .store
            .update_one(
                collections::USERS,
                &Filter::new().eq("email", email),
                set,
                UpdateOptions::default(),
            )
            .await?;

        if result.matched_count == 0 {
            warn!("No user record for {}, role left unchanged", email);
        }
        Ok(())
    }
}
