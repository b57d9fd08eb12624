use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use shared_database::{
    collections, from_document, new_id, to_document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder,
};
use shared_models::error::AppError;
use shared_models::pagination::PageQuery;
use shared_models::validation::require_non_empty;
use shared_utils::state::AppState;

use crate::models::{
    ClassPage, ClassWithTrainers, CreateClassRequest, GymClass, TrainerSummary, DEFAULT_PAGE_SIZE,
    TRAINERS_PER_CLASS,
};

pub struct ClassService {
    store: Arc<dyn DocumentStore>,
}

impl ClassService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create_class(&self, request: CreateClassRequest) -> Result<InsertOneResult, AppError> {
        require_non_empty("className", &request.class_name)?;
        let class_name = request.class_name.trim().to_string();

        let existing = self
            .store
            .find_one(collections::CLASSES, &Filter::new().eq("className", class_name.as_str()))
            .await?;
        if existing.is_some() {
            debug!("Class {} already exists", class_name);
            return Err(AppError::AlreadyExists(format!("class {} already exists", class_name)));
        }

        let class = GymClass {
            id: new_id(),
            class_name,
            image: request.image,
            description: request.description,
            created_at: Utc::now(),
        };

        let result = self
            .store
            .insert_one(collections::CLASSES, to_document(&class)?)
            .await?;

        info!("Created class {}", class.class_name);
        Ok(result)
    }

    /// One page of classes, each joined with the approved trainers teaching it.
    pub async fn list_classes(&self, query: &PageQuery) -> Result<ClassPage, AppError> {
        let window = query.window(DEFAULT_PAGE_SIZE);

        let mut filter = Filter::new();
        if let Some(term) = query.search_term() {
            filter = filter.matches_text("className", term);
        }

        let total = self.store.count_documents(collections::CLASSES, &filter).await?;

        let options = FindOptions::default()
            .sort_by("createdAt", SortOrder::Ascending)
            .page(window.skip(), window.size);
        let documents = self.store.find(collections::CLASSES, &filter, &options).await?;

        let mut classes = Vec::with_capacity(documents.len());
        for document in documents {
            let class: GymClass = from_document(document)?;
            let trainers = self.trainers_for(&class.class_name).await?;
            classes.push(ClassWithTrainers { class, trainers });
        }

        debug!("Listed {} of {} classes", classes.len(), total);
        Ok(ClassPage {
            classes,
            total,
            page: window.page,
            size: window.size,
            total_pages: window.total_pages(total),
        })
    }

    /// Approved trainers listing the class among their skills, then those with a
    /// slot for it, without duplicates.
    async fn trainers_for(&self, class_name: &str) -> Result<Vec<TrainerSummary>, AppError> {
        let by_skill = Filter::new()
            .eq("status", "success")
            .contains("skills", class_name);
        let by_slot = Filter::new()
            .eq("status", "success")
            .contains("slots", json!({ "className": class_name }));
        let options = FindOptions::default()
            .project(&["name", "image"])
            .limit(TRAINERS_PER_CLASS);

        let mut trainers: Vec<TrainerSummary> = Vec::new();
        for filter in [by_skill, by_slot] {
            if trainers.len() as u64 >= TRAINERS_PER_CLASS {
                break;
            }

            let documents = self.store.find(collections::TRAINERS, &filter, &options).await?;
            for document in documents {
                let trainer: TrainerSummary = from_document(document)?;
                if trainers.len() as u64 >= TRAINERS_PER_CLASS {
                    break;
                }
                if !trainers.iter().any(|known| known.id == trainer.id) {
                    trainers.push(trainer);
                }
            }
        }

        Ok(trainers)
    }
}
