use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use shared_database::{
    collections, from_document, new_id, to_document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder,
};
use shared_models::auth::UserRecord;
use shared_models::error::AppError;
use shared_models::pagination::PageQuery;
use shared_models::validation::require_non_empty;
use shared_utils::state::AppState;

use crate::models::{CreatePostRequest, ForumPage, ForumPost, DEFAULT_FORUM_PAGE_SIZE};

pub struct ForumService {
    store: Arc<dyn DocumentStore>,
}

impl ForumService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Author details are copied from the stored user record, never from the request.
    pub async fn create_post(
        &self,
        author: &UserRecord,
        request: CreatePostRequest,
    ) -> Result<InsertOneResult, AppError> {
        require_non_empty("title", &request.title)?;
        require_non_empty("content", &request.content)?;

        let post = ForumPost {
            id: new_id(),
            title: request.title.trim().to_string(),
            content: request.content,
            image: request.image,
            author_name: author.name.clone().unwrap_or_else(|| author.email.clone()),
            author_email: author.email.clone(),
            author_image: author.image.clone(),
            author_role: author.role,
            created_at: Utc::now(),
        };

        let result = self
            .store
            .insert_one(collections::FORUMS, to_document(&post)?)
            .await?;

        info!("Forum post {} created by {}", result.inserted_id, author.email);
        Ok(result)
    }

    pub async fn list_posts(&self, query: &PageQuery) -> Result<ForumPage, AppError> {
        let window = query.window(DEFAULT_FORUM_PAGE_SIZE);
        let filter = Filter::new();

        let total = self.store.count_documents(collections::FORUMS, &filter).await?;
        let options = FindOptions::default()
            .sort_by("createdAt", SortOrder::Descending)
            .page(window.skip(), window.size);
        let documents = self.store.find(collections::FORUMS, &filter, &options).await?;

        let posts = documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(AppError::from))
            .collect::<Result<Vec<ForumPost>, AppError>>()?;

        debug!("Listed {} of {} forum posts", posts.len(), total);
        Ok(ForumPage {
            posts,
            total,
            page: window.page,
            size: window.size,
            total_pages: window.total_pages(total),
        })
    }

    pub async fn get_post(&self, id: &str) -> Result<ForumPost, AppError> {
        let document = self
            .store
            .find_one(collections::FORUMS, &Filter::by_id(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("forum post {} not found", id)))?;

        Ok(from_document(document)?)
    }
}
