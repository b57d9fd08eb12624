use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::auth::Role;

pub const DEFAULT_FORUM_PAGE_SIZE: u64 = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    pub author_name: String,
    pub author_email: String,
    #[serde(default)]
    pub author_image: Option<String>,
    pub author_role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPage {
    pub posts: Vec<ForumPost>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub name: String,
    pub email: String,
}
