use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used by the class listing when the client sends none.
pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Trainers attached to each class in a listing.
pub const TRAINERS_PER_CLASS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymClass {
    pub id: String,
    pub class_name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub class_name: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWithTrainers {
    #[serde(flatten)]
    pub class: GymClass,
    pub trainers: Vec<TrainerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPage {
    pub classes: Vec<ClassWithTrainers>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}
