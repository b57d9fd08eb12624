use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Success,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Success => "success",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSlot {
    pub slot_name: String,
    pub slot_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerApplication {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub slots: Vec<TrainerSlot>,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub age: Option<u32>,
    pub image: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub slots: Vec<TrainerSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(alias = "feedbackMessage")]
    pub feedback: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("An application for {email} already exists with status {status}")]
    AlreadyApplied {
        email: String,
        status: ApplicationStatus,
    },

    #[error("Trainer application {0} not found")]
    NotFound(String),
}

impl From<TrainerError> for AppError {
    fn from(err: TrainerError) -> Self {
        match err {
            TrainerError::AlreadyApplied { .. } => AppError::AlreadyExists(err.to_string()),
            TrainerError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}
