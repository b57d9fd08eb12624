use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub email: String,
    pub price: f64,
    pub transaction_id: String,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
    #[serde(default)]
    pub slot_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub price: f64,
    #[serde(default)]
    pub transaction_id: String,
    pub package_name: Option<String>,
    pub trainer_id: Option<String>,
    pub slot_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_revenue: f64,
    pub paid_members: u64,
    pub total_users: u64,
    pub newsletter_subscribers: u64,
    pub total_trainers: u64,
}
