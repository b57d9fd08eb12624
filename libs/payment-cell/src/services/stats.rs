use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use shared_database::{collections, Aggregation, DocumentStore, Filter};
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::AdminStats;

pub struct StatsService {
    store: Arc<dyn DocumentStore>,
}

impl StatsService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, AppError> {
        let all = Filter::new();

        let revenue = self
            .store
            .aggregate(collections::PAYMENTS, &all, &Aggregation::Sum("price".to_string()))
            .await?;
        let paid_members = self
            .store
            .aggregate(
                collections::PAYMENTS,
                &all,
                &Aggregation::CountDistinct("email".to_string()),
            )
            .await?;

        let total_users = self.store.count_documents(collections::USERS, &all).await?;
        let newsletter_subscribers = self
            .store
            .estimated_document_count(collections::NEWSLETTER)
            .await?;
        let total_trainers = self
            .store
            .count_documents(collections::TRAINERS, &Filter::new().eq("status", "success"))
            .await?;

        let stats = AdminStats {
            total_revenue: revenue.as_f64().unwrap_or_default(),
            paid_members: count_value(&paid_members),
            total_users,
            newsletter_subscribers,
            total_trainers,
        };

        debug!("Admin stats: {:?}", stats);
        Ok(stats)
    }
}

fn count_value(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|v| v.max(0.0) as u64))
        .unwrap_or_default()
}
