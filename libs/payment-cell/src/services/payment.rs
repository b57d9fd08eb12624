use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use shared_database::{
    collections, from_document, new_id, to_document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder,
};
use shared_models::error::AppError;
use shared_models::validation::require_non_empty;
use shared_utils::state::AppState;

use crate::models::{CreatePaymentRequest, Payment};

pub struct PaymentService {
    store: Arc<dyn DocumentStore>,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Records a payment made by `email`, which always comes from the session.
    pub async fn record_payment(
        &self,
        email: &str,
        request: CreatePaymentRequest,
    ) -> Result<InsertOneResult, AppError> {
        if !request.price.is_finite() || request.price <= 0.0 {
            return Err(AppError::ValidationError("price must be greater than zero".to_string()));
        }
        require_non_empty("transactionId", &request.transaction_id)?;

        let payment = Payment {
            id: new_id(),
            email: email.to_string(),
            price: request.price,
            transaction_id: request.transaction_id.trim().to_string(),
            package_name: request.package_name,
            trainer_id: request.trainer_id,
            slot_name: request.slot_name,
            created_at: Utc::now(),
        };

        let result = self
            .store
            .insert_one(collections::PAYMENTS, to_document(&payment)?)
            .await?;

        info!("Recorded payment {} of {} for {}", payment.transaction_id, payment.price, email);
        Ok(result)
    }

    /// Newest first.
    pub async fn payments_for(&self, email: &str) -> Result<Vec<Payment>, AppError> {
        let options = FindOptions::default().sort_by("createdAt", SortOrder::Descending);
        let documents = self
            .store
            .find(collections::PAYMENTS, &Filter::new().eq("email", email), &options)
            .await?;

        debug!("Found {} payments for {}", documents.len(), email);
        documents
            .into_iter()
            .map(|doc| from_document(doc).map_err(AppError::from))
            .collect()
    }
}
