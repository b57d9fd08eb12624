use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use shared_models::error::AppError;

pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "id";

pub mod collections {
    pub const USERS: &str = "users";
    pub const TRAINERS: &str = "trainers";
    pub const CLASSES: &str = "classes";
    pub const PAYMENTS: &str = "payments";
    pub const FORUMS: &str = "forums";
    pub const NEWSLETTER: &str = "newsletter";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unreachable: {0}")]
    Unavailable(String),

    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StoreError::Rejected { status, message } => {
                AppError::Internal(format!("store rejected request ({}): {}", status, message))
            }
            StoreError::Serialization(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    /// The field is an array holding the value. An object value matches any
    /// element carrying at least its keys.
    Contains(Value),
    /// Case-insensitive substring match on a string field.
    Matches(String),
}

impl Condition {
    fn matches(&self, field: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => field == Some(expected),
            Condition::Ne(expected) => field != Some(expected),
            Condition::In(candidates) => field.is_some_and(|v| candidates.contains(v)),
            Condition::Contains(expected) => field
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|item| json_contains(item, expected))),
            Condition::Matches(needle) => field
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}

fn json_contains(item: &Value, expected: &Value) -> bool {
    match (item, expected) {
        (Value::Object(item), Value::Object(expected)) => expected
            .iter()
            .all(|(key, value)| item.get(key).is_some_and(|found| json_contains(found, value))),
        _ => item == expected,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), Condition::Eq(value.into())));
        self
    }

    pub fn ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), Condition::Ne(value.into())));
        self
    }

    pub fn is_in(mut self, field: &str, values: Vec<Value>) -> Self {
        self.conditions.push((field.to_string(), Condition::In(values)));
        self
    }

    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), Condition::Contains(value.into())));
        self
    }

    pub fn matches_text(mut self, field: &str, needle: &str) -> Self {
        self.conditions.push((field.to_string(), Condition::Matches(needle.to_string())));
        self
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(document.get(field)))
    }

    /// Fields pinned by equality, used to seed an upserted document.
    pub fn equality_fields(&self) -> Document {
        self.conditions
            .iter()
            .filter_map(|(field, condition)| match condition {
                Condition::Eq(value) => Some((field.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub projection: Option<Vec<String>>,
    pub sort: Option<(String, SortOrder)>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn project(mut self, fields: &[&str]) -> Self {
        self.projection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some((field.to_string(), order));
        self
    }

    pub fn page(mut self, skip: u64, limit: u64) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keeps the projected fields and the id, like a document database does.
    pub fn apply_projection(&self, document: Document) -> Document {
        match &self.projection {
            None => document,
            Some(fields) => document
                .into_iter()
                .filter(|(key, _)| key == ID_FIELD || fields.iter().any(|f| f == key))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    pub upsert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Sum(String),
    CountDistinct(String),
}

impl Aggregation {
    pub fn field(&self) -> &str {
        match self {
            Aggregation::Sum(field) | Aggregation::CountDistinct(field) => field,
        }
    }

    pub fn apply(&self, documents: &[Document]) -> Value {
        match self {
            Aggregation::Sum(field) => {
                let total: f64 = documents
                    .iter()
                    .filter_map(|doc| doc.get(field).and_then(Value::as_f64))
                    .sum();
                json!(total)
            }
            Aggregation::CountDistinct(field) => {
                let distinct: HashSet<String> = documents
                    .iter()
                    .filter_map(|doc| doc.get(field))
                    .filter(|value| !value.is_null())
                    .map(Value::to_string)
                    .collect();
                json!(distinct.len() as u64)
            }
        }
    }
}

/// Collection-oriented document store the services are written against.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOneResult, StoreError>;

    /// Applies `set` as field assignments to the first matching document.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError>;

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn estimated_document_count(&self, collection: &str) -> Result<u64, StoreError> {
        self.count_documents(collection, &Filter::new()).await
    }

    async fn aggregate(
        &self,
        collection: &str,
        filter: &Filter,
        aggregation: &Aggregation,
    ) -> Result<Value, StoreError> {
        let options = FindOptions::default().project(&[aggregation.field()]);
        let documents = self.find(collection, filter, &options).await?;
        Ok(aggregation.apply(&documents))
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Makes sure the document carries a string id and returns it.
pub fn ensure_id(document: &mut Document) -> String {
    match document.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = new_id();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            "expected a JSON object",
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
