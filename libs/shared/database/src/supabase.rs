use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response,
};
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::store::{
    ensure_id, Condition, DeleteResult, Document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder, StoreError, UpdateOptions, UpdateResult, ID_FIELD,
};

/// Document store backed by a Supabase/PostgREST endpoint; one table per collection.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .default_headers(Self::default_headers(&config.database_api_key)?)
            .build()?;

        Ok(Self {
            client,
            base_url: config.database_url.trim_end_matches('/').to_string(),
        })
    }

    fn default_headers(api_key: &str) -> Result<HeaderMap, StoreError> {
        let invalid = |_| StoreError::Unavailable("database api key is not a valid header value".to_string());
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid)?,
        );

        Ok(headers)
    }

    fn request(&self, method: Method, collection: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, collection);
        debug!("Making {} request to {}", method, url);
        self.client.request(method, url)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await?;
        error!("Store API error ({}): {}", status, error_text);

        if status.is_server_error() {
            Err(StoreError::Unavailable(format!("{}: {}", status, error_text)))
        } else {
            Err(StoreError::Rejected {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    async fn count_with(&self, collection: &str, filter: &Filter, mode: &'static str) -> Result<u64, StoreError> {
        let response = self
            .request(Method::HEAD, collection)
            .query(&filter_params(filter))
            .header("Prefer", mode)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        parse_content_range_total(range).ok_or_else(|| StoreError::Rejected {
            status: response.status().as_u16(),
            message: format!("missing count in content-range '{}'", range),
        })
    }
}

/// Renders a filter as PostgREST query parameters.
pub fn filter_params(filter: &Filter) -> Vec<(String, String)> {
    filter
        .conditions()
        .iter()
        .map(|(field, condition)| {
            let rendered = match condition {
                Condition::Eq(Value::Null) => "is.null".to_string(),
                Condition::Eq(value) => format!("eq.{}", render_scalar(value)),
                Condition::Ne(Value::Null) => "not.is.null".to_string(),
                Condition::Ne(value) => format!("neq.{}", render_scalar(value)),
                Condition::In(values) => format!(
                    "in.({})",
                    values.iter().map(render_quoted).collect::<Vec<_>>().join(",")
                ),
                Condition::Contains(value @ Value::Object(_)) => format!("cs.[{}]", value),
                Condition::Contains(value) => format!("cs.{{{}}}", render_quoted(value)),
                Condition::Matches(needle) => format!("ilike.*{}*", needle),
            };
            (field.clone(), rendered)
        })
        .collect()
}

fn find_params(options: &FindOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();

    let select = match &options.projection {
        Some(fields) => {
            let mut columns = vec![ID_FIELD.to_string()];
            columns.extend(fields.iter().filter(|f| f.as_str() != ID_FIELD).cloned());
            columns.join(",")
        }
        None => "*".to_string(),
    };
    params.push(("select".to_string(), select));

    if let Some((field, order)) = &options.sort {
        let direction = match order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{}", field, direction)));
    }
    if let Some(skip) = options.skip {
        params.push(("offset".to_string(), skip.to_string()));
    }
    if let Some(limit) = options.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        other => other.to_string(),
    }
}

/// `0-24/312` or `*/312` -> 312
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/').and_then(|(_, total)| total.parse().ok())
}

fn id_of(document: &Document) -> Option<String> {
    document.get(ID_FIELD).and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let options = FindOptions::default().limit(1);
        Ok(self.find(collection, filter, &options).await?.into_iter().next())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let response = self
            .request(Method::GET, collection)
            .query(&filter_params(filter))
            .query(&find_params(options))
            .send()
            .await?;
        let rows: Vec<Document> = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertOneResult, StoreError> {
        let id = ensure_id(&mut document);

        let response = self
            .request(Method::POST, collection)
            .header("Prefer", "return=minimal")
            .json(&document)
            .send()
            .await?;
        Self::check(response).await?;

        debug!("Inserted document {} into {}", id, collection);
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        options: UpdateOptions,
    ) -> Result<UpdateResult, StoreError> {
        // PATCH touches every matching row, so resolve the single target first.
        let target = self.find_one(collection, filter).await?;

        let Some(id) = target.as_ref().and_then(id_of) else {
            if !options.upsert {
                return Ok(UpdateResult {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: None,
                });
            }
            let mut document = filter.equality_fields();
            document.extend(set);
            let inserted = self.insert_one(collection, document).await?;
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(inserted.inserted_id),
            });
        };

        let response = self
            .request(Method::PATCH, collection)
            .query(&filter_params(&Filter::by_id(&id)))
            .header("Prefer", "return=representation")
            .json(&set)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: rows.len() as u64,
            upserted_id: None,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let Some(id) = self.find_one(collection, filter).await?.as_ref().and_then(id_of) else {
            return Ok(DeleteResult {
                acknowledged: true,
                deleted_count: 0,
            });
        };

        let response = self
            .request(Method::DELETE, collection)
            .query(&filter_params(&Filter::by_id(&id)))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: rows.len() as u64,
        })
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.count_with(collection, filter, "count=exact").await
    }

    async fn estimated_document_count(&self, collection: &str) -> Result<u64, StoreError> {
        self.count_with(collection, &Filter::new(), "count=estimated").await
    }
}
