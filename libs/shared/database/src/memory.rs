use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{
    compare_values, ensure_id, DeleteResult, Document, DocumentStore, Filter, FindOptions,
    InsertOneResult, SortOrder, StoreError, UpdateOptions, UpdateResult,
};

/// In-process store used for local development and tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection, mostly useful in assertions.
    pub async fn dump(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let limit = options.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| options.apply_projection(doc))
            .collect())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<InsertOneResult, StoreError> {
        let id = ensure_id(&mut document);
        debug!("Inserting document {} into {}", id, collection);

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

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
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| filter.matches(doc)) {
            let mut modified = false;
            for (key, value) in set {
                if doc.get(&key) != Some(&value) {
                    doc.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateResult {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_id: None,
            });
        }

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
        let id = ensure_id(&mut document);
        debug!("Upserting document {} into {}", id, collection);
        docs.push(document);

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(collection) {
            Some(docs) => match docs.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }
}
