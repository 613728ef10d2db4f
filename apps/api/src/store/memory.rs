use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{compare_values, Document, DocumentStore, Query, StoreError};

/// In-process document store with the same query semantics as `PgDocumentStore`.
/// Documents are kept ordered by (collection, id), so unsorted queries are stable.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<(String, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;

        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|((c, _), _)| c == collection)
            .filter(|(_, data)| query.filters.iter().all(|f| f.matches(data)))
            .filter(|(_, data)| {
                query
                    .order_by_desc
                    .as_deref()
                    .map_or(true, |field| data.get(field).is_some())
            })
            .map(|((_, id), data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect();

        if let Some(field) = query.order_by_desc.as_deref() {
            matched.sort_by(|a, b| match (a.data.get(field), b.data.get(field)) {
                (Some(x), Some(y)) => compare_values(y, x),
                _ => Ordering::Equal,
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        Ok(matched)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.insert((collection.to_string(), id.to_string()), data);
        Ok(())
    }
}
