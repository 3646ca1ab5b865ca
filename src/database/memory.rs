use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::store::{document_id, DocumentStore, FindOptions, StoreError, UniqueKey, UNIQUE_KEYS};
use crate::filter::{FilterOrder, FilterWhere};

/// DocumentStore kept in process memory, used by tests and `--in-memory`
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Key tuple of `doc` for a unique rule; `None` when any part is missing or null
/// or when the document falls outside a `while_null` rule
fn unique_tuple(doc: &Value, key: &UniqueKey) -> Option<Vec<String>> {
    if let Some(field) = key.while_null {
        if doc.get(field).is_some_and(|v| !v.is_null()) {
            return None;
        }
    }
    key.fields
        .iter()
        .map(|f| match doc.get(*f) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
        .collect()
}

/// Rejects `candidate` when it collides with any document other than itself
fn check_unique(collection: &str, docs: &[Value], candidate: &Value, skip_id: Option<&str>) -> Result<(), StoreError> {
    for key in UNIQUE_KEYS.iter().filter(|k| k.collection == collection) {
        let Some(tuple) = unique_tuple(candidate, key) else {
            continue;
        };
        let clash = docs.iter().any(|doc| {
            let same = skip_id.is_some() && doc.get("id").and_then(Value::as_str) == skip_id;
            !same && unique_tuple(doc, key).as_ref() == Some(&tuple)
        });
        if clash {
            return Err(StoreError::Duplicate(collection.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Value, options: &FindOptions) -> Result<Vec<Value>, StoreError> {
        let condition = FilterWhere::parse(filter)?;
        let collections = self.collections.read().await;

        let mut rows: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| condition.matches(d)).cloned().collect())
            .unwrap_or_default();

        if !options.order.is_empty() {
            rows.sort_by(|a, b| FilterOrder::compare(&options.order, a, b));
        }
        if let Some(limit) = options.limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        let id = document_id(&document)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|d| d.get("id").and_then(Value::as_str) == Some(id.as_str())) {
            return Err(StoreError::Duplicate(collection.to_string()));
        }
        check_unique(collection, docs, &document, None)?;

        docs.push(document);
        Ok(())
    }

    async fn update_many(&self, collection: &str, filter: &Value, set: &Value) -> Result<u64, StoreError> {
        let patch: &Map<String, Value> = set
            .as_object()
            .ok_or_else(|| StoreError::InvalidDocument("update must be an object".to_string()))?;
        let condition = FilterWhere::parse(filter)?;

        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        // Build every replacement first so a unique clash leaves nothing half-applied
        let mut updates = Vec::new();
        for (index, doc) in docs.iter().enumerate() {
            if !condition.matches(doc) {
                continue;
            }
            let mut merged = doc.clone();
            if let Some(obj) = merged.as_object_mut() {
                for (k, v) in patch {
                    obj.insert(k.clone(), v.clone());
                }
            }
            let id = document_id(&merged)?;
            check_unique(collection, docs, &merged, Some(&id))?;
            updates.push((index, merged));
        }

        let changed = updates.len() as u64;
        for (index, merged) in updates {
            docs[index] = merged;
        }
        Ok(changed)
    }

    async fn delete_many(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let condition = FilterWhere::parse(filter)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !condition.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let condition = FilterWhere::parse(filter)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| condition.matches(d)).count() as u64)
            .unwrap_or(0))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
