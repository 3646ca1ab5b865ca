use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use super::store::{DocumentStore, FindOptions, StoreError};

/// A typed record living in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Human label used in not-found messages
    const LABEL: &'static str;
}

/// Typed access to one collection of a DocumentStore
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<T>,
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    fn decode(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn select_any(&self, filter: Value) -> Result<Vec<T>, StoreError> {
        self.select_sorted(filter, FindOptions::default()).await
    }

    pub async fn select_sorted(&self, filter: Value, options: FindOptions) -> Result<Vec<T>, StoreError> {
        let rows = self.store.find(T::COLLECTION, &filter, &options).await?;
        Self::decode(rows)
    }

    pub async fn select_one(&self, filter: Value) -> Result<Option<T>, StoreError> {
        match self.store.find_one(T::COLLECTION, &filter).await? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn select_404(&self, id: &str) -> Result<T, StoreError> {
        self.select_one(json!({ "id": id }))
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("{} not found", T::LABEL)))
    }

    pub async fn count(&self, filter: Value) -> Result<u64, StoreError> {
        self.store.count(T::COLLECTION, &filter).await
    }

    pub async fn insert(&self, record: &T) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(T::COLLECTION, doc).await
    }

    pub async fn update(&self, filter: Value, set: Value) -> Result<u64, StoreError> {
        self.store.update_many(T::COLLECTION, &filter, &set).await
    }

    /// Patches one record and returns the stored result; 404 when absent
    pub async fn update_by_id(&self, id: &str, set: Value) -> Result<T, StoreError> {
        let changed = self.update(json!({ "id": id }), set).await?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("{} not found", T::LABEL)));
        }
        self.select_404(id).await
    }

    pub async fn delete(&self, filter: Value) -> Result<u64, StoreError> {
        self.store.delete_many(T::COLLECTION, &filter).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        match self.delete(json!({ "id": id })).await? {
            0 => Err(StoreError::NotFound(format!("{} not found", T::LABEL))),
            _ => Ok(()),
        }
    }
}
