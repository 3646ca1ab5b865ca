use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::filter::{FilterError, FilterOrderInfo, SortDirection};

/// Errors from any DocumentStore backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key in {0}")]
    Duplicate(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A uniqueness rule over one collection.
///
/// With `while_null` set the rule only covers documents where that field is
/// missing or null, e.g. one open break per session.
#[derive(Debug, Clone, Copy)]
pub struct UniqueKey {
    pub collection: &'static str,
    pub fields: &'static [&'static str],
    pub while_null: Option<&'static str>,
}

impl UniqueKey {
    const fn new(collection: &'static str, fields: &'static [&'static str]) -> Self {
        Self { collection, fields, while_null: None }
    }

    const fn while_null(self, field: &'static str) -> Self {
        Self { while_null: Some(field), ..self }
    }

    /// Index name suffix, e.g. `session_id_open`
    pub fn name(&self) -> String {
        let mut name = self.fields.join("_");
        if self.while_null.is_some() {
            name.push_str("_open");
        }
        name
    }
}

/// Uniqueness rules; Postgres turns these into unique expression indexes
/// and the memory store checks them on write.
pub const UNIQUE_KEYS: &[UniqueKey] = &[
    UniqueKey::new("users", &["email"]),
    UniqueKey::new("users", &["phone"]),
    UniqueKey::new("admins", &["email"]),
    UniqueKey::new("sessions", &["user_id", "work_date"]),
    UniqueKey::new("breaks", &["session_id"]).while_null("end_time"),
];

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub order: Vec<FilterOrderInfo>,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn sort(mut self, column: &str, sort: SortDirection) -> Self {
        self.order.push(FilterOrderInfo { column: column.to_string(), sort });
        self
    }

    pub fn asc(self, column: &str) -> Self {
        self.sort(column, SortDirection::Asc)
    }

    pub fn desc(self, column: &str) -> Self {
        self.sort(column, SortDirection::Desc)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Collection-of-JSON-documents storage used by every handler.
///
/// Filters use the Mongo-style language compiled by `crate::filter`.
/// Documents must carry a string `id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Value, options: &FindOptions) -> Result<Vec<Value>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Value) -> Result<Option<Value>, StoreError> {
        let options = FindOptions::default().limit(1);
        Ok(self.find(collection, filter, &options).await?.into_iter().next())
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError>;

    /// Shallow-merges `set` into every matching document
    async fn update_many(&self, collection: &str, filter: &Value, set: &Value) -> Result<u64, StoreError>;

    async fn delete_many(&self, collection: &str, filter: &Value) -> Result<u64, StoreError>;

    async fn count(&self, collection: &str, filter: &Value) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Creates backing tables and indexes; no-op where nothing is needed
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn document_id(document: &Value) -> Result<String, StoreError> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidDocument("document must have a string id".to_string()))
}
