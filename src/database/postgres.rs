use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool};

use super::manager::DatabaseManager;
use super::store::{document_id, DocumentStore, FindOptions, StoreError};
use crate::filter::{FilterOrder, FilterWhere};

/// DocumentStore over a single JSONB table
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-index violations to `Duplicate` so callers can answer 409
fn map_write_error(collection: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate(collection.to_string()),
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: &str, filter: &Value, options: &FindOptions) -> Result<Vec<Value>, StoreError> {
        // $1 is the collection name
        let (where_clause, params) = FilterWhere::generate(filter, 1)?;
        let order_clause = FilterOrder::generate(&options.order)?;

        let mut query = format!(
            "SELECT body FROM {} WHERE collection = $1 AND ({})",
            DatabaseManager::TABLE,
            where_clause
        );
        if !order_clause.is_empty() {
            query.push(' ');
            query.push_str(&order_clause);
        }
        if let Some(limit) = options.limit {
            query.push_str(&format!(" LIMIT {}", limit.max(0)));
        }

        let mut q = sqlx::query_scalar::<_, Json<Value>>(&query).bind(collection);
        for p in params {
            q = q.bind(Json(p));
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        let id = document_id(&document)?;
        let query = format!(
            "INSERT INTO {} (collection, id, body) VALUES ($1, $2, $3)",
            DatabaseManager::TABLE
        );
        sqlx::query(&query)
            .bind(collection)
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, e))?;
        Ok(())
    }

    async fn update_many(&self, collection: &str, filter: &Value, set: &Value) -> Result<u64, StoreError> {
        if !set.is_object() {
            return Err(StoreError::InvalidDocument("update must be an object".to_string()));
        }
        // $1 collection, $2 patch
        let (where_clause, params) = FilterWhere::generate(filter, 2)?;
        let query = format!(
            "UPDATE {} SET body = body || $2 WHERE collection = $1 AND ({})",
            DatabaseManager::TABLE,
            where_clause
        );

        let mut q = sqlx::query(&query).bind(collection).bind(Json(set.clone()));
        for p in params {
            q = q.bind(Json(p));
        }
        let result = q.execute(&self.pool).await.map_err(|e| map_write_error(collection, e))?;
        Ok(result.rows_affected())
    }

    async fn delete_many(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let (where_clause, params) = FilterWhere::generate(filter, 1)?;
        let query = format!(
            "DELETE FROM {} WHERE collection = $1 AND ({})",
            DatabaseManager::TABLE,
            where_clause
        );

        let mut q = sqlx::query(&query).bind(collection);
        for p in params {
            q = q.bind(Json(p));
        }
        let result = q.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let (where_clause, params) = FilterWhere::generate(filter, 1)?;
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE collection = $1 AND ({})",
            DatabaseManager::TABLE,
            where_clause
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(collection);
        for p in params {
            q = q.bind(Json(p));
        }
        let count = q.fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        DatabaseManager::ensure_schema(&self.pool).await
    }
}
