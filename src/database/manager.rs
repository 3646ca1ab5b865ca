use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::store::{StoreError, UNIQUE_KEYS};
use crate::config::DatabaseConfig;

/// Pool construction and schema bootstrap for the Postgres document table
pub struct DatabaseManager;

impl DatabaseManager {
    /// Table holding every collection; `body` is the document itself
    pub const TABLE: &'static str = "documents";

    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let url = config.url.as_deref().ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        info!("Created database pool for: {}", Self::redacted_url(url));
        Ok(pool)
    }

    pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
        for statement in Self::schema_statements() {
            sqlx::query(&statement).execute(pool).await?;
        }
        info!("Document schema ready ({} unique keys)", UNIQUE_KEYS.len());
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn schema_statements() -> Vec<String> {
        let mut statements = vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    collection TEXT NOT NULL,
                    id TEXT NOT NULL,
                    body JSONB NOT NULL,
                    PRIMARY KEY (collection, id)
                )",
                Self::TABLE
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {0}_body_gin ON {0} USING GIN (body jsonb_path_ops)",
                Self::TABLE
            ),
        ];

        for key in UNIQUE_KEYS {
            let expressions: Vec<String> = key.fields.iter().map(|f| format!("(body->>'{}')", f)).collect();
            let mut predicate = format!("collection = '{}'", key.collection);
            if let Some(field) = key.while_null {
                predicate.push_str(&format!(" AND (body->>'{}') IS NULL", field));
            }
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{collection}_{name}_key ON {table} ({exprs}) WHERE {predicate}",
                table = Self::TABLE,
                collection = key.collection,
                name = key.name(),
                exprs = expressions.join(", "),
                predicate = predicate,
            ));
        }

        statements
    }

    /// Strips the password from a connection URL before it is logged
    fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable url>".to_string(),
        }
    }
}
