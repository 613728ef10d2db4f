use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::{Document, DocumentStore, FilterOp, Query, StoreError};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            data: row.data.0,
        }
    }
}

/// Document store over a single `documents (collection, id, data JSONB)` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translates a declarative query into SQL over the JSONB `data` column.
/// Field names and values are always bound, never interpolated.
fn build_select<'a>(collection: &'a str, query: &'a Query) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    builder.push_bind(collection);

    for filter in &query.filters {
        builder.push(" AND data -> ");
        builder.push_bind(filter.field.as_str());
        builder.push(match filter.op {
            FilterOp::Eq => " = ",
            FilterOp::NotEq => " <> ",
        });
        builder.push_bind(Json(&filter.value));
    }

    if let Some(field) = query.order_by_desc.as_deref() {
        builder.push(" AND data -> ");
        builder.push_bind(field);
        builder.push(" IS NOT NULL ORDER BY data -> ");
        builder.push_bind(field);
        builder.push(" DESC");
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit_param(limit));
    }

    builder
}

/// Postgres LIMIT is a signed bigint; larger limits saturate instead of wrapping negative.
fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Document::from))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let mut builder = build_select(collection, query);
        debug!("Document query on '{collection}': {}", builder.sql());

        let rows: Vec<DocumentRow> = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
