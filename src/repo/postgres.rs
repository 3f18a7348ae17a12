use serde_json::Value;

use sqlx::{PgPool, Postgres, QueryBuilder};

use uuid::Uuid;

use super::query::{Direction, Filter, Sort, Window};
use super::store::{DocumentStore, StoreError, StoreResult};

/// Document store kept in the `documents` table.
/// Unique fields are enforced by partial indexes created in the migrations.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        _unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<()> {
        sqlx::query("insert into documents(collection, id, body) values ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_database(collection, e))?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>> {
        let body = sqlx::query_scalar::<_, Value>(
            "select body from documents where collection=$1 and id=$2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
        window: Option<Window>,
    ) -> StoreResult<Vec<Value>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("select body from documents where collection=");
        query.push_bind(collection);
        query.push(" and body @> ");
        query.push_bind(filter.as_value());

        query.push(" order by ");
        if let Some(sort) = sort {
            query.push("(body->>");
            query.push_bind(sort.field);
            query.push(")::timestamptz ");
            query.push(match sort.direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            });
            query.push(" nulls last, ");
        }
        query.push("created_at asc");

        if let Some(Window { skip, limit }) = window {
            query.push(" limit ");
            query.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
            query.push(" offset ");
            query.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
        }

        let bodies = query
            .build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await?;
        Ok(bodies)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "select count(*) from documents where collection=$1 and body @> $2",
        )
        .bind(collection)
        .bind(filter.as_value())
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn replace(
        &self,
        collection: &str,
        _unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<bool> {
        let result = sqlx::query("update documents set body=$3 where collection=$1 and id=$2")
            .bind(collection)
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_database(collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("delete from documents where collection=$1 and id=$2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Map unique index violations to `StoreError::Conflict`
fn conflict_or_database(collection: &str, error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StoreError::Conflict {
                collection: collection.to_string(),
                field: db_error.constraint().unwrap_or("unknown").to_string(),
            }
        }
        _ => StoreError::Database(error),
    }
}
