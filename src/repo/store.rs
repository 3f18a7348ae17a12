use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use sqlx::PgPool;

use uuid::Uuid;

use super::memory::MemoryStore;
use super::postgres::PgDocumentStore;
use super::query::{Filter, Page, PageInfo, Pagination, Sort, Window};

/// Errors raised by document store backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique field {field} already holds this value in {collection}")]
    Conflict { collection: String, field: String },
    #[error("Stored document could not be (de)serialized")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A record kept in its own collection of the document store
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection name
    const COLLECTION: &'static str;
    /// Top-level fields whose values must be unique within the collection
    const UNIQUE: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;
}

/// Backend trait for schemaless JSON collections.
/// NOTE: Kept object-safe so the backend can be swapped behind `Store`, the typed
/// layer lives in `Store` itself.
#[async_trait::async_trait]
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// Insert a new document
    async fn insert(
        &self,
        collection: &str,
        unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<()>;

    /// Fetch a document by ID
    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>>;

    /// Fetch the documents matching `filter`, optionally ordered and windowed.
    /// Without a sort, documents come back in insertion order.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
        window: Option<Window>,
    ) -> StoreResult<Vec<Value>>;

    /// Count the documents matching `filter`
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Replace the document stored under `id`. Returns `false` when there was none.
    async fn replace(
        &self,
        collection: &str,
        unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<bool>;

    /// Delete the document stored under `id`. Returns `false` when there was none.
    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool>;
}

/// Typed handle on the document store, shared by every request handler
#[derive(Debug, Clone)]
pub struct Store(Arc<dyn DocumentStore>);

impl Store {
    pub fn new(backend: impl DocumentStore + 'static) -> Self {
        Self(Arc::new(backend))
    }
    /// Store backed by the `documents` table of a PostgreSQL database
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(PgDocumentStore::new(pool))
    }
    /// Store kept in process memory, lost on shutdown
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    #[tracing::instrument(name = "Insert document", skip(self, document), fields(collection = D::COLLECTION, id = %document.id()))]
    pub async fn insert<D: Document>(&self, document: &D) -> StoreResult<()> {
        let value = serde_json::to_value(document)?;
        self.0
            .insert(D::COLLECTION, D::UNIQUE, document.id(), value)
            .await
    }

    #[tracing::instrument(name = "Fetch document by id", skip(self), fields(collection = D::COLLECTION))]
    pub async fn get<D: Document>(&self, id: Uuid) -> StoreResult<Option<D>> {
        self.0
            .get(D::COLLECTION, id)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    #[tracing::instrument(name = "Fetch one document", skip(self), fields(collection = D::COLLECTION))]
    pub async fn find_one<D: Document>(&self, filter: &Filter) -> StoreResult<Option<D>> {
        let window = Window { skip: 0, limit: 1 };
        let mut found = self
            .0
            .find(D::COLLECTION, filter, None, Some(window))
            .await?;
        found
            .pop()
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    #[tracing::instrument(name = "Fetch all matching documents", skip(self), fields(collection = D::COLLECTION))]
    pub async fn find_all<D: Document>(&self, filter: &Filter, sort: Sort) -> StoreResult<Vec<D>> {
        let found = self.0.find(D::COLLECTION, filter, Some(sort), None).await?;
        decode_all(found)
    }

    #[tracing::instrument(name = "List documents", skip(self), fields(collection = D::COLLECTION))]
    pub async fn list<D: Document>(
        &self,
        filter: &Filter,
        sort: Sort,
        pagination: Pagination,
    ) -> StoreResult<Page<D>> {
        let total = self.0.count(D::COLLECTION, filter).await?;
        let found = self
            .0
            .find(D::COLLECTION, filter, Some(sort), Some(pagination.window()))
            .await?;

        Ok(Page {
            items: decode_all(found)?,
            info: PageInfo::new(total, pagination),
        })
    }

    #[tracing::instrument(name = "Count documents", skip(self), fields(collection = D::COLLECTION))]
    pub async fn count<D: Document>(&self, filter: &Filter) -> StoreResult<u64> {
        self.0.count(D::COLLECTION, filter).await
    }

    #[tracing::instrument(name = "Replace document", skip(self, document), fields(collection = D::COLLECTION, id = %document.id()))]
    pub async fn replace<D: Document>(&self, document: &D) -> StoreResult<bool> {
        let value = serde_json::to_value(document)?;
        self.0
            .replace(D::COLLECTION, D::UNIQUE, document.id(), value)
            .await
    }

    #[tracing::instrument(name = "Delete document", skip(self), fields(collection = D::COLLECTION))]
    pub async fn delete<D: Document>(&self, id: Uuid) -> StoreResult<bool> {
        self.0.delete(D::COLLECTION, id).await
    }
}

fn decode_all<D: Document>(values: Vec<Value>) -> StoreResult<Vec<D>> {
    values
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<D>, _>>()
        .map_err(StoreError::from)
}
