use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use serde_json::Value;

use tokio::sync::RwLock;

use uuid::Uuid;

use super::query::{Direction, Filter, Sort, Window};
use super::store::{DocumentStore, StoreError, StoreResult};

/// In-process document store.
/// Collections keep documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(Uuid, Value)>>>,
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: &str,
        unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        check_unique(collection, documents, unique, id, &document)?;
        documents.push((id, document));
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        let document = collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, document)| document.clone());
        Ok(document)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
        window: Option<Window>,
    ) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut found: Vec<&Value> = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(_, document)| document)
                    .filter(|document| filter.matches(document))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            found.sort_by(|a, b| compare(a, b, sort));
        }

        let found = found.into_iter().cloned();
        let found = match window {
            Some(Window { skip, limit }) => found
                .skip(skip as usize)
                .take(limit as usize)
                .collect(),
            None => found.collect(),
        };
        Ok(found)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|(_, document)| filter.matches(document))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn replace(
        &self,
        collection: &str,
        unique: &[&str],
        id: Uuid,
        document: Value,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };

        check_unique(collection, documents, unique, id, &document)?;
        match documents.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, stored)) => {
                *stored = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: Uuid) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = documents.len();
        documents.retain(|(doc_id, _)| *doc_id != id);
        Ok(documents.len() != before)
    }
}

/// Reject `document` if another document of the collection shares a unique field value
fn check_unique(
    collection: &str,
    documents: &[(Uuid, Value)],
    unique: &[&str],
    id: Uuid,
    document: &Value,
) -> StoreResult<()> {
    for field in unique {
        let value = match document.get(*field) {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };
        let taken = documents
            .iter()
            .any(|(other_id, other)| *other_id != id && other.get(*field) == Some(value));
        if taken {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// Order two documents by a timestamp/date field, missing values last in both directions
fn compare(a: &Value, b: &Value, sort: Sort) -> Ordering {
    let a = sort_key(a, sort.field);
    let b = sort_key(b, sort.field);
    match (a, b) {
        (Some(a), Some(b)) => match sort.direction {
            Direction::Ascending => a.cmp(&b),
            Direction::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_key(document: &Value, field: &str) -> Option<DateTime<Utc>> {
    let raw = document.get(field)?.as_str()?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
