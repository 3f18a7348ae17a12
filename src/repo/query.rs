use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;
/// Largest offset a SQL backend accepts
const MAX_SKIP: u64 = i64::MAX as u64;

/// Document filter expressed as JSON containment.
///
/// A document matches when every key of the filter is present in the document
/// with a containing value: scalars must be equal, arrays in the filter must have
/// each element contained in the document's array. This is the semantics of the
/// PostgreSQL `jsonb @>` operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Filter matching every document of a collection
    pub fn new() -> Self {
        Self::default()
    }
    /// Require `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }
    /// Require `field` to equal `value` when a value is given
    pub fn eq_opt(self, field: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }
    /// Require the array `field` to contain `value`
    pub fn has(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0
            .insert(field.to_string(), Value::Array(vec![value.into()]));
        self
    }
    /// Whether a document satisfies this filter
    pub fn matches(&self, document: &Value) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| match document.get(key) {
                Some(actual) => contains(actual, expected),
                None => false,
            })
    }
    /// The filter as a JSON object
    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// JSON containment, mirroring `jsonb @>`
fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            expected.iter().all(|(key, expected)| match actual.get(key) {
                Some(actual) => contains(actual, expected),
                None => false,
            })
        }
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|expected| actual.iter().any(|actual| contains(actual, expected))),
        (actual, expected) => actual == expected,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering on a single timestamp or date field. Documents missing the field sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: Direction,
}

impl Sort {
    pub fn newest_first(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }

    pub fn oldest_first(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }
}

/// Skip/limit window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// `page`/`limit` query parameters, clamped to sane values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Window {
        Window {
            skip: (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP),
            limit: self.limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of a listing together with the size of the whole listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

impl PageInfo {
    pub fn new(total: u64, pagination: Pagination) -> Self {
        let limit = pagination.limit();
        Self {
            total,
            page: pagination.page(),
            limit,
            pages: (total + limit - 1) / limit,
        }
    }
}
