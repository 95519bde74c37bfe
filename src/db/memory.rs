//! In-memory document store.
//!
//! Evaluates filters and ordering locally. Used by tests and demos in place
//! of Firestore; can count queries and inject failures per collection.

use crate::db::{CollectionRef, DocumentStore, FieldFilter, Query, Record};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    /// Collection path -> (document id -> record)
    collections: DashMap<String, BTreeMap<String, Record>>,
    /// Number of `get` calls per collection path
    query_counts: DashMap<String, usize>,
    /// Collection paths whose operations fail
    failing: DashSet<String>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a single document, bypassing query accounting.
    pub fn document(&self, collection: &CollectionRef, id: &str) -> Option<Record> {
        self.collections
            .get(&collection.to_string())
            .and_then(|docs| docs.get(id).cloned())
    }

    /// Number of documents currently in `collection`.
    pub fn len(&self, collection: &CollectionRef) -> usize {
        self.collections
            .get(&collection.to_string())
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &CollectionRef) -> bool {
        self.len(collection) == 0
    }

    /// How many queries have been issued against `collection`.
    pub fn queries_issued(&self, collection: &CollectionRef) -> usize {
        self.query_counts
            .get(&collection.to_string())
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// Make every subsequent operation on `collection` fail with a store error.
    pub fn fail_collection(&self, collection: &CollectionRef) {
        self.failing.insert(collection.to_string());
    }

    pub fn restore_collection(&self, collection: &CollectionRef) {
        self.failing.remove(&collection.to_string());
    }

    fn check_available(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            return Err(AppError::Store(format!("Collection {} unavailable", path)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &CollectionRef, query: &Query) -> Result<Vec<Record>> {
        let path = collection.to_string();
        *self.query_counts.entry(path.clone()).or_insert(0) += 1;
        self.check_available(&path)?;

        let mut records: Vec<Record> = self
            .collections
            .get(&path)
            .map(|docs| {
                docs.values()
                    .filter(|record| matches_filter(record, query.filter.as_ref()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            records.sort_by(|a, b| {
                let ordering = compare_values(field(a, &order.field), field(b, &order.field));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        tracing::debug!(collection = %path, count = records.len(), "In-memory query");
        Ok(records)
    }

    async fn set(&self, collection: &CollectionRef, id: &str, record: Record) -> Result<()> {
        let path = collection.to_string();
        self.check_available(&path)?;
        self.collections
            .entry(path)
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<()> {
        let path = collection.to_string();
        self.check_available(&path)?;
        if let Some(mut docs) = self.collections.get_mut(&path) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Resolve a dotted field path inside a record.
fn field<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |value, segment| value.get(segment))
}

fn matches_filter(record: &Record, filter: Option<&FieldFilter>) -> bool {
    match filter {
        None => true,
        Some(FieldFilter::Equal(path, expected)) => {
            field(record, path).and_then(Value::as_str) == Some(expected.as_str())
        }
        Some(FieldFilter::In(path, candidates)) => field(record, path)
            .and_then(Value::as_str)
            .is_some_and(|value| candidates.iter().any(|c| c == value)),
    }
}

/// Missing values sort first; numbers numerically; strings lexicographically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
