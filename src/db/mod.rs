//! Document store layer.
//!
//! Repositories talk to an injected [`DocumentStore`] through the typed
//! [`DocumentClient`] wrapper. Two backends exist: Firestore and an
//! in-memory store used by tests and demos.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::InMemoryDocumentStore;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const POSTS: &str = "posts_v3";
    /// Sub-collection under each post document
    pub const COMMENTS: &str = "comments";
    pub const FAVORITES: &str = "favorites_v1";
}

/// Raw document body as exchanged with a store.
pub type Record = serde_json::Value;

/// Document that owns a sub-collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParentDoc {
    pub collection: String,
    pub id: String,
}

/// Location of a collection, either top level or under a parent document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub parent: Option<ParentDoc>,
    pub name: String,
}

impl CollectionRef {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            name: name.into(),
        }
    }

    pub fn nested(
        parent_collection: impl Into<String>,
        parent_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            parent: Some(ParentDoc {
                collection: parent_collection.into(),
                id: parent_id.into(),
            }),
            name: name.into(),
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}/{}/{}", parent.collection, parent.id, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Single-field filter. Field names may be dotted paths (`author.id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    Equal(String, String),
    In(String, Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// Collection query: optional filter plus optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Every document in the collection, store order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some(FieldFilter::Equal(field.into(), value.into()));
        self
    }

    pub fn where_in<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(FieldFilter::In(
            field.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            descending: true,
        });
        self
    }
}

/// Remote collection store contract.
///
/// Implementations are shared, externally synchronized services; callers do
/// no locking of their own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` matching `query`.
    async fn get(&self, collection: &CollectionRef, query: &Query) -> Result<Vec<Record>>;

    /// Create or overwrite the document `id`.
    async fn set(&self, collection: &CollectionRef, id: &str, record: Record) -> Result<()>;

    /// Remove the document `id`. Removing a missing document succeeds.
    async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<()>;
}

/// Typed operations over an injected document store.
#[derive(Clone)]
pub struct DocumentClient {
    store: Arc<dyn DocumentStore>,
}

impl DocumentClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Run a query and decode every document as `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &CollectionRef,
        query: &Query,
    ) -> Result<Vec<T>> {
        let records = self.store.get(collection, query).await?;
        records
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| {
                    AppError::Store(format!("Failed to decode document in {}: {}", collection, e))
                })
            })
            .collect()
    }

    /// Encode `value` and write it as document `id`.
    pub async fn set<T: Serialize>(
        &self,
        collection: &CollectionRef,
        id: &str,
        value: &T,
    ) -> Result<()> {
        let record = serde_json::to_value(value).map_err(|e| {
            AppError::Encoding(format!("Failed to encode document {}/{}: {}", collection, id, e))
        })?;
        self.store.set(collection, id, record).await
    }

    pub async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<()> {
        self.store.delete(collection, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_ref_display() {
        assert_eq!(CollectionRef::root("posts_v3").to_string(), "posts_v3");
        assert_eq!(
            CollectionRef::nested("posts_v3", "abc", "comments").to_string(),
            "posts_v3/abc/comments"
        );
    }

    #[test]
    fn test_query_builder() {
        let query = Query::all()
            .where_in("id", ["a", "b"])
            .order_by_desc("timestamp");
        assert_eq!(
            query.filter,
            Some(FieldFilter::In(
                "id".to_string(),
                vec!["a".to_string(), "b".to_string()]
            ))
        );
        assert_eq!(
            query.order_by,
            Some(OrderBy {
                field: "timestamp".to_string(),
                descending: true
            })
        );
    }
}
