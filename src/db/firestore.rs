// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Maps the generic [`DocumentStore`] contract onto the `firestore` fluent
//! API:
//! - `get` → select with optional single-field filter and ordering
//! - `set` → full document update (create or overwrite)
//! - `delete` → document delete (missing documents are not an error)

use crate::db::{CollectionRef, DocumentStore, FieldFilter, Query, Record};
use crate::error::AppError;
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Store(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Store("Database not connected (offline mode)".to_string()))
    }

    /// Full parent document path for sub-collections.
    fn parent_path(&self, collection: &CollectionRef) -> Result<Option<String>, AppError> {
        let Some(parent) = &collection.parent else {
            return Ok(None);
        };
        let path = self
            .get_client()?
            .parent_path(&parent.collection, &parent.id)
            .map_err(|e| AppError::Store(format!("Invalid parent path {}: {}", collection, e)))?;
        Ok(Some(path.into()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    async fn get(&self, collection: &CollectionRef, query: &Query) -> Result<Vec<Record>, AppError> {
        let parent = self.parent_path(collection)?;

        let mut select = self
            .get_client()?
            .fluent()
            .select()
            .from(collection.name.as_str());

        if let Some(parent) = &parent {
            select = select.parent(parent);
        }

        select = match query.filter.clone() {
            Some(FieldFilter::Equal(field, value)) => {
                select.filter(move |q| q.field(field.as_str()).eq(value.clone()))
            }
            Some(FieldFilter::In(field, values)) => {
                select.filter(move |q| q.field(field.as_str()).is_in(values.clone()))
            }
            None => select,
        };

        if let Some(order) = &query.order_by {
            let direction = if order.descending {
                firestore::FirestoreQueryDirection::Descending
            } else {
                firestore::FirestoreQueryDirection::Ascending
            };
            select = select.order_by([(order.field.as_str(), direction)]);
        }

        let records: Vec<Record> = select
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        tracing::debug!(collection = %collection, count = records.len(), "Firestore query");
        Ok(records)
    }

    async fn set(&self, collection: &CollectionRef, id: &str, record: Record) -> Result<(), AppError> {
        let parent = self.parent_path(collection)?;

        let mut update = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection.name.as_str())
            .document_id(id);

        if let Some(parent) = &parent {
            update = update.parent(parent);
        }

        let _: () = update
            .object(&record)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<(), AppError> {
        let parent = self.parent_path(collection)?;

        let mut delete = self
            .get_client()?
            .fluent()
            .delete()
            .from(collection.name.as_str())
            .document_id(id);

        if let Some(parent) = &parent {
            delete = delete.parent(parent);
        }

        delete
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}
