// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use social_feed::db::{DocumentClient, FirestoreDb, InMemoryDocumentStore};
use social_feed::models::{Post, User};
use social_feed::repositories::{CommentsRepository, PostsRepository};
use social_feed::services::{InMemoryBlobStore, InMemoryIdentityProvider};
use social_feed::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// In-memory collaborators shared by one test.
#[allow(dead_code)]
pub struct Backend {
    pub store: Arc<InMemoryDocumentStore>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub identity: Arc<InMemoryIdentityProvider>,
}

#[allow(dead_code)]
impl Backend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
            identity: Arc::new(InMemoryIdentityProvider::new()),
        }
    }

    pub fn documents(&self) -> DocumentClient {
        DocumentClient::new(self.store.clone())
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.documents(), self.blobs.clone(), self.identity.clone())
    }

    pub fn posts_for(&self, user: &User) -> PostsRepository {
        PostsRepository::new(user.clone(), self.documents(), self.blobs.clone())
    }

    pub fn comments_for(&self, user: &User, post: &Post) -> CommentsRepository {
        CommentsRepository::new(user.clone(), post.clone(), self.documents())
    }
}

#[allow(dead_code)]
pub fn alice() -> User {
    User::new("alice-uid", "Alice")
}

#[allow(dead_code)]
pub fn bob() -> User {
    User::new("bob-uid", "Bob")
}

/// Fixed timestamp `seconds` after a base instant.
#[allow(dead_code)]
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// A post by `author` with a fixed timestamp.
#[allow(dead_code)]
pub fn post_at(title: &str, author: &User, seconds: i64) -> Post {
    let mut post = Post::new(title, format!("{} body", title), author.clone());
    post.timestamp = at(seconds);
    post
}
