// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Social-feed: data sync layer for a small social app
//!
//! This crate provides the repositories behind a feed of posts with
//! comments and per-user favorites, plus the screen controllers that
//! publish their state.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod view_models;

use db::DocumentClient;
use services::{BlobStore, IdentityProvider};
use std::sync::Arc;

/// Shared collaborators injected into repositories and controllers.
#[derive(Clone)]
pub struct AppState {
    pub documents: DocumentClient,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        documents: DocumentClient,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            documents,
            blobs,
            identity,
        }
    }
}
