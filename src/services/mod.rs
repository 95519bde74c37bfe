// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external collaborators and account operations.

pub mod auth;
pub mod identity;
pub mod storage;

pub use auth::AuthService;
pub use identity::{IdentityProvider, InMemoryIdentityProvider, ProfileChange};
pub use storage::{BlobStore, FirebaseStorage, InMemoryBlobStore};
