// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Favorite join record between a user and a post.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted favorite marker.
///
/// Stored at `favorites_v1/{postID}-{userID}`, so each (user, post) pair has
/// at most one row. Never embeds post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// User who marked the post
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Post being marked
    #[serde(rename = "postID")]
    pub post_id: Uuid,
}

impl Favorite {
    pub fn new(user_id: impl Into<String>, post_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            post_id,
        }
    }

    /// Document id: `{post_id}-{user_id}`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.post_id, self.user_id)
    }
}
