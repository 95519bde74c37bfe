//! Comment model stored under a post.

use crate::models::User;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Comment record stored at `posts_v3/{post_id}/comments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Comment {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub content: String,
    pub author: User,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(content: impl Into<String>, author: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            author,
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }
}
