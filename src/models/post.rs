// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Post model for storage and display.

use crate::models::User;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use url::Url;
use uuid::Uuid;
use validator::Validate;

/// A post in the feed.
///
/// Stored at `posts_v3/{id}`. `is_favorite` is computed per reader by joining
/// against favorites and is never written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Post {
    /// Post id (also used as document ID)
    pub id: Uuid,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    pub author: User,
    /// Local `file://` reference before upload, remote download URL after
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Url>,
    /// Creation time, persisted as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub is_favorite: bool,
}

impl Post {
    /// New post authored now by `author`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            author,
            image_url: None,
            timestamp: Utc::now().trunc_subsecs(3),
            is_favorite: false,
        }
    }

    /// Whether the image still points at a file on this device.
    pub fn has_local_image(&self) -> bool {
        self.image_url
            .as_ref()
            .is_some_and(|url| url.scheme() == "file")
    }

    /// Case-insensitive search across title, content and author name.
    pub fn contains(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.title, &self.content, &self.author.name]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post::new(
            "Lorem Ipsum",
            "Dolor sit amet",
            User::new("u1", "Jamie Appleseed"),
        )
    }

    #[test]
    fn test_is_favorite_never_serialized() {
        let mut post = sample();
        post.is_favorite = true;

        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("is_favorite").is_none());
        assert!(value.get("isFavorite").is_none());

        let decoded: Post = serde_json::from_value(value).unwrap();
        assert!(!decoded.is_favorite);
    }

    #[test]
    fn test_timestamp_stored_as_millis() {
        let post = sample();
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(
            value["timestamp"].as_i64(),
            Some(post.timestamp.timestamp_millis())
        );
        assert_eq!(value["author"]["id"], "u1");
        assert_eq!(value["id"], post.id.to_string());
    }

    #[test]
    fn test_equality_is_by_id() {
        let post = sample();
        let mut edited = post.clone();
        edited.title = "Changed".to_string();
        edited.is_favorite = true;
        assert_eq!(post, edited);
        assert_ne!(post, sample());
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let post = sample();
        assert!(post.contains("lorem"));
        assert!(post.contains("SIT"));
        assert!(post.contains("appleseed"));
        assert!(!post.contains("nothing"));
    }

    #[test]
    fn test_has_local_image() {
        let mut post = sample();
        assert!(!post.has_local_image());

        post.image_url = Some(Url::parse("file:///tmp/picked.jpg").unwrap());
        assert!(post.has_local_image());

        post.image_url = Some(Url::parse("https://cdn.example.com/p.jpg").unwrap());
        assert!(!post.has_local_image());
    }

    #[test]
    fn test_validation_rejects_empty_title() {
        let post = Post::new("", "body", User::new("u1", "Name"));
        assert!(post.validate().is_err());
        assert!(sample().validate().is_ok());
    }
}
