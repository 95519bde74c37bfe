// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Posts repository.
//!
//! Provides:
//! - Create and delete posts (with image upload/cleanup)
//! - Fetch posts (all, by author, favorites) joined with the reader's favorites
//! - Favorite and unfavorite posts

use crate::db::{collections, CollectionRef, DocumentClient, Query};
use crate::error::{AppError, Result};
use crate::models::{Favorite, Post, User};
use crate::services::BlobStore;
use futures_util::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Blob namespace for post images.
const POST_IMAGE_NAMESPACE: &str = "posts";
/// Firestore accepts at most 30 values in an `in` filter.
const MAX_IN_FILTER_VALUES: usize = 30;

/// Which posts a feed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Favorites,
    Author(User),
}

impl PostFilter {
    /// Screen title for the feed.
    pub fn title(&self) -> String {
        match self {
            PostFilter::All => "Posts".to_string(),
            PostFilter::Favorites => "Favorites".to_string(),
            PostFilter::Author(user) => format!("{}'s Posts", user.name),
        }
    }
}

/// Post operations on behalf of one user.
#[derive(Clone)]
pub struct PostsRepository {
    user: User,
    documents: DocumentClient,
    blobs: Arc<dyn BlobStore>,
    posts: CollectionRef,
    favorites: CollectionRef,
}

impl PostsRepository {
    pub fn new(user: User, documents: DocumentClient, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            user,
            documents,
            blobs,
            posts: CollectionRef::root(collections::POSTS),
            favorites: CollectionRef::root(collections::FAVORITES),
        }
    }

    /// The acting user.
    pub fn user(&self) -> &User {
        &self.user
    }

    // ─── Create and Delete ───────────────────────────────────────

    /// Store a new post and return it as persisted.
    ///
    /// A local `file://` image is uploaded first and replaced by its remote
    /// URL; the local file is then removed on a best-effort basis.
    pub async fn create(&self, post: Post) -> Result<Post> {
        let mut post = post;

        if post.has_local_image() {
            if let Some(local) = post.image_url.take() {
                let path = local.to_file_path().map_err(|_| {
                    AppError::Blob(format!("Invalid local image reference: {}", local))
                })?;

                let remote = self
                    .blobs
                    .upload(POST_IMAGE_NAMESPACE, &post.id.to_string(), &path)
                    .await?;
                post.image_url = Some(remote);

                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to delete temporary image file"
                    );
                }
            }
        }

        self.documents
            .set(&self.posts, &post.id.to_string(), &post)
            .await?;

        tracing::info!(post_id = %post.id, author = %post.author.id, "Post created");
        Ok(post)
    }

    /// Delete a post and its stored image.
    ///
    /// # Panics
    ///
    /// Panics if the acting user may not delete `post`; callers must check
    /// [`can_delete`](Self::can_delete) first.
    pub async fn delete(&self, post: &Post) -> Result<()> {
        assert!(
            self.can_delete(post),
            "user {} is not allowed to delete post {}",
            self.user.id,
            post.id
        );

        self.documents
            .delete(&self.posts, &post.id.to_string())
            .await?;

        if let Some(image_url) = &post.image_url {
            self.blobs.delete(image_url).await?;
        }

        tracing::info!(post_id = %post.id, "Post deleted");
        Ok(())
    }

    /// Only the author may delete a post.
    pub fn can_delete(&self, post: &Post) -> bool {
        post.author.id == self.user.id
    }

    // ─── Fetch Posts ─────────────────────────────────────────────

    pub async fn fetch(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        match filter {
            PostFilter::All => self.fetch_all().await,
            PostFilter::Favorites => self.fetch_favorites().await,
            PostFilter::Author(author) => self.fetch_by_author(author).await,
        }
    }

    /// Every post, newest first.
    pub async fn fetch_all(&self) -> Result<Vec<Post>> {
        self.fetch_joined(Query::all()).await
    }

    /// Posts written by `author`, newest first.
    pub async fn fetch_by_author(&self, author: &User) -> Result<Vec<Post>> {
        self.fetch_joined(Query::all().where_eq("author.id", author.id.as_str()))
            .await
    }

    /// Posts the acting user has favorited, newest first.
    ///
    /// Returns without querying posts when there are no favorites.
    pub async fn fetch_favorites(&self) -> Result<Vec<Post>> {
        let favorite_ids = self.fetch_favorite_post_ids().await?;
        if favorite_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = favorite_ids.iter().map(Uuid::to_string).collect();
        let pages = try_join_all(ids.chunks(MAX_IN_FILTER_VALUES).map(|chunk| {
            let query = Query::all()
                .where_in("id", chunk.iter().cloned())
                .order_by_desc("timestamp");
            async move { self.documents.query::<Post>(&self.posts, &query).await }
        }))
        .await?;

        let mut posts: Vec<Post> = pages.into_iter().flatten().collect();
        if posts.len() > 1 {
            // Pages are each ordered; merge them.
            posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        for post in &mut posts {
            post.is_favorite = true;
        }
        Ok(posts)
    }

    /// Query posts and the reader's favorites concurrently, then join.
    async fn fetch_joined(&self, query: Query) -> Result<Vec<Post>> {
        let query = query.order_by_desc("timestamp");
        let (posts, favorite_ids) = tokio::try_join!(
            self.documents.query::<Post>(&self.posts, &query),
            self.fetch_favorite_post_ids(),
        )?;

        tracing::debug!(
            posts = posts.len(),
            favorites = favorite_ids.len(),
            "Joined posts with favorites"
        );
        Ok(mark_favorites(posts, &favorite_ids))
    }

    // ─── Favorites ───────────────────────────────────────────────

    /// Ids of every post the acting user has favorited.
    pub async fn fetch_favorite_post_ids(&self) -> Result<HashSet<Uuid>> {
        let favorites: Vec<Favorite> = self
            .documents
            .query(
                &self.favorites,
                &Query::all().where_eq("userID", self.user.id.as_str()),
            )
            .await?;
        Ok(favorites.into_iter().map(|f| f.post_id).collect())
    }

    /// Write the favorite row. Repeating it overwrites the same row.
    pub async fn favorite(&self, post: &Post) -> Result<()> {
        let favorite = Favorite::new(self.user.id.clone(), post.id);
        self.documents
            .set(&self.favorites, &favorite.key(), &favorite)
            .await
    }

    /// Remove the favorite row. Succeeds when there is none.
    pub async fn unfavorite(&self, post: &Post) -> Result<()> {
        let favorite = Favorite::new(self.user.id.clone(), post.id);
        self.documents
            .delete(&self.favorites, &favorite.key())
            .await
    }

    pub async fn toggle_favorite(&self, favorite: bool, post: &Post) -> Result<()> {
        if favorite {
            self.favorite(post).await
        } else {
            self.unfavorite(post).await
        }
    }
}

/// Set `is_favorite` on each post from the favorite id set.
pub fn mark_favorites(posts: Vec<Post>, favorite_ids: &HashSet<Uuid>) -> Vec<Post> {
    posts
        .into_iter()
        .map(|mut post| {
            post.is_favorite = favorite_ids.contains(&post.id);
            post
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_titles() {
        assert_eq!(PostFilter::All.title(), "Posts");
        assert_eq!(PostFilter::Favorites.title(), "Favorites");
        assert_eq!(
            PostFilter::Author(User::new("u1", "Ada")).title(),
            "Ada's Posts"
        );
    }

    #[test]
    fn test_mark_favorites_overrides_stale_flags() {
        let author = User::new("u1", "Ada");
        let mut stale = Post::new("a", "a", author.clone());
        stale.is_favorite = true;
        let fresh = Post::new("b", "b", author);
        let ids: HashSet<Uuid> = [fresh.id].into_iter().collect();

        let marked = mark_favorites(vec![stale, fresh], &ids);
        assert_eq!(
            marked.iter().map(|p| p.is_favorite).collect::<Vec<_>>(),
            vec![false, true]
        );
    }
}
