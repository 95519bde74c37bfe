//! Comments repository, scoped to a single post.

use crate::db::{collections, CollectionRef, DocumentClient, Query};
use crate::error::Result;
use crate::models::{Comment, Post, User};

/// Comment operations on one post on behalf of one user.
#[derive(Clone)]
pub struct CommentsRepository {
    user: User,
    post: Post,
    documents: DocumentClient,
    comments: CollectionRef,
}

impl CommentsRepository {
    pub fn new(user: User, post: Post, documents: DocumentClient) -> Self {
        let comments =
            CollectionRef::nested(collections::POSTS, post.id.to_string(), collections::COMMENTS);
        Self {
            user,
            post,
            documents,
            comments,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    /// All comments on the post, newest first.
    pub async fn fetch_comments(&self) -> Result<Vec<Comment>> {
        self.documents
            .query(&self.comments, &Query::all().order_by_desc("timestamp"))
            .await
    }

    pub async fn create(&self, comment: &Comment) -> Result<()> {
        self.documents
            .set(&self.comments, &comment.id.to_string(), comment)
            .await?;
        tracing::info!(post_id = %self.post.id, comment_id = %comment.id, "Comment created");
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the acting user may not delete `comment`.
    pub async fn delete(&self, comment: &Comment) -> Result<()> {
        assert!(
            self.can_delete(comment),
            "user {} is not allowed to delete comment {}",
            self.user.id,
            comment.id
        );

        self.documents
            .delete(&self.comments, &comment.id.to_string())
            .await?;
        tracing::info!(post_id = %self.post.id, comment_id = %comment.id, "Comment deleted");
        Ok(())
    }

    /// The comment's author and the post's author may delete a comment.
    pub fn can_delete(&self, comment: &Comment) -> bool {
        [&comment.author.id, &self.post.author.id].contains(&&self.user.id)
    }
}
