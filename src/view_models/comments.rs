//! Comments controller for one post.

use crate::error::AppError;
use crate::models::{Comment, Post};
use crate::repositories::CommentsRepository;
use crate::state::{AsyncAction, Loadable};
use crate::view_models::{CommentRowViewModel, FormAction, FormViewModel, PublishedList};
use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use validator::Validate;

pub struct CommentsViewModel {
    thread: CommentThread,
}

impl CommentsViewModel {
    pub fn new(repository: CommentsRepository) -> Self {
        Self {
            thread: CommentThread {
                repository: Arc::new(repository),
                comments: PublishedList::new(),
            },
        }
    }

    pub fn post(&self) -> &Post {
        self.thread.repository.post()
    }

    pub fn comments(&self) -> Loadable<Vec<Comment>> {
        self.thread.comments.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Loadable<Vec<Comment>>> {
        self.thread.comments.subscribe()
    }

    pub fn fetch_comments(&self) -> JoinHandle<()> {
        self.thread.comments.begin_fetch();
        let thread = self.thread.clone();
        tokio::spawn(async move {
            let result = thread.repository.fetch_comments().await;
            if let Err(e) = &result {
                tracing::error!(
                    post_id = %thread.repository.post().id,
                    error = %e,
                    "Cannot fetch comments"
                );
            }
            thread.comments.finish_fetch(result);
        })
    }

    pub fn make_comment_row_view_model(&self, comment: Comment) -> CommentRowViewModel {
        let delete_action: Option<AsyncAction> =
            self.thread.repository.can_delete(&comment).then(|| {
                let thread = self.thread.clone();
                let comment = comment.clone();
                Arc::new(move || {
                    let thread = thread.clone();
                    let comment = comment.clone();
                    async move { thread.delete(&comment).await }.boxed()
                }) as AsyncAction
            });

        CommentRowViewModel::new(comment, delete_action)
    }

    /// Form for a new comment by the acting user.
    pub fn make_new_comment_view_model(&self) -> FormViewModel<Comment> {
        let author = self.thread.repository.user().clone();
        let thread = self.thread.clone();
        let action: FormAction<Comment> = Arc::new(move |comment| {
            let thread = thread.clone();
            async move { thread.create(comment).await }.boxed()
        });
        FormViewModel::new(Comment::new("", author), action)
    }
}

impl Drop for CommentsViewModel {
    fn drop(&mut self) {
        self.thread.comments.cancel();
    }
}

#[derive(Clone)]
struct CommentThread {
    repository: Arc<CommentsRepository>,
    comments: PublishedList<Comment>,
}

impl CommentThread {
    async fn create(&self, comment: Comment) -> Result<(), AppError> {
        comment.validate()?;
        self.repository.create(&comment).await?;
        self.comments.mutate(|comments| comments.insert(0, comment));
        Ok(())
    }

    async fn delete(&self, comment: &Comment) -> Result<(), AppError> {
        self.repository.delete(comment).await?;
        self.comments
            .mutate(|comments| comments.retain(|c| c.id != comment.id));
        Ok(())
    }
}
