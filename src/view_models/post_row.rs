//! Controller for a single post row.

use crate::error::AppError;
use crate::models::Post;
use crate::state::{AsyncAction, StateManager, TaskState};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Post row with delete/favorite actions supplied by the feed controller.
///
/// Rows show no progress indicator, so the busy flag is untracked.
pub struct PostRowViewModel {
    post: Post,
    state: Arc<TaskState>,
    delete_action: Option<AsyncAction>,
    favorite_action: AsyncAction,
}

impl PostRowViewModel {
    pub fn new(post: Post, delete_action: Option<AsyncAction>, favorite_action: AsyncAction) -> Self {
        Self {
            post,
            state: Arc::new(TaskState::untracked()),
            delete_action,
            favorite_action,
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    /// Whether the delete affordance should be shown.
    pub fn can_delete_post(&self) -> bool {
        self.delete_action.is_some()
    }

    /// # Panics
    ///
    /// Panics when no delete action was provided; gate on
    /// [`can_delete_post`](Self::can_delete_post).
    pub fn delete_post(&self) -> JoinHandle<()> {
        let Some(delete_action) = &self.delete_action else {
            panic!("cannot delete post {}: no delete action provided", self.post.id);
        };
        self.run_managed(delete_action())
    }

    pub fn favorite_post(&self) -> JoinHandle<()> {
        self.run_managed((self.favorite_action)())
    }
}

impl StateManager for PostRowViewModel {
    fn task_state(&self) -> &Arc<TaskState> {
        &self.state
    }
}
