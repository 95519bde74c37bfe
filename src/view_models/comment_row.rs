//! Controller for a single comment row.

use crate::error::AppError;
use crate::models::Comment;
use crate::state::{AsyncAction, StateManager, TaskState};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Comment row with the delete action supplied by the comments controller.
pub struct CommentRowViewModel {
    comment: Comment,
    state: Arc<TaskState>,
    delete_action: Option<AsyncAction>,
}

impl CommentRowViewModel {
    pub fn new(comment: Comment, delete_action: Option<AsyncAction>) -> Self {
        Self {
            comment,
            state: Arc::new(TaskState::untracked()),
            delete_action,
        }
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    pub fn can_delete_comment(&self) -> bool {
        self.delete_action.is_some()
    }

    /// # Panics
    ///
    /// Panics when no delete action was provided.
    pub fn delete_comment(&self) -> JoinHandle<()> {
        let Some(delete_action) = &self.delete_action else {
            panic!(
                "cannot delete comment {}: no delete action provided",
                self.comment.id
            );
        };
        self.run_managed(delete_action())
    }
}

impl StateManager for CommentRowViewModel {
    fn task_state(&self) -> &Arc<TaskState> {
        &self.state
    }
}
