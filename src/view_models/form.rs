//! Generic form controller: an editable value plus a submit action.

use crate::error::AppError;
use crate::state::{StateManager, TaskState};
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Submit action receiving the form's current value.
pub type FormAction<V> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<(), AppError>> + Send + Sync>;

pub struct FormViewModel<V> {
    value: watch::Sender<V>,
    action: FormAction<V>,
    state: Arc<TaskState>,
}

impl<V> FormViewModel<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(initial_value: V, action: FormAction<V>) -> Self {
        let (value, _) = watch::channel(initial_value);
        Self {
            value,
            action,
            state: Arc::new(TaskState::new()),
        }
    }

    pub fn value(&self) -> V {
        self.value.borrow().clone()
    }

    pub fn set_value(&self, value: V) {
        self.value.send_replace(value);
    }

    /// Edit the value in place, e.g. `form.update(|post| post.title = title)`.
    pub fn update(&self, edit: impl FnOnce(&mut V)) {
        self.value.send_modify(edit);
    }

    pub fn subscribe(&self) -> watch::Receiver<V> {
        self.value.subscribe()
    }

    /// Drives the progress indicator while submitting.
    pub fn is_working(&self) -> bool {
        self.state.is_working()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    /// Run the action with a snapshot of the current value.
    pub fn submit(&self) -> JoinHandle<()> {
        self.run_managed((self.action)(self.value()))
    }
}

impl<V> StateManager for FormViewModel<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn task_state(&self) -> &Arc<TaskState> {
        &self.state
    }
}
