//! Busy/error tracking for fallible async actions.
//!
//! Controllers own a [`TaskState`] and implement [`StateManager`]; every
//! action they trigger goes through [`StateManager::run_managed`], which
//! marks the controller busy, runs the action on its own task, and records
//! the outcome in the error slot.
//!
//! Overlapping runs are not serialized: two concurrent actions may finish in
//! either order and the last one to finish wins both slots.

use crate::error::AppError;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Repeatable async action handed from a list controller to a row or form.
pub type AsyncAction = Arc<dyn Fn() -> BoxFuture<'static, Result<(), AppError>> + Send + Sync>;

/// Optional "is working" indicator.
///
/// Controllers that never show progress use `Untracked`, which always reads
/// `false` and ignores writes.
pub enum BusyFlag {
    Tracked(watch::Sender<bool>),
    Untracked,
}

impl BusyFlag {
    pub fn tracked() -> Self {
        let (sender, _) = watch::channel(false);
        BusyFlag::Tracked(sender)
    }

    pub fn get(&self) -> bool {
        match self {
            BusyFlag::Tracked(sender) => *sender.borrow(),
            BusyFlag::Untracked => false,
        }
    }

    pub fn set(&self, working: bool) {
        if let BusyFlag::Tracked(sender) = self {
            sender.send_replace(working);
        }
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<bool>> {
        match self {
            BusyFlag::Tracked(sender) => Some(sender.subscribe()),
            BusyFlag::Untracked => None,
        }
    }
}

/// Error slot plus busy flag of one controller.
pub struct TaskState {
    error: watch::Sender<Option<AppError>>,
    busy: BusyFlag,
}

impl TaskState {
    /// State with a tracked busy flag.
    pub fn new() -> Self {
        Self::with_busy_flag(BusyFlag::tracked())
    }

    /// State for controllers without a progress indicator.
    pub fn untracked() -> Self {
        Self::with_busy_flag(BusyFlag::Untracked)
    }

    pub fn with_busy_flag(busy: BusyFlag) -> Self {
        let (error, _) = watch::channel(None);
        Self { error, busy }
    }

    /// Last recorded failure.
    pub fn error(&self) -> Option<AppError> {
        self.error.borrow().clone()
    }

    pub fn set_error(&self, error: Option<AppError>) {
        self.error.send_replace(error);
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<AppError>> {
        self.error.subscribe()
    }

    pub fn is_working(&self) -> bool {
        self.busy.get()
    }

    pub fn set_working(&self, working: bool) {
        self.busy.set(working);
    }

    /// `None` when the busy flag is untracked.
    pub fn subscribe_working(&self) -> Option<watch::Receiver<bool>> {
        self.busy.subscribe()
    }

    /// Run `action` inline with busy/error bookkeeping.
    ///
    /// Success clears the error slot; failure is logged and stored. The busy
    /// flag is reset in both cases.
    ///
    /// A panic in `action` (an authorization violation) is not recorded as an
    /// error: the busy flag is reset and the panic resumes.
    pub async fn manage<F>(&self, controller: &str, action: F)
    where
        F: Future<Output = Result<(), AppError>>,
    {
        self.set_working(true);
        match AssertUnwindSafe(action).catch_unwind().await {
            Ok(Ok(())) => self.set_error(None),
            Ok(Err(error)) => {
                tracing::error!(controller, error = %error, "Managed task failed");
                self.set_error(Some(error));
            }
            Err(panic) => {
                self.set_working(false);
                tracing::error!(controller, "Managed task panicked");
                std::panic::resume_unwind(panic);
            }
        }
        self.set_working(false);
    }
}

impl Default for TaskState {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability of controllers that run fallible async actions.
pub trait StateManager: Send + Sync + 'static {
    fn task_state(&self) -> &Arc<TaskState>;

    /// Spawn `action` with busy/error bookkeeping and return immediately.
    ///
    /// Must be called from within a Tokio runtime.
    fn run_managed<F>(&self, action: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let state = Arc::clone(self.task_state());
        let controller = std::any::type_name::<Self>();
        tokio::spawn(async move { state.manage(controller, action).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    struct Controller {
        state: Arc<TaskState>,
    }

    impl StateManager for Controller {
        fn task_state(&self) -> &Arc<TaskState> {
            &self.state
        }
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_clears_busy() {
        let controller = Controller {
            state: Arc::new(TaskState::new()),
        };

        controller
            .run_managed(async { Err(AppError::Store("offline".to_string())) })
            .await
            .unwrap();

        assert!(!controller.state.is_working());
        assert_eq!(
            controller.state.error(),
            Some(AppError::Store("offline".to_string()))
        );
    }

    #[tokio::test]
    async fn test_panic_resumes_and_clears_busy() {
        let controller = Controller {
            state: Arc::new(TaskState::new()),
        };

        fn forbidden_delete() -> Result<(), AppError> {
            panic!("user {} is not allowed to delete post {}", "u2", "p1");
        }

        let err = controller
            .run_managed(async { forbidden_delete() })
            .await
            .unwrap_err();

        assert!(err.is_panic());
        let message = err.into_panic().downcast::<String>().unwrap();
        assert!(message.contains("not allowed to delete"));
        assert!(!controller.state.is_working());
        assert!(controller.state.error().is_none());
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let controller = Controller {
            state: Arc::new(TaskState::new()),
        };
        controller
            .state
            .set_error(Some(AppError::Blob("stale".to_string())));

        controller.run_managed(async { Ok(()) }).await.unwrap();

        assert!(controller.state.error().is_none());
    }

    #[tokio::test]
    async fn test_busy_while_running() {
        let controller = Controller {
            state: Arc::new(TaskState::new()),
        };
        let (release, wait) = oneshot::channel::<()>();
        let mut working = controller.state.subscribe_working().unwrap();

        let handle = controller.run_managed(async move {
            let _ = wait.await;
            Ok(())
        });

        working.wait_for(|busy| *busy).await.unwrap();
        assert!(controller.state.is_working());

        release.send(()).unwrap();
        handle.await.unwrap();
        assert!(!controller.state.is_working());
    }

    #[tokio::test]
    async fn test_untracked_busy_flag_is_noop() {
        let controller = Controller {
            state: Arc::new(TaskState::untracked()),
        };
        assert!(controller.state.subscribe_working().is_none());

        controller.state.set_working(true);
        assert!(!controller.state.is_working());

        controller
            .run_managed(async { Err(AppError::Store("x".to_string())) })
            .await
            .unwrap();
        assert!(controller.state.error().is_some());
    }

    #[tokio::test]
    async fn test_overlapping_runs_are_not_serialized() {
        let controller = Controller {
            state: Arc::new(TaskState::new()),
        };
        let (release_first, wait_first) = oneshot::channel::<()>();

        let first = controller.run_managed(async move {
            let _ = wait_first.await;
            Err(AppError::Store("first".to_string()))
        });
        // The second run completes while the first is still pending.
        controller
            .run_managed(async { Err(AppError::Store("second".to_string())) })
            .await
            .unwrap();
        assert_eq!(
            controller.state.error(),
            Some(AppError::Store("second".to_string()))
        );
        // Busy was cleared by the second run even though the first is running.
        assert!(!controller.state.is_working());

        release_first.send(()).unwrap();
        first.await.unwrap();
        assert_eq!(
            controller.state.error(),
            Some(AppError::Store("first".to_string()))
        );
    }
}
