//! Profile screen controller.

use crate::error::AppError;
use crate::models::User;
use crate::services::AuthService;
use crate::state::{StateManager, TaskState};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

pub struct ProfileViewModel {
    name: String,
    image_url: Arc<watch::Sender<Option<Url>>>,
    auth: AuthService,
    state: Arc<TaskState>,
}

impl ProfileViewModel {
    pub fn new(user: &User, auth: AuthService) -> Self {
        let (image_url, _) = watch::channel(user.image_url.clone());
        Self {
            name: user.name.clone(),
            image_url: Arc::new(image_url),
            auth,
            state: Arc::new(TaskState::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> Option<Url> {
        self.image_url.borrow().clone()
    }

    pub fn subscribe_image_url(&self) -> watch::Receiver<Option<Url>> {
        self.image_url.subscribe()
    }

    pub fn is_working(&self) -> bool {
        self.state.is_working()
    }

    pub fn error(&self) -> Option<AppError> {
        self.state.error()
    }

    /// Pick a new profile photo (a `file://` URL) or clear it with `None`.
    ///
    /// Returns `None` without doing anything when the value is unchanged.
    /// Once the update succeeds the published URL is the stored photo's
    /// remote URL.
    pub fn set_image_url(&self, image_url: Option<Url>) -> Option<JoinHandle<()>> {
        if *self.image_url.borrow() == image_url {
            return None;
        }
        self.image_url.send_replace(image_url.clone());

        let auth = self.auth.clone();
        let published = Arc::clone(&self.image_url);
        Some(self.run_managed(async move {
            let image_file = image_url
                .as_ref()
                .map(|url| {
                    url.to_file_path().map_err(|()| {
                        AppError::Validation(format!("Not a local image file: {}", url))
                    })
                })
                .transpose()?;
            let stored = auth.update_profile_image(image_file.as_deref()).await?;
            published.send_replace(stored);
            Ok(())
        }))
    }

    pub fn sign_out(&self) -> JoinHandle<()> {
        let auth = self.auth.clone();
        self.run_managed(async move { auth.sign_out().await })
    }
}

impl StateManager for ProfileViewModel {
    fn task_state(&self) -> &Arc<TaskState> {
        &self.state
    }
}
