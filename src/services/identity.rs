//! Identity provider contract.
//!
//! The real provider (account storage, password checks, tokens) lives outside
//! this crate; only its contract is consumed. An in-memory provider backs
//! tests and demos.

use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

/// A single profile field change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChange {
    DisplayName(String),
    PhotoUrl(Option<Url>),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    async fn create_account(&self, name: &str, email: &str, password: &str)
        -> Result<User, AppError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;

    /// Live view of the signed-in user (`None` when signed out).
    fn current_identity(&self) -> watch::Receiver<Option<User>>;

    /// Apply `change` to the signed-in user's profile.
    async fn update_profile(&self, change: ProfileChange) -> Result<(), AppError>;
}

struct Account {
    password: String,
    user: User,
}

pub struct InMemoryIdentityProvider {
    /// Accounts keyed by email
    accounts: DashMap<String, Account>,
    current: watch::Sender<Option<User>>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: DashMap::new(),
            current,
        }
    }

    /// Currently signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();
        if self.accounts.contains_key(&email) {
            return Err(AppError::Identity(format!(
                "The email address {} is already in use",
                email
            )));
        }

        let user = User::new(Uuid::new_v4().to_string(), name);
        self.accounts.insert(
            email,
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        self.current.send_replace(Some(user.clone()));

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();
        let user = match self.accounts.get(&email) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AppError::Identity("Invalid email or password".to_string())),
        };

        self.current.send_replace(Some(user.clone()));
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.current.send_replace(None);
        Ok(())
    }

    fn current_identity(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }

    async fn update_profile(&self, change: ProfileChange) -> Result<(), AppError> {
        let user_id = self
            .current_user()
            .map(|user| user.id)
            .ok_or_else(|| AppError::Identity("No signed-in user".to_string()))?;

        let mut updated = None;
        for mut account in self.accounts.iter_mut() {
            if account.user.id != user_id {
                continue;
            }
            match &change {
                ProfileChange::DisplayName(name) => account.user.name = name.clone(),
                ProfileChange::PhotoUrl(url) => account.user.image_url = url.clone(),
            }
            updated = Some(account.user.clone());
        }

        let user = updated
            .ok_or_else(|| AppError::Identity(format!("Unknown user {}", user_id)))?;
        self.current.send_replace(Some(user));
        Ok(())
    }
}
