// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in flow: tracks the current identity and hands out auth forms.

use crate::models::User;
use crate::services::AuthService;
use crate::view_models::{FormAction, FormViewModel, ViewModelFactory};
use crate::AppState;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignInForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Enter your password"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateAccountForm {
    #[validate(length(min = 1, message = "Enter your name"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Root controller deciding between the sign-in flow and the signed-in app.
pub struct AuthViewModel {
    state: AppState,
    auth: AuthService,
    user: watch::Receiver<Option<User>>,
}

impl AuthViewModel {
    pub fn new(state: AppState) -> Self {
        let auth = AuthService::new(Arc::clone(&state.identity), Arc::clone(&state.blobs));
        let user = auth.current_identity();
        Self { state, auth, user }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.user.clone()
    }

    pub fn make_sign_in_view_model(&self) -> FormViewModel<SignInForm> {
        let auth = self.auth.clone();
        let action: FormAction<SignInForm> = Arc::new(move |form| {
            let auth = auth.clone();
            async move {
                form.validate()?;
                auth.sign_in(&form.email, &form.password).await?;
                Ok(())
            }
            .boxed()
        });
        FormViewModel::new(SignInForm::default(), action)
    }

    pub fn make_create_account_view_model(&self) -> FormViewModel<CreateAccountForm> {
        let auth = self.auth.clone();
        let action: FormAction<CreateAccountForm> = Arc::new(move |form| {
            let auth = auth.clone();
            async move {
                form.validate()?;
                auth.create_account(&form.name, &form.email, &form.password)
                    .await?;
                Ok(())
            }
            .boxed()
        });
        FormViewModel::new(CreateAccountForm::default(), action)
    }

    /// Factory for the signed-in screens; `None` while signed out.
    pub fn make_view_model_factory(&self) -> Option<ViewModelFactory> {
        let user = self.current_user()?;
        Some(ViewModelFactory::new(
            user,
            self.state.clone(),
            self.auth.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_form_rules() {
        let valid = CreateAccountForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = CreateAccountForm {
            password: "12345".to_string(),
            ..valid.clone()
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let bad_email = CreateAccountForm {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let no_name = CreateAccountForm {
            name: String::new(),
            ..valid
        };
        assert!(no_name.validate().is_err());
    }

    #[test]
    fn test_sign_in_form_requires_email() {
        let form = SignInForm {
            email: "ada".to_string(),
            password: "secret1".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
