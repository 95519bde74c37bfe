// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and profile operations on top of the identity provider.

use crate::error::AppError;
use crate::models::User;
use crate::services::identity::{IdentityProvider, ProfileChange};
use crate::services::storage::BlobStore;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use url::Url;

/// Blob namespace for profile photos.
const PROFILE_PHOTO_NAMESPACE: &str = "users";

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    blobs: Arc<dyn BlobStore>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { identity, blobs }
    }

    pub fn current_identity(&self) -> watch::Receiver<Option<User>> {
        self.identity.current_identity()
    }

    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        self.identity.create_account(name, email, password).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.identity.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.identity.sign_out().await
    }

    /// Replace or clear the signed-in user's profile photo.
    ///
    /// With a file, the photo is uploaded to `users/{uid}` and the profile
    /// points at the upload. With `None`, the profile photo is cleared first
    /// and the previously stored blob deleted afterwards.
    pub async fn update_profile_image(
        &self,
        image_file: Option<&Path>,
    ) -> Result<Option<Url>, AppError> {
        let user = self
            .identity
            .current_identity()
            .borrow()
            .clone()
            .ok_or_else(|| AppError::Identity("No signed-in user".to_string()))?;

        let Some(image_file) = image_file else {
            self.identity
                .update_profile(ProfileChange::PhotoUrl(None))
                .await?;
            if let Some(previous) = &user.image_url {
                self.blobs.delete(previous).await?;
            }
            tracing::info!(user_id = %user.id, "Profile photo removed");
            return Ok(None);
        };

        let url = self
            .blobs
            .upload(PROFILE_PHOTO_NAMESPACE, &user.id, image_file)
            .await?;
        self.identity
            .update_profile(ProfileChange::PhotoUrl(Some(url.clone())))
            .await?;

        tracing::info!(user_id = %user.id, "Profile photo updated");
        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::InMemoryIdentityProvider;
    use crate::services::storage::InMemoryBlobStore;

    async fn signed_in() -> (AuthService, Arc<InMemoryIdentityProvider>, Arc<InMemoryBlobStore>) {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let service = AuthService::new(identity.clone(), blobs.clone());
        service
            .create_account("Ada", "ada@example.com", "secret1")
            .await
            .unwrap();
        (service, identity, blobs)
    }

    #[tokio::test]
    async fn test_update_profile_image_uploads_under_user_id() {
        let (service, identity, blobs) = signed_in().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, b"png").unwrap();

        let url = service
            .update_profile_image(Some(&path))
            .await
            .unwrap()
            .unwrap();

        let user = identity.current_user().unwrap();
        assert_eq!(url.as_str(), format!("memory://users/{}", user.id));
        assert_eq!(user.image_url, Some(url.clone()));
        assert_eq!(blobs.get(&url), Some(b"png".to_vec()));
    }

    #[tokio::test]
    async fn test_clear_profile_image_deletes_blob() {
        let (service, identity, blobs) = signed_in().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, b"png").unwrap();
        service.update_profile_image(Some(&path)).await.unwrap();

        let cleared = service.update_profile_image(None).await.unwrap();

        assert!(cleared.is_none());
        assert!(identity.current_user().unwrap().image_url.is_none());
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_image_requires_user() {
        let (service, _, _) = signed_in().await;
        service.sign_out().await.unwrap();
        let err = service.update_profile_image(None).await.unwrap_err();
        assert!(matches!(err, AppError::Identity(_)));
    }
}
