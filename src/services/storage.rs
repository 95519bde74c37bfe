// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blob storage for post images and profile photos.
//!
//! Handles:
//! - Uploading a local file under `{namespace}/{identifier}`
//! - Returning a stable download URL for the stored object
//! - Deleting an object given its download URL

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Remote blob store contract.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `local_file` and return its retrieval URL.
    async fn upload(
        &self,
        namespace: &str,
        identifier: &str,
        local_file: &Path,
    ) -> Result<Url, AppError>;

    /// Delete the object behind a URL previously returned by `upload`.
    async fn delete(&self, url: &Url) -> Result<(), AppError>;
}

/// Firebase Storage REST client.
#[derive(Clone)]
pub struct FirebaseStorage {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    auth_token: Option<String>,
}

impl FirebaseStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            auth_token: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let storage = Self::new(&config.storage_base_url, &config.storage_bucket);
        match &config.storage_auth_token {
            Some(token) => storage.with_auth_token(token.clone()),
            None => storage,
        }
    }

    /// Send `token` as a bearer credential with every request.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn objects_url(&self) -> String {
        format!("{}/v0/b/{}/o", self.base_url, self.bucket)
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(name))
    }

    /// Build the public download URL for an uploaded object.
    fn download_url(&self, name: &str, token: Option<&str>) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.object_url(name))
            .map_err(|e| AppError::Blob(format!("Invalid download URL for {}: {}", name, e)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url)
    }

    /// Recover the object name from a download URL of this bucket.
    fn object_name(&self, url: &Url) -> Result<String, AppError> {
        let prefix = format!("/v0/b/{}/o/", self.bucket);
        let encoded = url
            .path()
            .strip_prefix(&prefix)
            .ok_or_else(|| AppError::Blob(format!("Not a storage URL for this bucket: {}", url)))?;
        urlencoding::decode(encoded)
            .map(|name| name.into_owned())
            .map_err(|e| AppError::Blob(format!("Invalid object name in {}: {}", url, e)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check response status and return error if not successful.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Blob(format!("HTTP {}: {}", status, body)))
    }
}

/// Object metadata returned by the upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[async_trait]
impl BlobStore for FirebaseStorage {
    async fn upload(
        &self,
        namespace: &str,
        identifier: &str,
        local_file: &Path,
    ) -> Result<Url, AppError> {
        let name = format!("{}/{}", namespace, identifier);
        let content = tokio::fs::read(local_file).await.map_err(|e| {
            AppError::Blob(format!("Failed to read {}: {}", local_file.display(), e))
        })?;
        let content_type = mime_guess::from_path(local_file)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(
            object = %name,
            content_type = %content_type,
            bytes = content.len(),
            "Uploading blob"
        );

        let request = self
            .http
            .post(self.objects_url())
            .query(&[("uploadType", "media"), ("name", name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::Blob(format!("Upload request failed: {}", e)))?;

        let object: StorageObject = Self::check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Blob(format!("Failed to parse upload response: {}", e)))?;

        // Multiple tokens are comma separated; any of them grants access.
        let token = object
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next());

        self.download_url(&object.name, token)
    }

    async fn delete(&self, url: &Url) -> Result<(), AppError> {
        let name = self.object_name(url)?;
        tracing::debug!(object = %name, "Deleting blob");

        let request = self.http.delete(self.object_url(&name));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::Blob(format!("Delete request failed: {}", e)))?;

        Self::check_response(response).await?;
        Ok(())
    }
}

/// In-memory blob store keyed by `{namespace}/{identifier}`.
///
/// Returned URLs have the form `memory://{namespace}/{identifier}`.
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: DashMap<String, Vec<u8>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes for a URL returned by `upload`.
    pub fn get(&self, url: &Url) -> Option<Vec<u8>> {
        Self::key(url).and_then(|key| self.objects.get(&key).map(|bytes| bytes.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn key(url: &Url) -> Option<String> {
        if url.scheme() != "memory" {
            return None;
        }
        Some(format!("{}{}", url.host_str()?, url.path()))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        namespace: &str,
        identifier: &str,
        local_file: &Path,
    ) -> Result<Url, AppError> {
        let content = tokio::fs::read(local_file).await.map_err(|e| {
            AppError::Blob(format!("Failed to read {}: {}", local_file.display(), e))
        })?;
        let url = Url::parse(&format!("memory://{}/{}", namespace, identifier))
            .map_err(|e| AppError::Blob(format!("Invalid object key: {}", e)))?;
        let key = Self::key(&url)
            .ok_or_else(|| AppError::Blob(format!("Invalid object key: {}", url)))?;

        self.objects.insert(key, content);
        Ok(url)
    }

    async fn delete(&self, url: &Url) -> Result<(), AppError> {
        let key =
            Self::key(url).ok_or_else(|| AppError::Blob(format!("Not a memory URL: {}", url)))?;
        self.objects
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| AppError::Blob(format!("Object not found: {}", key)))
    }
}
