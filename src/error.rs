// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by repositories and view models.
//!
//! Every variant carries a human-readable message only, so errors can be
//! cloned into error slots and `Loadable::Error` states.

/// Recoverable failure of a data operation.
///
/// Authorization violations are not represented here: deleting without
/// permission panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Document store error: {0}")]
    Store(String),

    #[error("Blob store error: {0}")]
    Blob(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Remote document I/O or record decoding failed.
    pub fn is_store_error(&self) -> bool {
        matches!(self, AppError::Store(_))
    }

    /// Uploading or deleting a blob failed.
    pub fn is_blob_error(&self) -> bool {
        matches!(self, AppError::Blob(_))
    }

    /// A model could not be serialized. Indicates a defect in the model.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, AppError::Encoding(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias for data operations.
pub type Result<T> = std::result::Result<T, AppError>;
