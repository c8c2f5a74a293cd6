// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

use crate::store::StoreError;

/// Network operations the UI can initiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Login,
    RequestPasswordReset,
    ResetPassword,
}

impl ApiOperation {
    /// Message shown when the server gave nothing better.
    pub fn default_message(self) -> &'static str {
        match self {
            ApiOperation::Login => "Unable to sign in. Please try again.",
            ApiOperation::RequestPasswordReset => {
                "Unable to send the password reset email. Please try again."
            }
            ApiOperation::ResetPassword => "Unable to reset the password. Please try again.",
        }
    }
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("A request is already in progress")]
    RequestPending,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Displayable message for the UI action that produced this error.
    ///
    /// Server and validation messages are shown as-is; anything internal is
    /// replaced by the operation's fixed default so no technical detail leaks.
    pub fn user_message(&self, op: ApiOperation) -> String {
        match self {
            AppError::Network(msg) | AppError::BadRequest(msg) if !msg.trim().is_empty() => {
                msg.clone()
            }
            AppError::RequestPending => self.to_string(),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                op.default_message().to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                op.default_message().to_string()
            }
            _ => op.default_message().to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        AppError::BadRequest(format!("Invalid {}", fields.join(", ")))
    }
}

/// Result type alias for the session core
pub type Result<T> = std::result::Result<T, AppError>;
