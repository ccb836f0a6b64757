//! # Error Handling for the Search API
//!
//! Maps every failure of a search to one of two response envelopes:
//!
//! | Failure | Status | Body |
//! |---|---|---|
//! | Parameter validation | 422 | `{ ok: false, error: "validation_error", details: [...] }` |
//! | Storage or internal | 500 | `{ ok: false, error: "internal_error" }` |
//!
//! ## Philosophy
//!
//! **Never expose internal errors to users**. Database errors are logged
//! server-side with the shape of the filter that was running, never with the
//! raw client input, and the client only ever sees the generic envelope.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use restaurant_search::ApiError;
//!
//! let total = store
//!     .count(&filter)
//!     .await
//!     .map_err(|err| ApiError::storage(err, filter.shape()))?;
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// Error code for rejected parameters
pub const VALIDATION_ERROR: &str = "validation_error";
/// Error code for everything the client cannot fix
pub const INTERNAL_ERROR: &str = "internal_error";

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 422 Unprocessable Entity - one or more parameters were rejected
    ValidationFailed {
        /// Every violation, in report order
        errors: ValidationErrors,
    },

    /// 500 Internal Server Error - the store failed (details logged, not exposed)
    Database {
        /// What was running when the store failed, e.g. the filter shape
        context: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - anything else
    Internal {
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    #[must_use]
    pub const fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// # Example
    /// ```rust,ignore
    /// store.count(&filter).await.map_err(ApiError::database)?;
    /// ```
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            context: String::new(),
            internal: err,
        }
    }

    /// Database error raised while running the filter described by `shape`
    #[must_use]
    pub fn storage(err: DbErr, shape: impl Into<String>) -> Self {
        Self::Database {
            context: shape.into(),
            internal: err,
        }
    }

    #[must_use]
    pub const fn internal(internal: Option<String>) -> Self {
        Self::Internal { internal }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code sent to the client
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => VALIDATION_ERROR,
            Self::Database { .. } | Self::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// Build the sanitized body for this error
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            Self::ValidationFailed { errors } => Some(errors.details()),
            Self::Database { .. } | Self::Internal { .. } => None,
        };
        ErrorResponse {
            ok: false,
            error: self.code().to_string(),
            details,
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { context, internal } => {
                tracing::error!(
                    error = ?internal,
                    filter = %context,
                    "Search storage error"
                );
            }
            Self::Internal {
                internal: Some(details),
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            Self::Internal { internal: None } => {
                tracing::error!("Internal error occurred");
            }
            Self::ValidationFailed { errors } => {
                tracing::debug!(
                    violations = errors.len(),
                    status = %self.status_code(),
                    "Search parameters rejected"
                );
            }
        }
    }
}

/// Error envelope sent to users (sanitized)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub ok: bool,
    /// `validation_error` or `internal_error`
    #[schema(example = "validation_error")]
    pub error: String,
    /// One `"<field>: <message>"` entry per violation; validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!(["min_rating: must be less than or equal to 5", "foo: is not allowed"]))]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed { errors } => write!(f, "Validation failed: {errors}"),
            Self::Database { .. } | Self::Internal { .. } => {
                write!(f, "An internal error occurred")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ValidationFailed { errors } => Some(errors),
            Self::Database { internal, .. } => Some(internal),
            Self::Internal { .. } => None,
        }
    }
}

/// All `DbErr` variants are internal failures for a read-only search
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors)
    }
}
