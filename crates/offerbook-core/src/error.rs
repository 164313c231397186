//! Error types for the Offerbook API.
//!
//! This module provides the [`ApiError`] type, which is the standard error
//! type used throughout the offers pipeline. Every failure a handler can
//! produce is one of a small set of kinds, each with a fixed HTTP status
//! mapping applied at the transport boundary.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// Kinds of errors for classification and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// One or more field rule violations.
    Validation,
    /// A required parameter is missing or malformed.
    IllegalArgument,
    /// No matching resource, or an invalid pagination range.
    NotFound,
    /// The HTTP verb is not supported on this path.
    NotImplemented,
    /// Internal server errors.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this error kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation | Self::IllegalArgument => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for the Offerbook API.
///
/// `ApiError` provides structured errors with:
/// - Error classification via [`ErrorKind`]
/// - HTTP status code mapping
/// - A serializable error envelope for validation responses
///
/// # Example
///
/// ```
/// use offerbook_core::ApiError;
///
/// fn require_date(raw: Option<&str>) -> Result<&str, ApiError> {
///     raw.ok_or_else(|| ApiError::illegal_argument("no date provided"))
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A submitted record violated one or more field rules.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Field-specific validation errors.
        #[source]
        field_errors: Option<FieldErrors>,
    },

    /// A required parameter is missing or malformed.
    #[error("illegal argument: {message}")]
    IllegalArgument {
        /// Human-readable error message.
        message: String,
    },

    /// No matching resource was found.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The HTTP verb is not supported on this path.
    #[error("not implemented: {message}")]
    NotImplemented {
        /// Human-readable error message.
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// Creates a validation error with a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Creates a validation error carrying the full field error set.
    #[must_use]
    pub fn validation_with_fields(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Creates an illegal argument error.
    #[must_use]
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a not implemented error.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::IllegalArgument { .. } => ErrorKind::IllegalArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Returns the field errors carried by a validation error, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation {
                field_errors: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                errors: self.field_errors().cloned(),
            },
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::IllegalArgument { .. } => "ILLEGAL_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotImplemented { .. } => "NOT_IMPLEMENTED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Field-specific validation errors.
///
/// Maps a field name to the list of rule violations collected for it.
/// An empty set means the record is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Error)]
#[error("field validation errors")]
#[serde(transparent)]
pub struct FieldErrors {
    /// Map of field name to list of error messages.
    pub fields: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates a new empty `FieldErrors`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` if there are no field errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the messages collected for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }
}

/// Serializable error envelope for validation failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level violations, present for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}
