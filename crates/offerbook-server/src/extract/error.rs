//! Extraction error types.

use offerbook_core::{ApiError, FieldErrors};
use std::fmt;

/// Where an extraction failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Path parameters.
    Path,
    /// Query string parameters.
    Query,
    /// Request body.
    Body,
    /// The Content-Type header.
    ContentType,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::ContentType => write!(f, "content-type"),
        }
    }
}

/// Error produced when a request part cannot be extracted.
///
/// Every variant is a client problem with the submitted request; the
/// boundary maps each one to the API's validation error so the caller gets
/// a 400 with the failing field named where one is known.
#[derive(Debug)]
pub struct ExtractionError {
    source: Source,
    field: Option<String>,
    message: String,
}

impl ExtractionError {
    /// Creates an error for a missing field or parameter.
    #[must_use]
    pub fn missing(source: Source, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            source,
            message: format!("missing required {source} parameter: {field}"),
            field: Some(field),
        }
    }

    /// Creates an error for a deserialization failure.
    #[must_use]
    pub fn deserialization(source: Source, details: impl Into<String>) -> Self {
        Self {
            source,
            field: None,
            message: format!("failed to deserialize {source}: {}", details.into()),
        }
    }

    /// Creates an error for a payload exceeding a size limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            source: Source::Body,
            field: None,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        }
    }

    /// Creates an error for a missing or unusable Content-Type header.
    #[must_use]
    pub fn invalid_content_type(details: impl Into<String>) -> Self {
        Self {
            source: Source::ContentType,
            field: None,
            message: details.into(),
        }
    }

    /// Creates an error for a rejected upload slot.
    #[must_use]
    pub fn upload_rejected(field: impl Into<String>, details: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            source: Source::Body,
            message: format!("file upload '{field}' rejected: {}", details.into()),
            field: Some(field),
        }
    }

    /// Returns where the failure originated.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the failing field name if one is known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        let message = err.message.clone();
        match err.field {
            Some(field) => {
                let mut errors = FieldErrors::new();
                errors.add(field, err.message);
                ApiError::validation_with_fields(message, errors)
            }
            None => ApiError::validation(message),
        }
    }
}
