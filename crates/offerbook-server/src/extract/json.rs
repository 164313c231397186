//! JSON body extractor.

use serde::de::DeserializeOwned;
use std::ops::Deref;

use crate::context::RequestParts;
use crate::extract::{ExtractionError, FromRequest, Source};

/// Default maximum body size for JSON extraction (1 MB).
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Extractor for JSON request bodies.
///
/// Deserializes the buffered body into `T`. The draft type deserialized for
/// create requests keeps its fields as raw JSON values, so mistyped input
/// reaches the validator instead of failing here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the Json and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Json<T> {
    fn from_request(parts: &RequestParts) -> Result<Self, ExtractionError> {
        let body = parts.body();

        if body.len() > DEFAULT_MAX_BODY_SIZE {
            return Err(ExtractionError::payload_too_large(
                DEFAULT_MAX_BODY_SIZE,
                body.len(),
            ));
        }

        if body.is_empty() {
            return Err(ExtractionError::deserialization(
                Source::Body,
                "empty request body",
            ));
        }

        let value: T = serde_json::from_slice(body)
            .map_err(|e| ExtractionError::deserialization(Source::Body, e.to_string()))?;

        Ok(Json(value))
    }
}
