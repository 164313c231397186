//! Request extraction.
//!
//! Extractors parse data out of a buffered [`RequestParts`]: typed query
//! strings, path parameters, JSON bodies and multipart forms. Failures are
//! reported as [`ExtractionError`] and converted to the API's validation
//! error at the handler boundary.

mod error;
mod json;
mod multipart;
mod path;
mod query;

pub use error::{ExtractionError, Source};
pub use json::Json;
pub use multipart::{Field, Multipart, MultipartConfig, UploadPolicy};
pub use path::path_param;
pub use query::Query;

use crate::context::RequestParts;

/// Types that can be extracted from a buffered request.
pub trait FromRequest: Sized {
    /// Performs the extraction.
    fn from_request(parts: &RequestParts) -> Result<Self, ExtractionError>;
}
