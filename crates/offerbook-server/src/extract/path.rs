//! Path parameter access.

use crate::context::RequestParts;
use crate::extract::{ExtractionError, Source};

/// Returns a required path parameter by name.
pub fn path_param<'a>(parts: &'a RequestParts, name: &str) -> Result<&'a str, ExtractionError> {
    parts
        .params()
        .get(name)
        .ok_or_else(|| ExtractionError::missing(Source::Path, name))
}
