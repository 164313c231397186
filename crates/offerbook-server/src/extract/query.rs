//! Query string extractor.

use serde::de::DeserializeOwned;
use std::ops::Deref;

use crate::context::RequestParts;
use crate::extract::{ExtractionError, FromRequest, Source};

/// Extractor for URL query string parameters.
///
/// `Query<T>` deserializes the query string into `T` via `serde_urlencoded`.
/// Use `Option<String>` fields when a parameter needs lenient post-parsing,
/// as the pagination handler does.
///
/// # Example
///
/// ```
/// use http::{Method, Uri};
/// use offerbook_server::{
///     extract::{FromRequest, Query},
///     RequestPartsBuilder,
/// };
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct PageQuery {
///     #[serde(default)]
///     skip: Option<String>,
///     #[serde(default)]
///     limit: Option<String>,
/// }
///
/// let parts = RequestPartsBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/api/offers?skip=3&limit=6"))
///     .build();
///
/// let Query(page) = Query::<PageQuery>::from_request(&parts).unwrap();
/// assert_eq!(page.skip.as_deref(), Some("3"));
/// assert_eq!(page.limit.as_deref(), Some("6"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the Query and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Query<T> {
    fn from_request(parts: &RequestParts) -> Result<Self, ExtractionError> {
        let query_string = parts.query_string().unwrap_or("");

        let value: T = serde_urlencoded::from_str(query_string)
            .map_err(|e| ExtractionError::deserialization(Source::Query, e.to_string()))?;

        Ok(Query(value))
    }
}
