//! Multipart form data extractor.
//!
//! Create requests may arrive as `multipart/form-data` carrying text fields
//! plus up to two image attachments. The extractor walks the parsed parts;
//! the upload policy decides which file slots exist and which file types
//! they accept.

use bytes::Bytes;
use http::{header, HeaderMap};
use std::io;

use crate::extract::{ExtractionError, Source};

/// Default maximum total body size for multipart (5 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default maximum size per field (1 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 1024 * 1024;

/// Configuration for multipart parsing.
#[derive(Debug, Clone)]
pub struct MultipartConfig {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size per field in bytes.
    pub max_field_size: usize,
    /// Maximum number of fields allowed.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: 20,
        }
    }
}

impl MultipartConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Sets the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Sets the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// Which file slots a form accepts, and which file types those slots take.
///
/// A slot holds at most one file. Files are accepted when either the part's
/// MIME subtype or the filename extension is in the allowed list; everything
/// else is rejected at this boundary before the pipeline runs.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    slots: &'static [&'static str],
    extensions: &'static [&'static str],
}

impl UploadPolicy {
    /// The offer form policy: `avatar` and `preview` slots, image files only.
    #[must_use]
    pub fn images() -> Self {
        Self {
            slots: &["avatar", "preview"],
            extensions: &["jpeg", "jpg", "png"],
        }
    }

    /// Returns `true` if a file slot with this name exists.
    #[must_use]
    pub fn accepts_slot(&self, name: &str) -> bool {
        self.slots.contains(&name)
    }

    /// Returns `true` if the field's file type passes the filter.
    #[must_use]
    pub fn accepts_file(&self, field: &Field) -> bool {
        let mime_ok = field
            .content_type()
            .is_some_and(|mime| self.extensions.contains(&mime.subtype().as_str()));
        let ext_ok = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            });
        mime_ok || ext_ok
    }
}

/// Extractor for multipart form data.
///
/// Fields are consumed one at a time with [`Multipart::next_field`].
pub struct Multipart {
    inner: multer::Multipart<'static>,
    config: MultipartConfig,
    field_count: usize,
}

impl Multipart {
    /// Creates a multipart extractor over a buffered body.
    ///
    /// # Errors
    ///
    /// Returns an error if the Content-Type header is missing or carries no
    /// boundary, or the body exceeds the configured size.
    pub fn from_parts(
        headers: &HeaderMap,
        body: Bytes,
        config: MultipartConfig,
    ) -> Result<Self, ExtractionError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .ok_or_else(|| {
                ExtractionError::invalid_content_type("missing Content-Type for multipart body")
            })?
            .to_str()
            .map_err(|_| {
                ExtractionError::invalid_content_type("invalid UTF-8 in Content-Type header")
            })?;

        let boundary = multer::parse_boundary(content_type).map_err(|_| {
            ExtractionError::invalid_content_type(
                "missing or invalid boundary in multipart Content-Type",
            )
        })?;

        if body.len() > config.max_body_size {
            return Err(ExtractionError::payload_too_large(
                config.max_body_size,
                body.len(),
            ));
        }

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        let inner = multer::Multipart::new(stream, boundary);

        Ok(Self {
            inner,
            config,
            field_count: 0,
        })
    }

    /// Returns the next field, or `None` when the form is exhausted.
    pub async fn next_field(&mut self) -> Result<Option<Field>, ExtractionError> {
        if self.field_count >= self.config.max_fields {
            return Err(ExtractionError::deserialization(
                Source::Body,
                format!("too many multipart fields (max {})", self.config.max_fields),
            ));
        }

        match self.inner.next_field().await {
            Ok(Some(field)) => {
                self.field_count += 1;
                Ok(Some(Field {
                    inner: field,
                    max_size: self.config.max_field_size,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ExtractionError::deserialization(
                Source::Body,
                format!("multipart parse error: {e}"),
            )),
        }
    }
}

impl std::fmt::Debug for Multipart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multipart")
            .field("config", &self.config)
            .field("field_count", &self.field_count)
            .finish_non_exhaustive()
    }
}

/// A single field of a multipart form, either a text value or a file.
pub struct Field {
    inner: multer::Field<'static>,
    max_size: usize,
}

impl Field {
    /// Returns the form field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Returns the original filename for file uploads, `None` for text.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.inner.file_name()
    }

    /// Returns the Content-Type of this field.
    #[must_use]
    pub fn content_type(&self) -> Option<&mime::Mime> {
        self.inner.content_type()
    }

    /// Reads the entire field as bytes, enforcing the field size limit.
    pub async fn bytes(self) -> Result<Bytes, ExtractionError> {
        let max_size = self.max_size;
        let bytes = self.inner.bytes().await.map_err(|e| {
            ExtractionError::deserialization(Source::Body, format!("failed to read field: {e}"))
        })?;

        if bytes.len() > max_size {
            return Err(ExtractionError::payload_too_large(max_size, bytes.len()));
        }

        Ok(bytes)
    }

    /// Reads the field as a UTF-8 string.
    pub async fn text(self) -> Result<String, ExtractionError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ExtractionError::deserialization(Source::Body, format!("field is not valid UTF-8: {e}"))
        })
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.inner.name())
            .field("file_name", &self.inner.file_name())
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multipart_body(boundary: &str, parts: &[(&str, &str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, content_type, filename, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());

            if let Some(fname) = filename {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n"
                    )
                    .as_bytes(),
                );
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
                );
            }

            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    fn multipart_headers(boundary: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}")
                .parse()
                .unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_walks_text_and_file_fields() {
        let boundary = "----boundary";
        let body = multipart_body(
            boundary,
            &[
                ("address", "text/plain", None, b"12 Harbour street"),
                ("avatar", "image/png", Some("me.png"), b"PNG_DATA"),
            ],
        );

        let mut multipart = Multipart::from_parts(
            &multipart_headers(boundary),
            Bytes::from(body),
            MultipartConfig::default(),
        )
        .unwrap();

        let text = multipart.next_field().await.unwrap().unwrap();
        assert_eq!(text.name(), Some("address"));
        assert!(text.file_name().is_none());
        assert_eq!(text.text().await.unwrap(), "12 Harbour street");

        let file = multipart.next_field().await.unwrap().unwrap();
        assert_eq!(file.name(), Some("avatar"));
        assert_eq!(file.file_name(), Some("me.png"));
        assert_eq!(&file.bytes().await.unwrap()[..], b"PNG_DATA");

        assert!(multipart.next_field().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let headers = HeaderMap::new();
        let result = Multipart::from_parts(&headers, Bytes::new(), MultipartConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_boundary_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "multipart/form-data".parse().unwrap());

        let result = Multipart::from_parts(&headers, Bytes::new(), MultipartConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let boundary = "----boundary";
        let config = MultipartConfig::new().max_body_size(10);
        let body = Bytes::from(vec![0u8; 100]);

        let result = Multipart::from_parts(&multipart_headers(boundary), body, config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_field_limit_is_enforced() {
        let boundary = "----boundary";
        let body = multipart_body(
            boundary,
            &[
                ("a", "text/plain", None, b"1"),
                ("b", "text/plain", None, b"2"),
            ],
        );

        let config = MultipartConfig::new().max_fields(1);
        let mut multipart =
            Multipart::from_parts(&multipart_headers(boundary), Bytes::from(body), config).unwrap();

        assert!(multipart.next_field().await.unwrap().is_some());
        assert!(multipart.next_field().await.is_err());
    }

    #[tokio::test]
    async fn test_upload_policy_slots() {
        let policy = UploadPolicy::images();
        assert!(policy.accepts_slot("avatar"));
        assert!(policy.accepts_slot("preview"));
        assert!(!policy.accepts_slot("banner"));
    }

    #[tokio::test]
    async fn test_upload_policy_file_filter() {
        let boundary = "----boundary";
        let body = multipart_body(
            boundary,
            &[
                ("avatar", "image/png", Some("me.png"), b"PNG"),
                ("avatar", "application/octet-stream", Some("me.JPG"), b"JPG"),
                ("avatar", "application/pdf", Some("cv.pdf"), b"PDF"),
            ],
        );

        let mut multipart = Multipart::from_parts(
            &multipart_headers(boundary),
            Bytes::from(body),
            MultipartConfig::default(),
        )
        .unwrap();
        let policy = UploadPolicy::images();

        let by_mime = multipart.next_field().await.unwrap().unwrap();
        assert!(policy.accepts_file(&by_mime));

        let by_extension = multipart.next_field().await.unwrap().unwrap();
        assert!(policy.accepts_file(&by_extension));

        let neither = multipart.next_field().await.unwrap().unwrap();
        assert!(!policy.accepts_file(&neither));
    }
}
