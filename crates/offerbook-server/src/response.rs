//! Response builders.
//!
//! Success bodies are JSON. Pipeline failures other than validation render
//! the transport's plain HTML error page, which is what the original API
//! contract expects for 404 and 501 fallbacks.

use bytes::Bytes;
use http::{header, Response, StatusCode};
use serde::Serialize;

/// JSON response builder with `Content-Type: application/json`.
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    ///
    /// # Panics
    ///
    /// Panics if JSON serialization fails.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let body = serde_json::to_vec(&self.data).expect("JSON serialization failed");

        Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .expect("failed to build response")
    }
}

/// Renders the default HTML error page for a failed request.
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> Response<Bytes> {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{reason}</title>\n</head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(message)
    );

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Bytes::from(body))
        .expect("failed to build response")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
