//! Route registration and in-memory request dispatch.
//!
//! [`App`] owns the route table and the injected offer store and turns a
//! buffered request into a response without touching a socket. The serve
//! loop calls it per request; the integration tests call it directly.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Response};

use offerbook_core::{ApiError, ErrorKind, OfferStore};

use crate::context::RequestParts;
use crate::offers;
use crate::response::{error_page, JsonResponse};
use crate::router::Router;

const SERVICE_NAME: &str = "offerbook";

/// The offers application: route table plus injected read-only store.
#[derive(Debug, Clone)]
pub struct App {
    store: Arc<OfferStore>,
    router: Router,
}

impl App {
    /// Creates the application over an injected store.
    #[must_use]
    pub fn new(store: Arc<OfferStore>) -> Self {
        let mut router = Router::new();
        router.add(Method::GET, "/health", "health");
        router.add(Method::GET, "/api/offers", "list_offers");
        router.add(Method::GET, "/api/offers/{date}", "get_offer");
        router.add(Method::POST, "/api/offers", "create_offer");
        // Any other verb on the collection path is unsupported, not unknown.
        router.add_any("/api/offers", "offers_fallback");

        Self { store, router }
    }

    /// Returns the injected offer store.
    #[must_use]
    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    /// Handles one buffered request, mapping every failure to its response.
    ///
    /// This never fails: pipeline errors become their mapped status, with a
    /// JSON envelope for validation failures and the HTML error page for
    /// everything else.
    pub async fn handle(&self, parts: RequestParts) -> Response<Bytes> {
        let method = parts.method().clone();
        let path = parts.path().to_string();

        match self.dispatch(parts).await {
            Ok(response) => response,
            Err(error) => {
                let status = error.status_code();
                if error.kind() == ErrorKind::Internal {
                    tracing::error!(http.method = %method, http.path = %path, error = %error,
                        "request failed");
                } else {
                    tracing::debug!(http.method = %method, http.path = %path,
                        http.status_code = status.as_u16(), error = %error, "request rejected");
                }
                error_response(&error)
            }
        }
    }

    async fn dispatch(&self, mut parts: RequestParts) -> Result<Response<Bytes>, ApiError> {
        let method = parts.method().clone();
        let path = parts.path().to_string();

        let Some(route) = self.router.match_route(&method, &path) else {
            return Err(ApiError::not_found(format!("cannot {method} {path}")));
        };

        let name = route.name();
        *parts.params_mut() = route.into_params();
        tracing::debug!(http.method = %method, http.path = %path, handler = name,
            "dispatching request");

        match name {
            "health" => Ok(self.health_response()),
            "list_offers" => offers::list(&self.store, &parts).await,
            "get_offer" => offers::get_by_date(&self.store, &parts).await,
            "create_offer" => offers::create(&parts).await,
            "offers_fallback" => Err(ApiError::not_implemented("this method is not supported")),
            _ => Err(ApiError::internal(format!(
                "no handler registered for route '{name}'"
            ))),
        }
    }

    fn health_response(&self) -> Response<Bytes> {
        JsonResponse::new(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }))
        .into_response()
    }
}

/// Converts a pipeline error into its HTTP response.
#[must_use]
pub fn error_response(error: &ApiError) -> Response<Bytes> {
    match error {
        ApiError::Validation { .. } => JsonResponse::new(error.to_envelope())
            .with_status(error.status_code())
            .into_response(),
        _ => error_page(error.status_code(), &error.to_string()),
    }
}
