//! # Offerbook Core
//!
//! Domain logic for the Offerbook API: the offer data model, the create
//! pipeline stages (coercion, validation, name augmentation, coordinate
//! derivation) and the read-only fixture store backing the read endpoints.
//!
//! The transport layer lives in `offerbook-server`; this crate knows about
//! HTTP only through the status codes its errors map to.
//!
//! ## Create pipeline
//!
//! ```
//! use offerbook_core::{coerce, geo, names, validate, OfferDraft};
//! use serde_json::json;
//!
//! let mut draft: OfferDraft =
//!     serde_json::from_str(r#"{"price": "42000", "rooms": "3", "guests": 4,
//!                              "address": "12 Harbour street"}"#).unwrap();
//!
//! names::assign_default_name(&mut draft);
//! coerce::cast_to_number(&mut draft, coerce::NUMERIC_FIELDS);
//!
//! let errors = validate::validate(&draft);
//! assert!(errors.is_empty());
//!
//! let location = geo::locate(draft.address_text().unwrap());
//! let submission = draft.into_submission(location).unwrap();
//! assert_eq!(submission.rooms, 3);
//! ```

pub mod coerce;
pub mod error;
pub mod fixture;
pub mod geo;
pub mod names;
pub mod offer;
pub mod validate;

pub use error::{ApiError, ApiResult, ErrorDetail, ErrorEnvelope, ErrorKind, FieldErrors};
pub use fixture::{OfferStore, DEFAULT_MAX_QUANTITY};
pub use offer::{Location, Offer, OfferDraft, OfferSubmission};
