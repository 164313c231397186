//! Offer data model.
//!
//! Three representations flow through the pipeline:
//!
//! - [`Offer`] is a fixture entry served by the read endpoints.
//! - [`OfferDraft`] is the untyped intermediate for create requests. Fields
//!   arrive as JSON values so that string-or-number input survives to the
//!   coercion and validation stages.
//! - [`OfferSubmission`] is the typed result of a successful create: the
//!   draft after validation, with the derived location attached. It is
//!   echoed to the client and never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A coordinate pair on the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

/// A fixture entry: a fully-formed offer record.
///
/// `date` acts as the primary key within the fixture. It is not guaranteed
/// unique; lookups return the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Lookup key within the fixture.
    pub date: i64,
    /// Display name of the offer.
    pub name: String,
    /// Price in whole currency units.
    pub price: f64,
    /// Number of rooms.
    pub rooms: i64,
    /// Guest capacity.
    pub guests: i64,
    /// Free-text address.
    pub address: String,
    /// Coordinates derived from the address.
    pub location: Location,
    /// Uploaded avatar filename, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Uploaded preview filename, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Field names of the draft value slots, in rule-table order.
pub const DRAFT_FIELDS: &[&str] = &["name", "address", "price", "rooms", "guests"];

/// Untyped intermediate record for create requests.
///
/// Each value slot holds whatever JSON (or form text) the client submitted,
/// so the validator can report type violations instead of the deserializer
/// rejecting the whole body. Attachment filenames are copied in by the
/// multipart layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferDraft {
    /// Submitted name, if any.
    pub name: Option<Value>,
    /// Submitted price, string or number.
    pub price: Option<Value>,
    /// Submitted room count, string or number.
    pub rooms: Option<Value>,
    /// Submitted guest capacity, string or number.
    pub guests: Option<Value>,
    /// Submitted address.
    pub address: Option<Value>,
    /// Original filename of the uploaded avatar.
    #[serde(skip)]
    pub avatar: Option<String>,
    /// Original filename of the uploaded preview.
    #[serde(skip)]
    pub preview: Option<String>,
}

impl OfferDraft {
    /// Returns the submitted value for a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.slot(field).and_then(Option::as_ref)
    }

    /// Sets a value slot by field name.
    ///
    /// Returns `false` (and leaves the draft untouched) for unknown fields;
    /// the typed intermediate carries only the fields the rule table knows.
    pub fn set(&mut self, field: &str, value: Value) -> bool {
        match self.slot_mut(field) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Returns the submitted address as text, if it is a string.
    #[must_use]
    pub fn address_text(&self) -> Option<&str> {
        self.address.as_ref().and_then(Value::as_str)
    }

    fn slot(&self, field: &str) -> Option<&Option<Value>> {
        match field {
            "name" => Some(&self.name),
            "price" => Some(&self.price),
            "rooms" => Some(&self.rooms),
            "guests" => Some(&self.guests),
            "address" => Some(&self.address),
            _ => None,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: &str) -> Option<&mut Option<Value>> {
        match field {
            "name" => Some(&mut self.name),
            "price" => Some(&mut self.price),
            "rooms" => Some(&mut self.rooms),
            "guests" => Some(&mut self.guests),
            "address" => Some(&mut self.address),
            _ => None,
        }
    }

    /// Converts a validated draft into a typed submission.
    ///
    /// Call only after the validator reported an empty error set; a draft
    /// that still holds missing or mistyped fields produces an internal
    /// error rather than a panic.
    pub fn into_submission(self, location: Location) -> Result<OfferSubmission, ApiError> {
        let name = match self.name {
            Some(Value::String(s)) => s,
            _ => return Err(draft_conversion_error("name")),
        };
        let address = match self.address {
            Some(Value::String(s)) => s,
            _ => return Err(draft_conversion_error("address")),
        };
        let price = self
            .price
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| draft_conversion_error("price"))?;
        let rooms = integer_field(self.rooms.as_ref()).ok_or_else(|| draft_conversion_error("rooms"))?;
        let guests =
            integer_field(self.guests.as_ref()).ok_or_else(|| draft_conversion_error("guests"))?;

        Ok(OfferSubmission {
            name,
            price,
            rooms,
            guests,
            address,
            location,
            avatar: self.avatar,
            preview: self.preview,
        })
    }
}

fn integer_field(value: Option<&Value>) -> Option<i64> {
    let number = value?.as_f64()?;
    Some(number as i64)
}

fn draft_conversion_error(field: &str) -> ApiError {
    ApiError::internal(format!(
        "field '{field}' failed typed conversion after validation"
    ))
}

/// The typed record returned by a successful create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSubmission {
    /// Offer name, submitted or pool-assigned.
    pub name: String,
    /// Price, coerced to a number.
    pub price: f64,
    /// Number of rooms.
    pub rooms: i64,
    /// Guest capacity.
    pub guests: i64,
    /// Free-text address.
    pub address: String,
    /// Coordinates derived from the address.
    pub location: Location,
    /// Uploaded avatar filename, echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Uploaded preview filename, echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}
