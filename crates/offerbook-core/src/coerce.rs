//! Best-effort string-to-number field coercion.
//!
//! Form input arrives with every value as a string. Before validation, the
//! designated numeric fields are re-parsed so the rule table sees numbers
//! where the client meant numbers. The transform is total: fields that are
//! absent, already numeric, or not parseable are left untouched and the
//! validator reports the latter.

use serde_json::Value;

use crate::offer::OfferDraft;

/// The draft fields coerced before validation.
pub const NUMERIC_FIELDS: &[&str] = &["price", "rooms", "guests"];

/// Replaces each named string field containing a valid number with its
/// numeric parse. Integer parses are preferred; floats are the fallback.
pub fn cast_to_number(draft: &mut OfferDraft, fields: &[&str]) {
    for &field in fields {
        let Some(slot) = draft.slot_mut(field) else {
            continue;
        };
        let Some(Value::String(raw)) = slot else {
            continue;
        };

        let parsed = parse_number(raw.trim());
        if let Some(number) = parsed {
            *slot = Some(number);
        }
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .map(Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft_with(field: &str, value: Value) -> OfferDraft {
        let mut draft = OfferDraft::default();
        draft.set(field, value);
        draft
    }

    #[test]
    fn test_casts_integer_strings() {
        let mut draft = draft_with("rooms", json!("3"));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.rooms, Some(json!(3)));
    }

    #[test]
    fn test_casts_float_strings() {
        let mut draft = draft_with("price", json!("4999.5"));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.price, Some(json!(4999.5)));
    }

    #[test]
    fn test_trims_whitespace() {
        let mut draft = draft_with("guests", json!("  7 "));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.guests, Some(json!(7)));
    }

    #[test]
    fn test_noop_on_already_numeric_fields() {
        let mut draft = draft_with("price", json!(1500));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.price, Some(json!(1500)));
    }

    #[test]
    fn test_noop_on_absent_fields() {
        let mut draft = OfferDraft::default();
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert!(draft.price.is_none());
        assert!(draft.rooms.is_none());
        assert!(draft.guests.is_none());
    }

    #[test]
    fn test_leaves_non_numeric_strings_for_the_validator() {
        let mut draft = draft_with("price", json!("cheap"));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.price, Some(json!("cheap")));
    }

    #[test]
    fn test_only_listed_fields_are_touched() {
        let mut draft = draft_with("address", json!("42"));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.address, Some(json!("42")));
    }

    #[test]
    fn test_rejects_non_finite_floats() {
        let mut draft = draft_with("price", json!("inf"));
        cast_to_number(&mut draft, NUMERIC_FIELDS);
        assert_eq!(draft.price, Some(json!("inf")));
    }
}
