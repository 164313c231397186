//! Default-name augmentation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::offer::OfferDraft;

/// The pool a nameless offer draws from.
pub const DEFAULT_NAMES: &[&str] = &[
    "Keks", "Pavel", "Nikolay", "Alex", "Ulyana", "Anastasyja", "Julia",
];

/// Assigns a pool name to a draft that lacks a non-empty `name`.
///
/// A draft whose name slot holds anything other than an empty string is
/// left untouched; mistyped names are the validator's problem.
pub fn assign_default_name(draft: &mut OfferDraft) {
    assign_default_name_with(draft, &mut rand::thread_rng());
}

/// As [`assign_default_name`], with an injected source of randomness.
pub fn assign_default_name_with<R: Rng + ?Sized>(draft: &mut OfferDraft, rng: &mut R) {
    if has_name(draft) {
        return;
    }
    let name = DEFAULT_NAMES
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_NAMES[0]);
    draft.name = Some(Value::String(name.to_string()));
}

fn has_name(draft: &OfferDraft) -> bool {
    match &draft.name {
        None => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
