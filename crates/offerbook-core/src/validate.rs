//! Rule-table validation for submitted offers.
//!
//! Every rule is checked and every violation collected; the pipeline needs
//! the full error set for user-facing form correction, not just the first
//! problem. The same draft always yields the same error set.

use serde_json::Value;

use crate::error::FieldErrors;
use crate::offer::OfferDraft;

/// The shape a field must have.
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    /// A JSON number within the inclusive bounds.
    Number {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// A string whose character count is within the inclusive bounds.
    Text {
        /// Minimum length in characters.
        min_len: usize,
        /// Maximum length in characters.
        max_len: usize,
    },
}

/// A single entry in the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Draft field the rule applies to.
    pub field: &'static str,
    /// Expected shape and bounds.
    pub kind: RuleKind,
    /// Whether an absent field is a violation.
    pub required: bool,
}

/// The fixed rule table applied to every create request.
pub const RULES: &[Rule] = &[
    Rule {
        field: "name",
        kind: RuleKind::Text {
            min_len: 1,
            max_len: 120,
        },
        required: false,
    },
    Rule {
        field: "address",
        kind: RuleKind::Text {
            min_len: 1,
            max_len: 500,
        },
        required: true,
    },
    Rule {
        field: "price",
        kind: RuleKind::Number {
            min: 0.0,
            max: 100_000.0,
        },
        required: true,
    },
    Rule {
        field: "rooms",
        kind: RuleKind::Number {
            min: 0.0,
            max: 1_000.0,
        },
        required: true,
    },
    Rule {
        field: "guests",
        kind: RuleKind::Number {
            min: 1.0,
            max: 100.0,
        },
        required: true,
    },
];

/// Checks a draft against [`RULES`], accumulating every violation.
///
/// The returned set is empty if and only if the draft is valid.
#[must_use]
pub fn validate(draft: &OfferDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for rule in RULES {
        match draft.get(rule.field) {
            None => {
                if rule.required {
                    errors.add(rule.field, "is required");
                }
            }
            Some(value) => check_value(rule, value, &mut errors),
        }
    }

    errors
}

fn check_value(rule: &Rule, value: &Value, errors: &mut FieldErrors) {
    match rule.kind {
        RuleKind::Number { min, max } => match value.as_f64() {
            Some(number) => {
                if number < min || number > max {
                    errors.add(rule.field, format!("must be between {min} and {max}"));
                }
            }
            None => errors.add(rule.field, "must be a number"),
        },
        RuleKind::Text { min_len, max_len } => match value.as_str() {
            Some(text) => {
                let length = text.chars().count();
                if length < min_len || length > max_len {
                    errors.add(
                        rule.field,
                        format!("must be between {min_len} and {max_len} characters long"),
                    );
                }
            }
            None => errors.add(rule.field, "must be text"),
        },
    }
}
