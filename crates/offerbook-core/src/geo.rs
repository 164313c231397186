//! Address-to-coordinates resolution.
//!
//! The resolver is not a geocoder: it hashes the address text into the map
//! viewport so that identical addresses land on identical coordinates.
//!
//! Determinism policy: within one process run the mapping is a pure
//! function of the input. `DefaultHasher` does not promise the same output
//! across Rust releases, so exact coordinate values are not stable across
//! builds and callers must not depend on them.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use crate::offer::Location;

/// Horizontal bounds of the map viewport.
pub const X_BOUNDS: RangeInclusive<i32> = 300..=900;

/// Vertical bounds of the map viewport.
pub const Y_BOUNDS: RangeInclusive<i32> = 150..=500;

/// Derives viewport coordinates from an address string.
#[must_use]
pub fn locate(address: &str) -> Location {
    let mut hasher = DefaultHasher::new();
    address.hash(&mut hasher);
    let hash = hasher.finish();

    let x_span = (X_BOUNDS.end() - X_BOUNDS.start() + 1) as u64;
    let y_span = (Y_BOUNDS.end() - Y_BOUNDS.start() + 1) as u64;

    Location {
        x: X_BOUNDS.start() + (hash % x_span) as i32,
        y: Y_BOUNDS.start() + ((hash / x_span) % y_span) as i32,
    }
}
