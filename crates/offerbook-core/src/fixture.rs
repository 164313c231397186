//! Fixture generation and the read-only offer store.
//!
//! The store is built once at startup and injected wherever the handlers
//! need it; nothing mutates it afterwards, so concurrent reads need no
//! locking. Create requests never append to it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geo;
use crate::names::DEFAULT_NAMES;
use crate::offer::Offer;

/// Default number of generated fixture entries, and the default page limit.
pub const DEFAULT_MAX_QUANTITY: usize = 20;

/// Known lookup keys pinned onto the first fixture entries so integration
/// tests and manual requests have stable dates to hit.
const PINNED_DATES: [i64; 9] = [111, 222, 333, 444, 555, 666, 777, 888, 999];

const STREETS: &[&str] = &[
    "Harbour street",
    "Sadovaya street",
    "Lesnaya street",
    "Mira avenue",
    "Pervomayskaya street",
    "Zheleznodorozhnaya street",
];

/// The read-only in-memory offer collection.
#[derive(Debug, Clone)]
pub struct OfferStore {
    offers: Vec<Offer>,
}

impl OfferStore {
    /// Generates a store of `count` random offers.
    ///
    /// The first nine entries (fewer if `count` is smaller) get the pinned
    /// dates 111 through 999.
    #[must_use]
    pub fn generate(count: usize) -> Self {
        Self::generate_with(count, &mut rand::thread_rng())
    }

    /// As [`OfferStore::generate`], with an injected source of randomness.
    #[must_use]
    pub fn generate_with<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut offers: Vec<Offer> = (0..count).map(|_| generate_offer(rng)).collect();
        for (offer, date) in offers.iter_mut().zip(PINNED_DATES) {
            offer.date = date;
        }
        Self { offers }
    }

    /// Builds a store from pre-made offers. Useful in tests.
    #[must_use]
    pub fn from_offers(offers: Vec<Offer>) -> Self {
        Self { offers }
    }

    /// Returns the number of offers in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Returns `true` if the store holds no offers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Returns the slice `[skip, skip + limit)`, clipped to the store.
    #[must_use]
    pub fn page(&self, skip: usize, limit: usize) -> &[Offer] {
        if skip >= self.offers.len() {
            return &[];
        }
        let end = skip.saturating_add(limit).min(self.offers.len());
        &self.offers[skip..end]
    }

    /// Returns the first offer with the given date, if any.
    #[must_use]
    pub fn find_by_date(&self, date: i64) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.date == date)
    }

    /// Returns all offers in fixture order.
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }
}

fn generate_offer<R: Rng + ?Sized>(rng: &mut R) -> Offer {
    let name = DEFAULT_NAMES
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_NAMES[0])
        .to_string();
    let street = STREETS.choose(rng).copied().unwrap_or(STREETS[0]);
    let address = format!("{} {}", rng.gen_range(1..=120), street);
    let location = geo::locate(&address);

    Offer {
        date: rng.gen_range(1_540_000_000..1_600_000_000),
        name,
        price: f64::from(rng.gen_range(1_000..=100_000)),
        rooms: rng.gen_range(0..=5),
        guests: rng.gen_range(1..=10),
        address,
        location,
        avatar: None,
        preview: None,
    }
}
