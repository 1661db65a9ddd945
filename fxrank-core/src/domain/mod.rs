//! Domain types: currencies, pairs, rate rows.

pub mod currency;
pub mod observation;

pub use currency::{Currency, Pair};
pub use observation::{EurRate, RateObservation};
