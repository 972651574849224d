//! Reverse-geocoding client for Nominatim-style `/reverse` endpoints.
//!
//! Resolves a coordinate to a city/country label for prompt
//! enrichment. The lookup is best effort: the orchestration flow
//! never fails because a place name could not be resolved.

mod client;
mod error;
mod types;

pub use client::ReverseGeocoder;
pub use error::GeocodeError;
