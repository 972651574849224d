use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Coordinate, Locale};

/// One form submission: a date, a validated coordinate, and the UI
/// locale in effect at submit time.
///
/// Immutable once built and discarded after the request cycle
/// completes; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TravelQuery {
    pub date: NaiveDate,
    pub coordinate: Coordinate,
    pub locale: Locale,
}

impl TravelQuery {
    #[must_use]
    pub const fn new(date: NaiveDate, coordinate: Coordinate, locale: Locale) -> Self {
        Self {
            date,
            coordinate,
            locale,
        }
    }

    /// Only the year is significant to the narrative.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Human-readable place name derived from a coordinate.
///
/// Either field may be absent; that degrades prompt quality but is
/// never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLabel {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Terminal outcome of one narrative generation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeResult {
    /// The model's first completion text, verbatim.
    Text(String),
    /// Generic user-facing reason; upstream detail stays in the log.
    Failure(String),
}
