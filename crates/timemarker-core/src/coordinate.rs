use serde::Serialize;
use thiserror::Error;

/// Validation failure for a manually entered coordinate pair.
///
/// The messages are the field-level texts shown next to the form
/// input, so they stay user-facing rather than diagnostic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Latitude must be between -90° and 90°")]
    LatitudeOutOfRange,
    #[error("Longitude must be between -180° and 180°")]
    LongitudeOutOfRange,
}

impl CoordinateError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::LatitudeOutOfRange => "latitude",
            Self::LongitudeOutOfRange => "longitude",
        }
    }
}

/// A WGS84 point, guaranteed in range and finite.
///
/// Fields are private so every value goes through [`Coordinate::new`]
/// (rejecting) or [`Coordinate::clamped`] (coercing); nothing
/// downstream ever sees NaN or an out-of-range axis. There is
/// deliberately no `Deserialize` impl — wire types carry raw floats
/// and validate at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Starting position of the form before any source has written
    /// (41°N, 12°E).
    pub const DEFAULT: Self = Self {
        latitude: 41.0,
        longitude: 12.0,
    };

    /// Validates a raw pair, rejecting anything out of range or
    /// non-finite.
    ///
    /// # Errors
    ///
    /// Returns the bounds-specific [`CoordinateError`] for the first
    /// failing axis, latitude checked first.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Coerces a raw pair into range instead of rejecting it.
    ///
    /// Map-click coordinates come from a projection and can fall
    /// slightly outside the globe, so each axis is clamped. A NaN
    /// axis falls back to the default position for that axis.
    #[must_use]
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let latitude = if latitude.is_nan() {
            Self::DEFAULT.latitude
        } else {
            latitude.clamp(-90.0, 90.0)
        };
        let longitude = if longitude.is_nan() {
            Self::DEFAULT.longitude
        } else {
            longitude.clamp(-180.0, 180.0)
        };
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Failure acquiring a position from a [`LocationSource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The platform capability errored; the message is what the
    /// capability reported and is shown to the user verbatim.
    #[error("{0}")]
    Unavailable(String),
}

/// A platform capability that can report the device's position.
///
/// The browser geolocation API, an IP-geolocation lookup, or a test
/// stub all fit this shape. `is_supported` lets the resolver signal
/// "not supported" without attempting an acquisition.
pub trait LocationSource {
    fn is_supported(&self) -> bool;

    /// Acquires the current position as a raw `(latitude, longitude)`
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] with the capability's own message on
    /// denial or lookup failure.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<(f64, f64), LocationError>> + Send;
}

/// Outcome of one device-location acquisition, surfaced to the user
/// as a transient notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationNotice {
    Acquired { latitude: f64, longitude: f64 },
    Failed { message: String },
    NotSupported,
}

/// The single authoritative coordinate behind the form.
///
/// Three sources feed it — manual input, device location, map click —
/// and they are mutually overriding: last write wins, values are
/// never merged. Each source applies its own policy (manual input
/// rejects bad values, the other two clamp) before the write lands.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateResolver {
    current: Coordinate,
}

impl CoordinateResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Coordinate::DEFAULT,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Coordinate {
        self.current
    }

    /// Applies a manually typed pair.
    ///
    /// # Errors
    ///
    /// Out-of-range or non-finite input returns the field-level
    /// [`CoordinateError`] and leaves the authoritative value
    /// untouched.
    pub fn set_from_manual_input(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Coordinate, CoordinateError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.current = coordinate;
        Ok(coordinate)
    }

    /// Applies a map click, clamping rather than rejecting.
    pub fn set_from_map_click(&mut self, latitude: f64, longitude: f64) -> Coordinate {
        let coordinate = Coordinate::clamped(latitude, longitude);
        self.current = coordinate;
        coordinate
    }

    /// Acquires the device position from `source` and overwrites the
    /// authoritative value on success.
    ///
    /// Unsupported platforms short-circuit to
    /// [`LocationNotice::NotSupported`] without an acquisition
    /// attempt; acquisition errors become [`LocationNotice::Failed`]
    /// carrying the capability's message and leave the coordinate
    /// unchanged.
    pub async fn set_from_device_location<S: LocationSource>(
        &mut self,
        source: &S,
    ) -> LocationNotice {
        if !source.is_supported() {
            return LocationNotice::NotSupported;
        }
        match source.current_position().await {
            Ok((latitude, longitude)) => {
                let coordinate = Coordinate::clamped(latitude, longitude);
                self.current = coordinate;
                LocationNotice::Acquired {
                    latitude: coordinate.latitude(),
                    longitude: coordinate.longitude(),
                }
            }
            Err(e) => LocationNotice::Failed {
                message: e.to_string(),
            },
        }
    }
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::new()
    }
}
