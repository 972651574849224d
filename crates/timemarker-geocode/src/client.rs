use std::time::Duration;

use reqwest::{Client, Url};

use timemarker_core::{Coordinate, LocationLabel};

use crate::error::GeocodeError;
use crate::types::ReverseResponse;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Client for a Nominatim-style reverse-geocoding endpoint.
///
/// Identifies itself with a descriptive `User-Agent` per the target
/// service's usage policy. Use [`ReverseGeocoder::new`] for
/// production or [`ReverseGeocoder::with_base_url`] to point at a
/// mock server in tests.
pub struct ReverseGeocoder {
    client: Client,
    base_url: Url,
}

impl ReverseGeocoder {
    /// Creates a new client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed, or
    /// [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join("reverse") appends a path segment rather than replacing one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Resolves a coordinate to a place label, degrading to `None` on
    /// any failure.
    ///
    /// Geocoding is enrichment only, so errors are logged for the
    /// operator and swallowed; the caller proceeds without a label.
    pub async fn resolve(&self, coordinate: Coordinate) -> Option<LocationLabel> {
        match self.reverse(coordinate).await {
            Ok(label) => Some(label),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    latitude = coordinate.latitude(),
                    longitude = coordinate.longitude(),
                    "reverse geocoding failed, continuing without place label"
                );
                None
            }
        }
    }

    /// Performs the `/reverse` lookup and maps the address fields.
    ///
    /// The city field falls back through `city`, `town`, `village`;
    /// `country` is independent. Either may be absent in the result.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the
    ///   expected JSON shape.
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<LocationLabel, GeocodeError> {
        let url = self.build_url(coordinate);

        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let address = parsed.address.unwrap_or_default();
        Ok(LocationLabel {
            city: address.city.or(address.town).or(address.village),
            country: address.country,
        })
    }

    fn build_url(&self, coordinate: Coordinate) -> Url {
        // base_url is normalised with a trailing slash, so this join
        // cannot fail for a fixed relative segment.
        let mut url = self
            .base_url
            .join("reverse")
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("lat", &coordinate.latitude().to_string());
            pairs.append_pair("lon", &coordinate.longitude().to_string());
            pairs.append_pair("format", "json");
        }
        url
    }
}
