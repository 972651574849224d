use timemarker_core::{NarrativeResult, TravelQuery};
use timemarker_geocode::ReverseGeocoder;

use crate::client::InferenceClient;
use crate::prompt::compose_prompt;

/// Generic user-facing reason for any failed generation attempt.
pub const FETCH_FAILED: &str = "fetch failed";

/// Orchestrates one narrative request cycle: best-effort geocoding,
/// prompt composition, and a single inference attempt.
pub struct NarrativeGenerator {
    geocoder: ReverseGeocoder,
    inference: InferenceClient,
}

impl NarrativeGenerator {
    #[must_use]
    pub const fn new(geocoder: ReverseGeocoder, inference: InferenceClient) -> Self {
        Self {
            geocoder,
            inference,
        }
    }

    /// Runs one generation cycle for `query`.
    ///
    /// Geocoding failure degrades to an empty place label and never
    /// blocks the inference call. Inference failure of any kind is
    /// logged with its root cause and collapsed to
    /// [`NarrativeResult::Failure`] with the generic reason; nothing
    /// upstream-specific escapes to the caller. The model text comes
    /// back verbatim, with no post-processing or truncation.
    pub async fn generate(&self, query: &TravelQuery) -> NarrativeResult {
        let label = self
            .geocoder
            .resolve(query.coordinate)
            .await
            .unwrap_or_default();

        let prompt = compose_prompt(query, &label);

        match self.inference.complete(&prompt).await {
            Ok(text) => NarrativeResult::Text(text),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    year = query.year(),
                    locale = query.locale.code(),
                    "narrative generation failed"
                );
                NarrativeResult::Failure(FETCH_FAILED.to_string())
            }
        }
    }
}
