use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use timemarker_core::{CoordinateResolver, Locale, NarrativeResult, TravelQuery};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// One form submission from the browser. The coordinate arrives as
/// raw floats and is validated here, at the trust boundary.
#[derive(Debug, Deserialize)]
pub(super) struct NewStoryRequest {
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Missing or unrecognized codes fall back to English.
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoryData {
    pub story: String,
}

pub(super) async fn create_story(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<NewStoryRequest>,
) -> Result<Json<ApiResponse<StoryData>>, ApiError> {
    let mut resolver = CoordinateResolver::new();
    let coordinate = resolver
        .set_from_manual_input(request.latitude, request.longitude)
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.field(), e.to_string()))?;

    let locale = Locale::from_code(request.locale.as_deref().unwrap_or_default());
    let query = TravelQuery::new(request.date, coordinate, locale);

    tracing::info!(
        year = query.year(),
        locale = locale.code(),
        "generating narrative"
    );

    match state.generator.generate(&query).await {
        NarrativeResult::Text(story) => Ok(Json(ApiResponse {
            data: StoryData { story },
            meta: ResponseMeta::new(req_id.0),
        })),
        NarrativeResult::Failure(reason) => Err(ApiError::new(req_id.0, "fetch_failed", reason)),
    }
}
