use timemarker_core::{LocationLabel, TravelQuery};

/// Composes the single free-text prompt for one travel query.
///
/// Embeds the target language, the query's year, the whole-degree
/// coordinate, and the resolved city/country. Absent label fields
/// flow through as empty strings; a degraded place name weakens the
/// prompt but never blocks it.
#[must_use]
pub fn compose_prompt(query: &TravelQuery, label: &LocationLabel) -> String {
    let year = query.year();
    let latitude = query.coordinate.latitude().floor();
    let longitude = query.coordinate.longitude().floor();
    let city = label.city.as_deref().unwrap_or("");
    let country = label.country.as_deref().unwrap_or("");
    let language = query.locale.target_language();

    format!(
        "You are a historian in the year {year} at latitude {latitude} and longitude \
         {longitude}. The place is known today as {city}, {country}. What can you say \
         about the culture, wars, habits and other related things? If this is a future - \
         just imagine, and if not, you need to relate to real history. Don't mention \
         that you are a historian. Answer in {language}."
    )
}
