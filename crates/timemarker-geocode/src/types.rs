use serde::Deserialize;

/// Nominatim `/reverse` response, reduced to the fields we consume.
///
/// A successful lookup over open water or an unnamed area can come
/// back without an `address` object; that is an empty label, not an
/// error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReverseResponse {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}
