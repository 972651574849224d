//! Server-side stand-in for the browser geolocation capability.
//!
//! Resolves the caller's IP address to approximate coordinates via an
//! IP-geolocation lookup. Loopback and unspecified addresses cannot
//! be located, which maps to the same "not supported" notice the form
//! shows when the platform has no geolocation at all.

use std::net::{IpAddr, SocketAddr};

use axum::{extract::ConnectInfo, http::HeaderMap, Extension, Json};
use ipgeolocate::{Locator, Service};

use timemarker_core::{CoordinateResolver, LocationError, LocationNotice, LocationSource};

use crate::middleware::RequestId;

use super::{ApiResponse, ResponseMeta};

/// [`LocationSource`] backed by an IP-geolocation lookup for one
/// client address.
pub(super) struct IpLocationSource {
    ip: IpAddr,
}

impl IpLocationSource {
    pub(super) const fn new(ip: IpAddr) -> Self {
        Self { ip }
    }
}

impl LocationSource for IpLocationSource {
    fn is_supported(&self) -> bool {
        !(self.ip.is_loopback() || self.ip.is_unspecified())
    }

    async fn current_position(&self) -> Result<(f64, f64), LocationError> {
        let located = Locator::get(&self.ip.to_string(), Service::IpApi)
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        // The lookup service reports coordinates as strings.
        let latitude = located
            .latitude
            .parse::<f64>()
            .map_err(|_| LocationError::Unavailable("malformed latitude in lookup".to_string()))?;
        let longitude = located
            .longitude
            .parse::<f64>()
            .map_err(|_| LocationError::Unavailable("malformed longitude in lookup".to_string()))?;

        Ok((latitude, longitude))
    }
}

/// Picks the client address: the first `X-Forwarded-For` entry when a
/// fronting proxy supplied one, otherwise the peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}

pub(super) async fn locate(
    Extension(req_id): Extension<RequestId>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<ApiResponse<LocationNotice>> {
    let source = IpLocationSource::new(client_ip(&headers, peer));

    let mut resolver = CoordinateResolver::new();
    let notice = resolver.set_from_device_location(&source).await;

    if let LocationNotice::Failed { ref message } = notice {
        tracing::warn!(peer = %peer, message, "ip geolocation failed");
    }

    Json(ApiResponse {
        data: notice,
        meta: ResponseMeta::new(req_id.0),
    })
}
