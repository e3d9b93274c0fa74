//! Best-effort IP-geolocation lookup.
//!
//! Fills the phone dialing code used when formatting national numbers.
//! Every failure path is silent: the caller keeps its configured default.

use serde::Deserialize;
use tracing::debug;

/// Relevant subset of the geolocation endpoint's response.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    country_calling_code: Option<String>,
}

/// Look up the dialing code for the machine's public IP.
///
/// Returns `None` on any failure - network, non-2xx, unexpected body, or
/// an endpoint that does not report a calling code.
pub(crate) async fn lookup_dial_code(client: &reqwest::Client, endpoint: &str) -> Option<String> {
    let response = match client.get(endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "geolocation lookup failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(status = %response.status(), "geolocation endpoint rejected request");
        return None;
    }

    let geo: GeoResponse = match response.json().await {
        Ok(geo) => geo,
        Err(e) => {
            debug!(error = %e, "geolocation response did not parse");
            return None;
        }
    };

    geo.country_calling_code
        .filter(|code| code.starts_with('+') && code.len() > 1)
}
