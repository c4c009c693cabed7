use image::DynamicImage;
use log::debug;
use std::time::Duration;

/// Advisory timeout for the branding fetch
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Fetch and decode the branding logo, best effort
///
/// The logo is page decoration only, so every failure mode (network,
/// non-success status, timeout, undecodable payload) is reported as an
/// error string for the caller to log; generation proceeds without it.
pub fn fetch_logo(url: &str, timeout: Duration) -> Result<DynamicImage, String> {
    debug!("Fetching branding logo from {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| e.to_string())?;

    let response = client.get(url).send().map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("unexpected status {}", response.status()));
    }

    let bytes = response.bytes().map_err(|e| e.to_string())?;
    image::load_from_memory(&bytes).map_err(|e| format!("logo is not a decodable image: {}", e))
}
