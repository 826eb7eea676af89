//! Nextbike live map API. No key required.
//!
//! Cities are addressed by their numeric Nextbike ID (Belfast is 238).

const BASE_URL: &str = "https://api.nextbike.net/maps/nextbike-live.json";

/// Build the live-data URL for one city:
/// `https://api.nextbike.net/maps/nextbike-live.json?city={city}`
pub fn live_url(city: &str) -> String {
    format!("{BASE_URL}?city={}", urlencoding::encode(city))
}
