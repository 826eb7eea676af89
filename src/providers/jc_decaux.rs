//! JC Decaux self-service bike API (dublinbikes and other contracts).
//!
//! Stations are fetched per contract, i.e. per town or city where a scheme
//! operates. An API key is required; see <https://developer.jcdecaux.com>.

const BASE_URL: &str = "https://api.jcdecaux.com/vls/v1/";

/// Build the station-list URL for one contract:
/// `https://api.jcdecaux.com/vls/v1/stations?contract={contract}&apiKey={key}`
pub fn stations_url(contract: &str, api_key: &str) -> String {
    format!(
        "{BASE_URL}stations?contract={}&apiKey={}",
        urlencoding::encode(contract),
        urlencoding::encode(api_key)
    )
}
