//! An Rothar Nua regional bike share API (Cork, Limerick, Galway).
//!
//! The station list is a form-encoded POST carrying the API key and a scheme
//! identifier. Keys are only issued on request to An Rothar Nua.

pub const BASE_URL: &str = "https://data.bikeshare.ie/dataapi/resources/station/data/list";

/// Valid scheme IDs: -1 = all cities, 2 = Cork, 3 = Limerick, 4 = Galway.
pub const VALID_SCHEME_IDS: [&str; 4] = ["-1", "2", "3", "4"];

pub fn is_valid_scheme(scheme: &str) -> bool {
    VALID_SCHEME_IDS.contains(&scheme)
}

/// Form body for the station-list request.
pub fn station_list_form(api_key: &str, scheme: &str) -> [(&'static str, String); 2] {
    [
        ("key", api_key.to_string()),
        ("schemeId", scheme.to_string()),
    ]
}
