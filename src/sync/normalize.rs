//! Per-operator payload normalization.
//!
//! Each operator returns a differently shaped payload: the entity list sits at
//! a different nesting depth and the location fields use different names.
//! [`extract`] unwraps the nesting and [`pointify`] rewrites the location
//! fields into one canonical point representation.

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::providers::Operator;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Upstream payload is missing `{0}`")]
    MissingField(String),
    #[error("Upstream payload field `{field}` is not {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

/// Unwrap the operator-specific nesting around the entity list.
///
/// JC Decaux and Bleeper Bikes payloads are already flat arrays. An Rothar
/// Nua nests its list under `data`. Nextbike nests three levels deep under
/// `countries[0].cities[0].places`; when the upstream returns more than one
/// country or city for a single city query, the first is taken and a warning
/// is logged.
pub fn extract(operator: Operator, payload: &Value) -> Result<Vec<Map<String, Value>>, PayloadError> {
    let list = match operator {
        Operator::JcDecaux | Operator::BleeperBikes => payload,
        Operator::AnRotharNua => payload
            .get("data")
            .ok_or_else(|| PayloadError::MissingField("data".to_string()))?,
        Operator::Nextbike => nextbike_places(payload)?,
    };

    let entries = list.as_array().ok_or(PayloadError::WrongType {
        field: "entity list".to_string(),
        expected: "an array",
    })?;

    entries
        .iter()
        .map(|entry| {
            entry.as_object().cloned().ok_or(PayloadError::WrongType {
                field: "entity".to_string(),
                expected: "an object",
            })
        })
        .collect()
}

fn nextbike_places(payload: &Value) -> Result<&Value, PayloadError> {
    let countries = payload
        .get("countries")
        .and_then(Value::as_array)
        .ok_or_else(|| PayloadError::MissingField("countries".to_string()))?;
    if countries.len() > 1 {
        warn!(
            countries = countries.len(),
            "Nextbike returned multiple countries for one city query; taking the first"
        );
    }
    let country = countries
        .first()
        .ok_or_else(|| PayloadError::MissingField("countries[0]".to_string()))?;

    let cities = country
        .get("cities")
        .and_then(Value::as_array)
        .ok_or_else(|| PayloadError::MissingField("cities".to_string()))?;
    if cities.len() > 1 {
        warn!(
            cities = cities.len(),
            "Nextbike returned multiple cities for one city query; taking the first"
        );
    }
    cities
        .first()
        .ok_or_else(|| PayloadError::MissingField("cities[0]".to_string()))?
        .get("places")
        .ok_or_else(|| PayloadError::MissingField("places".to_string()))
}

/// Rewrite the operator's raw location fields into the canonical point form
/// `{"kind": "Point", "coordinates": [longitude, latitude]}` (longitude
/// first). Returns a new entity; any prior `position` content is overwritten
/// and the input is left untouched.
pub fn pointify(
    operator: Operator,
    entity: &Map<String, Value>,
) -> Result<Map<String, Value>, PayloadError> {
    let (latitude, longitude) = match operator {
        Operator::JcDecaux => {
            let position = entity
                .get("position")
                .and_then(Value::as_object)
                .ok_or_else(|| PayloadError::MissingField("position".to_string()))?;
            (number_field(position, "lat")?, number_field(position, "lng")?)
        }
        Operator::AnRotharNua | Operator::BleeperBikes => (
            number_field(entity, "latitude")?,
            number_field(entity, "longitude")?,
        ),
        Operator::Nextbike => (number_field(entity, "lat")?, number_field(entity, "lng")?),
    };

    let mut normalized = entity.clone();
    normalized.insert(
        "position".to_string(),
        json!({ "kind": "Point", "coordinates": [longitude, latitude] }),
    );
    Ok(normalized)
}

fn number_field(object: &Map<String, Value>, key: &str) -> Result<f64, PayloadError> {
    match object.get(key) {
        Some(value) => value.as_f64().ok_or_else(|| PayloadError::WrongType {
            field: key.to_string(),
            expected: "a number",
        }),
        None => Err(PayloadError::MissingField(key.to_string())),
    }
}
