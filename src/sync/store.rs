//! Idempotent persistence of normalized entities, one table per operator.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::normalize::PayloadError;
use super::{UpdateError, UpdateSummary};
use crate::providers::Operator;

/// Insert or replace every entity in the operator's table, keyed on the
/// operator's identity field.
///
/// The whole batch runs in a single transaction: a failure on any entity
/// rolls back the batch and no partial summary is returned. Counting
/// convention (pinned and tested): a fresh insert increments neither counter;
/// an identity match increments `matched`; a content change additionally
/// increments `modified`.
pub async fn upsert(
    pool: &SqlitePool,
    operator: Operator,
    entities: &[Map<String, Value>],
) -> Result<UpdateSummary, UpdateError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| UpdateError::Database(e.to_string()))?;

    let mut summary = UpdateSummary::default();

    for entity in entities {
        let key = identity_key(operator, entity)?;
        let document = Value::Object(entity.clone()).to_string();

        let stored: Option<String> = sqlx::query_scalar(&format!(
            "SELECT document FROM {} WHERE entity_key = ?",
            operator.tag()
        ))
        .bind(&key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| UpdateError::Database(e.to_string()))?;

        match stored.as_deref() {
            Some(existing) if existing == document => {
                summary.matched += 1;
                continue;
            }
            Some(_) => {
                summary.matched += 1;
                summary.modified += 1;
            }
            None => {}
        }

        let (longitude, latitude) = point_coordinates(entity);

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (entity_key, longitude, latitude, document, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(entity_key) DO UPDATE SET
                longitude = excluded.longitude,
                latitude = excluded.latitude,
                document = excluded.document,
                updated_at = excluded.updated_at
            "#,
            operator.tag()
        ))
        .bind(&key)
        .bind(longitude)
        .bind(latitude)
        .bind(&document)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| UpdateError::Database(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| UpdateError::Database(e.to_string()))?;

    Ok(summary)
}

/// Canonical text form of the entity's identity value: JSON strings as-is,
/// JSON numbers in their JSON text form.
fn identity_key(operator: Operator, entity: &Map<String, Value>) -> Result<String, PayloadError> {
    let field = operator.identity_field();
    match entity.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(PayloadError::WrongType {
            field: field.to_string(),
            expected: "a string or number",
        }),
        None => Err(PayloadError::MissingField(field.to_string())),
    }
}

fn point_coordinates(entity: &Map<String, Value>) -> (Option<f64>, Option<f64>) {
    let coordinates = entity
        .get("position")
        .and_then(|position| position.get("coordinates"))
        .and_then(Value::as_array);

    match coordinates {
        Some(pair) => (
            pair.first().and_then(Value::as_f64),
            pair.get(1).and_then(Value::as_f64),
        ),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    // sqlite::memory: gives every pool connection its own database, so the
    // test pool is capped at a single connection.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn entity(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn station(frame_id: &str, bikes: i64) -> Map<String, Value> {
        entity(json!({
            "frame_id": frame_id,
            "battery": bikes,
            "position": { "kind": "Point", "coordinates": [-6.2, 53.3] }
        }))
    }

    async fn row_count(pool: &SqlitePool, operator: Operator) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", operator.tag()))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_counts_neither_matched_nor_modified() {
        let pool = test_pool().await;
        let summary = upsert(&pool, Operator::BleeperBikes, &[station("abc", 90)])
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 0, modified: 0 });
        assert_eq!(row_count(&pool, Operator::BleeperBikes).await, 1);
    }

    #[tokio::test]
    async fn inserted_document_equals_the_entity() {
        let pool = test_pool().await;
        let e = station("abc", 90);
        upsert(&pool, Operator::BleeperBikes, &[e.clone()]).await.unwrap();

        let document: String =
            sqlx::query_scalar("SELECT document FROM bleeper_bikes WHERE entity_key = ?")
                .bind("abc")
                .fetch_one(&pool)
                .await
                .unwrap();
        let restored: Value = serde_json::from_str(&document).unwrap();
        assert_eq!(restored, Value::Object(e));
    }

    #[tokio::test]
    async fn unchanged_reupsert_is_matched_not_modified() {
        let pool = test_pool().await;
        let e = station("abc", 90);
        upsert(&pool, Operator::BleeperBikes, &[e.clone()]).await.unwrap();

        let summary = upsert(&pool, Operator::BleeperBikes, &[e]).await.unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 0 });
        assert_eq!(row_count(&pool, Operator::BleeperBikes).await, 1);
    }

    #[tokio::test]
    async fn changed_reupsert_replaces_the_record() {
        let pool = test_pool().await;
        upsert(&pool, Operator::BleeperBikes, &[station("abc", 90)])
            .await
            .unwrap();

        let summary = upsert(&pool, Operator::BleeperBikes, &[station("abc", 35)])
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 1 });
        assert_eq!(row_count(&pool, Operator::BleeperBikes).await, 1);

        let document: String =
            sqlx::query_scalar("SELECT document FROM bleeper_bikes WHERE entity_key = ?")
                .bind("abc")
                .fetch_one(&pool)
                .await
                .unwrap();
        let restored: Value = serde_json::from_str(&document).unwrap();
        assert_eq!(restored["battery"], json!(35));
    }

    #[tokio::test]
    async fn numeric_identity_is_canonicalized_to_text() {
        let pool = test_pool().await;
        let e = entity(json!({ "uid": 1001, "lat": 54.6, "lng": -5.9 }));
        upsert(&pool, Operator::Nextbike, &[e]).await.unwrap();

        let key: String = sqlx::query_scalar("SELECT entity_key FROM nextbike")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(key, "1001");
    }

    #[tokio::test]
    async fn coordinates_are_stored_in_dedicated_columns() {
        let pool = test_pool().await;
        upsert(&pool, Operator::BleeperBikes, &[station("abc", 90)])
            .await
            .unwrap();

        let (longitude, latitude): (f64, f64) =
            sqlx::query_as("SELECT longitude, latitude FROM bleeper_bikes WHERE entity_key = ?")
                .bind("abc")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(longitude, -6.2);
        assert_eq!(latitude, 53.3);
    }

    #[tokio::test]
    async fn missing_identity_rolls_back_the_whole_batch() {
        let pool = test_pool().await;
        let good = station("abc", 90);
        let bad = entity(json!({ "latitude": 53.3, "longitude": -6.2 }));

        let result = upsert(&pool, Operator::BleeperBikes, &[good, bad]).await;
        assert!(result.is_err());
        assert_eq!(row_count(&pool, Operator::BleeperBikes).await, 0);
    }
}
