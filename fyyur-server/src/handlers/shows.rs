use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::Show;
use crate::utils::error::AppError;
use crate::utils::response::success;

const START_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M";

#[derive(Debug, FromRow)]
pub struct ShowRecord {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<ShowRecord> for ShowListing {
    fn from(record: ShowRecord) -> Self {
        Self {
            venue_id: record.venue_id,
            venue_name: record.venue_name,
            artist_id: record.artist_id,
            artist_name: record.artist_name,
            artist_image_link: record.artist_image_link,
            start_time: record.start_time.format(START_TIME_FORMAT).to_string(),
        }
    }
}

pub async fn list_shows(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let records = sqlx::query_as::<_, ShowRecord>(
        "SELECT s.venue_id, v.name AS venue_name, s.artist_id, a.name AS artist_name, \
                a.image_link AS artist_image_link, s.start_time \
         FROM shows s \
         JOIN venues v ON v.id = s.venue_id \
         JOIN artists a ON a.id = s.artist_id \
         ORDER BY s.start_time DESC",
    )
    .fetch_all(&pool)
    .await?;

    let shows: Vec<ShowListing> = records.into_iter().map(ShowListing::from).collect();
    Ok(success(shows, "All shows").into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Referenced venue and artist are not pre-checked; an absent parent
/// surfaces as a foreign-key violation from the store.
pub async fn create_show(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateShow>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let show = sqlx::query_as::<_, Show>(
        "INSERT INTO shows (venue_id, artist_id, start_time) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(payload.venue_id)
    .bind(payload.artist_id)
    .bind(payload.start_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::constraint(e, "An error occurred. Show could not be listed."))?;
    tx.commit().await?;

    Ok(success(show, "Show was successfully listed!").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn listing_formats_the_start_time() {
        let record = ShowRecord {
            venue_id: 1,
            venue_name: "The Musical Hop".to_string(),
            artist_id: 4,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: None,
            start_time: Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap(),
        };

        let listing = ShowListing::from(record);
        assert_eq!(listing.start_time, "04/01/2035, 20:00");
    }

    #[test]
    fn create_show_requires_both_parent_ids() {
        let result: Result<CreateShow, _> = serde_json::from_value(serde_json::json!({
            "venue_id": 1,
            "start_time": "2035-04-01T20:00:00Z"
        }));
        assert!(result.is_err());
    }
}
