use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::show::{partition_by_time, ShowWithArtist};
use crate::models::Venue;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Serialize, FromRow)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, FromRow)]
pub struct VenueLocality {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Groups venues by (city, state). Rows must arrive sorted by city and
/// state so that each locality forms one contiguous run.
fn group_by_locality(rows: Vec<VenueLocality>) -> Vec<CityGroup> {
    let mut groups: Vec<CityGroup> = Vec::new();
    for row in rows {
        let summary = VenueSummary {
            id: row.id,
            name: row.name,
        };
        match groups.last_mut() {
            Some(group) if group.city == row.city && group.state == row.state => {
                group.venues.push(summary);
            }
            _ => groups.push(CityGroup {
                city: row.city,
                state: row.state,
                venues: vec![summary],
            }),
        }
    }
    groups
}

pub async fn list_venues(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, VenueLocality>(
        "SELECT id, name, city, state FROM venues ORDER BY city, state, id",
    )
    .fetch_all(&pool)
    .await?;

    Ok(success(group_by_locality(rows), "Venues grouped by city and state").into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

pub async fn search_venues(
    State(pool): State<PgPool>,
    Json(payload): Json<SearchPayload>,
) -> Result<Response, AppError> {
    // An empty term matches every venue.
    let pattern = format!("%{}%", payload.search_term);
    let data = sqlx::query_as::<_, VenueSummary>(
        "SELECT id, name FROM venues WHERE name ILIKE $1 ORDER BY id",
    )
    .bind(&pattern)
    .fetch_all(&pool)
    .await?;

    let count = data.len();
    let results = SearchResults { count, data };
    Ok(success(results, format!("Found {} venue(s)", count)).into_response())
}

#[derive(Debug, Serialize)]
pub struct VenuePage {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ShowWithArtist>,
    pub upcoming_shows: Vec<ShowWithArtist>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub async fn show_venue(
    State(pool): State<PgPool>,
    Path(venue_id): Path<i64>,
) -> Result<Response, AppError> {
    let venue = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
        .bind(venue_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with id '{}' was not found", venue_id)))?;

    let shows = sqlx::query_as::<_, ShowWithArtist>(
        "SELECT s.id AS show_id, s.artist_id, a.name AS artist_name, \
                a.image_link AS artist_image_link, s.start_time \
         FROM shows s \
         JOIN artists a ON a.id = s.artist_id \
         WHERE s.venue_id = $1 \
         ORDER BY s.start_time",
    )
    .bind(venue_id)
    .fetch_all(&pool)
    .await?;

    let (past_shows, upcoming_shows) = partition_by_time(shows, Utc::now());

    let page = VenuePage {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        venue,
        past_shows,
        upcoming_shows,
    };
    Ok(success(page, "Venue detail").into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub address: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    // Absent in the submitted form means "not seeking".
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

pub async fn create_venue(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateVenue>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let venue = sqlx::query_as::<_, Venue>(
        "INSERT INTO venues \
           (name, city, state, address, genres, phone, image_link, facebook_link, \
            website, seeking_talent, seeking_description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.address)
    .bind(&payload.genres)
    .bind(&payload.phone)
    .bind(&payload.image_link)
    .bind(&payload.facebook_link)
    .bind(&payload.website)
    .bind(payload.seeking_talent)
    .bind(&payload.seeking_description)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        AppError::constraint(
            e,
            format!(
                "An error occurred. Venue {} could not be listed",
                payload.name
            ),
        )
    })?;
    tx.commit().await?;

    let message = format!("Venue {} was successfully listed!", venue.name);
    Ok(success(venue, message).into_response())
}

pub async fn delete_venue(
    State(pool): State<PgPool>,
    Path(venue_id): Path<i64>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM venues WHERE id = $1")
        .bind(venue_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::constraint(
                e,
                format!(
                    "An error occurred. Venue {} still has shows booked and could not be deleted",
                    venue_id
                ),
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Venue with id '{}' was not found",
            venue_id
        )));
    }
    tx.commit().await?;

    Ok(empty_success(format!("Venue {} was successfully deleted.", venue_id)).into_response())
}

pub async fn edit_venue_form(
    State(pool): State<PgPool>,
    Path(venue_id): Path<i64>,
) -> Result<Response, AppError> {
    let venue = sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
        .bind(venue_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Venue with id '{}' was not found", venue_id)))?;

    Ok(success(venue, "Current venue field values").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub genres: Option<Vec<String>>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

/// Applies only the submitted fields to the existing row; never inserts.
pub async fn edit_venue_submission(
    State(pool): State<PgPool>,
    Path(venue_id): Path<i64>,
    Json(payload): Json<UpdateVenue>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let venue = sqlx::query_as::<_, Venue>(
        "UPDATE venues SET \
           name = COALESCE($2, name), \
           city = COALESCE($3, city), \
           state = COALESCE($4, state), \
           address = COALESCE($5, address), \
           genres = COALESCE($6, genres), \
           phone = COALESCE($7, phone), \
           image_link = COALESCE($8, image_link), \
           facebook_link = COALESCE($9, facebook_link), \
           website = COALESCE($10, website), \
           seeking_talent = COALESCE($11, seeking_talent), \
           seeking_description = COALESCE($12, seeking_description) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(venue_id)
    .bind(&payload.name)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.address)
    .bind(&payload.genres)
    .bind(&payload.phone)
    .bind(&payload.image_link)
    .bind(&payload.facebook_link)
    .bind(&payload.website)
    .bind(payload.seeking_talent)
    .bind(&payload.seeking_description)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        AppError::constraint(
            e,
            format!("An error occurred. Venue {} could not be updated", venue_id),
        )
    })?
    .ok_or_else(|| AppError::NotFound(format!("Venue with id '{}' was not found", venue_id)))?;
    tx.commit().await?;

    let message = format!("Venue {} was successfully updated!", venue.name);
    Ok(success(venue, message).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locality(id: i64, name: &str, city: &str, state: &str) -> VenueLocality {
        VenueLocality {
            id,
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn venues_in_the_same_locality_share_one_group() {
        let rows = vec![
            locality(1, "The Musical Hop", "San Francisco", "CA"),
            locality(3, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            locality(2, "The Dueling Pianos Bar", "New York", "NY"),
        ];

        let groups = group_by_locality(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].city, "San Francisco");
        assert_eq!(groups[0].venues.len(), 2);
        assert_eq!(groups[1].city, "New York");
        assert_eq!(groups[1].venues.len(), 1);
    }

    #[test]
    fn same_city_name_in_two_states_forms_two_groups() {
        let rows = vec![
            locality(1, "Red Room", "Springfield", "IL"),
            locality(2, "Blue Room", "Springfield", "MO"),
        ];

        let groups = group_by_locality(rows);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn seeking_talent_defaults_to_false_when_absent() {
        let payload: CreateVenue = serde_json::from_value(json!({
            "name": "The Musical Hop",
            "city": "San Francisco",
            "state": "CA",
            "phone": "123-123-1234"
        }))
        .unwrap();

        assert!(!payload.seeking_talent);
        assert!(payload.genres.is_empty());
        assert!(payload.address.is_none());
    }

    #[test]
    fn update_payload_keeps_unsubmitted_fields_unset() {
        let payload: UpdateVenue = serde_json::from_value(json!({
            "phone": "999-999-9999"
        }))
        .unwrap();

        assert_eq!(payload.phone.as_deref(), Some("999-999-9999"));
        assert!(payload.name.is_none());
        assert!(payload.seeking_talent.is_none());
    }

    #[test]
    fn search_payload_tolerates_a_missing_term() {
        let payload: SearchPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.search_term, "");
    }
}
