use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::handlers::venues::{SearchPayload, SearchResults};
use crate::models::show::{partition_by_time, ShowWithVenue};
use crate::models::Artist;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Serialize, FromRow)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

pub async fn list_artists(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let artists =
        sqlx::query_as::<_, ArtistSummary>("SELECT id, name FROM artists ORDER BY name")
            .fetch_all(&pool)
            .await?;

    Ok(success(artists, "All artists").into_response())
}

pub async fn search_artists(
    State(pool): State<PgPool>,
    Json(payload): Json<SearchPayload>,
) -> Result<Response, AppError> {
    // An empty term matches every artist.
    let pattern = format!("%{}%", payload.search_term);
    let data = sqlx::query_as::<_, ArtistSummary>(
        "SELECT id, name FROM artists WHERE name ILIKE $1 ORDER BY id",
    )
    .bind(&pattern)
    .fetch_all(&pool)
    .await?;

    let count = data.len();
    let results = SearchResults { count, data };
    Ok(success(results, format!("Found {} artist(s)", count)).into_response())
}

#[derive(Debug, Serialize)]
pub struct ArtistPage {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ShowWithVenue>,
    pub upcoming_shows: Vec<ShowWithVenue>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub async fn show_artist(
    State(pool): State<PgPool>,
    Path(artist_id): Path<i64>,
) -> Result<Response, AppError> {
    let artist = sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE id = $1")
        .bind(artist_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Artist with id '{}' was not found", artist_id))
        })?;

    let shows = sqlx::query_as::<_, ShowWithVenue>(
        "SELECT s.id AS show_id, s.venue_id, v.name AS venue_name, \
                v.image_link AS venue_image_link, s.start_time \
         FROM shows s \
         JOIN venues v ON v.id = s.venue_id \
         WHERE s.artist_id = $1 \
         ORDER BY s.start_time",
    )
    .bind(artist_id)
    .fetch_all(&pool)
    .await?;

    let (past_shows, upcoming_shows) = partition_by_time(shows, Utc::now());

    let page = ArtistPage {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        artist,
        past_shows,
        upcoming_shows,
    };
    Ok(success(page, "Artist detail").into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    // Absent in the submitted form means "not seeking".
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

pub async fn create_artist(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateArtist>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let artist = sqlx::query_as::<_, Artist>(
        "INSERT INTO artists \
           (name, city, state, phone, genres, image_link, facebook_link, \
            website, seeking_venue, seeking_description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.phone)
    .bind(&payload.genres)
    .bind(&payload.image_link)
    .bind(&payload.facebook_link)
    .bind(&payload.website)
    .bind(payload.seeking_venue)
    .bind(&payload.seeking_description)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        AppError::constraint(
            e,
            format!(
                "An error occurred. Artist {} could not be listed.",
                payload.name
            ),
        )
    })?;
    tx.commit().await?;

    let message = format!("Artist {} was successfully listed!", artist.name);
    Ok(success(artist, message).into_response())
}

pub async fn delete_artist(
    State(pool): State<PgPool>,
    Path(artist_id): Path<i64>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM artists WHERE id = $1")
        .bind(artist_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::constraint(
                e,
                format!(
                    "An error occurred. Artist {} still has shows booked and could not be deleted",
                    artist_id
                ),
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Artist with id '{}' was not found",
            artist_id
        )));
    }
    tx.commit().await?;

    Ok(empty_success(format!("Artist {} was successfully deleted.", artist_id)).into_response())
}

pub async fn edit_artist_form(
    State(pool): State<PgPool>,
    Path(artist_id): Path<i64>,
) -> Result<Response, AppError> {
    let artist = sqlx::query_as::<_, Artist>("SELECT * FROM artists WHERE id = $1")
        .bind(artist_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Artist with id '{}' was not found", artist_id))
        })?;

    Ok(success(artist, "Current artist field values").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateArtist {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

/// Applies only the submitted fields to the existing row; never inserts.
pub async fn edit_artist_submission(
    State(pool): State<PgPool>,
    Path(artist_id): Path<i64>,
    Json(payload): Json<UpdateArtist>,
) -> Result<Response, AppError> {
    let mut tx = pool.begin().await?;
    let artist = sqlx::query_as::<_, Artist>(
        "UPDATE artists SET \
           name = COALESCE($2, name), \
           city = COALESCE($3, city), \
           state = COALESCE($4, state), \
           phone = COALESCE($5, phone), \
           genres = COALESCE($6, genres), \
           image_link = COALESCE($7, image_link), \
           facebook_link = COALESCE($8, facebook_link), \
           website = COALESCE($9, website), \
           seeking_venue = COALESCE($10, seeking_venue), \
           seeking_description = COALESCE($11, seeking_description) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(artist_id)
    .bind(&payload.name)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.phone)
    .bind(&payload.genres)
    .bind(&payload.image_link)
    .bind(&payload.facebook_link)
    .bind(&payload.website)
    .bind(payload.seeking_venue)
    .bind(&payload.seeking_description)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        AppError::constraint(
            e,
            format!(
                "An error occurred. Artist {} could not be updated",
                artist_id
            ),
        )
    })?
    .ok_or_else(|| AppError::NotFound(format!("Artist with id '{}' was not found", artist_id)))?;
    tx.commit().await?;

    let message = format!("Artist {} was successfully updated!", artist.name);
    Ok(success(artist, message).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seeking_venue_defaults_to_false_when_absent() {
        let payload: CreateArtist = serde_json::from_value(json!({
            "name": "Guns N Petals",
            "city": "San Francisco",
            "state": "CA",
            "phone": "326-123-5000"
        }))
        .unwrap();

        assert!(!payload.seeking_venue);
        assert!(payload.genres.is_empty());
    }

    #[test]
    fn update_payload_with_only_a_name_leaves_the_rest_unset() {
        let payload: UpdateArtist = serde_json::from_value(json!({
            "name": "The Wild Sax Band"
        }))
        .unwrap();

        assert_eq!(payload.name.as_deref(), Some("The Wild Sax Band"));
        assert!(payload.phone.is_none());
        assert!(payload.genres.is_none());
        assert!(payload.seeking_venue.is_none());
    }
}
