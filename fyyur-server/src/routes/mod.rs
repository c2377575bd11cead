use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers;

pub fn create_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/venues",
            get(handlers::venues::list_venues).post(handlers::venues::create_venue),
        )
        .route("/venues/search", post(handlers::venues::search_venues))
        .route(
            "/venues/:venue_id",
            get(handlers::venues::show_venue).delete(handlers::venues::delete_venue),
        )
        .route(
            "/venues/:venue_id/edit",
            get(handlers::venues::edit_venue_form).post(handlers::venues::edit_venue_submission),
        )
        .route(
            "/artists",
            get(handlers::artists::list_artists).post(handlers::artists::create_artist),
        )
        .route("/artists/search", post(handlers::artists::search_artists))
        .route(
            "/artists/:artist_id",
            get(handlers::artists::show_artist).delete(handlers::artists::delete_artist),
        )
        .route(
            "/artists/:artist_id/edit",
            get(handlers::artists::edit_artist_form).post(handlers::artists::edit_artist_submission),
        )
        .route(
            "/shows",
            get(handlers::shows::list_shows).post(handlers::shows::create_show),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(pool)
}
