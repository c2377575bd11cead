use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers;

pub fn create_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/categories", get(handlers::categories::list_categories))
        .route(
            "/categories/:category_id/questions",
            get(handlers::questions::questions_by_category),
        )
        .route(
            "/questions",
            get(handlers::questions::list_questions).post(handlers::questions::create_question),
        )
        .route(
            "/questions/:question_id",
            delete(handlers::questions::delete_question),
        )
        .route(
            "/search/questions",
            post(handlers::questions::search_questions),
        )
        .route("/quizzes", post(handlers::quizzes::play_quiz))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(pool)
}
