pub mod categories;
pub mod questions;
pub mod quizzes;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "trivia-api",
    };

    Json(payload).into_response()
}
