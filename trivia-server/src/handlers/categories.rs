use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::Category;
use crate::utils::error::ApiError;

#[derive(Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

pub(crate) async fn all_categories(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_categories(State(pool): State<PgPool>) -> Result<Response, ApiError> {
    let categories = all_categories(&pool).await?;
    Ok(Json(CategoryList { categories }).into_response())
}
