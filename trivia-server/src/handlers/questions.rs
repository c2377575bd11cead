use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;

use crate::handlers::categories::all_categories;
use crate::models::category::category_map;
use crate::models::Question;
use crate::utils::error::ApiError;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the half-open window `[(page-1)*10, (page-1)*10+10)` of `items`.
/// Pages past the end are empty, not an error; a page below 1 is treated
/// as the first page.
fn paginate<T: Clone>(items: &[T], page: u32) -> Vec<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return Vec::new();
    }
    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    items[start..end].to_vec()
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Serialize)]
pub struct QuestionPage {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<String, String>,
    pub current_category: Option<String>,
}

pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, question, answer, category, difficulty FROM questions ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    // An empty store reports 404 even on page 1.
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let total_questions = questions.len();
    let page_items = paginate(&questions, query.page);
    let categories = category_map(&all_categories(&pool).await?);

    Ok(Json(QuestionPage {
        success: true,
        questions: page_items,
        total_questions,
        categories,
        current_category: None,
    })
    .into_response())
}

#[derive(Serialize)]
struct Acknowledged {
    success: bool,
}

pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(question_id): Path<i64>,
) -> Result<Response, ApiError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    tx.commit().await?;

    Ok(Json(Acknowledged { success: true }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<i32>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{} is required", field))),
    }
}

pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestion>,
) -> Result<Response, ApiError> {
    let question = required_text(payload.question, "question")?;
    let answer = required_text(payload.answer, "answer")?;
    let category = required_text(payload.category, "category")?;
    let difficulty = payload
        .difficulty
        .ok_or_else(|| ApiError::Validation("difficulty is required".to_string()))?;

    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO questions (question, answer, category, difficulty) VALUES ($1, $2, $3, $4)")
        .bind(&question)
        .bind(&answer)
        .bind(&category)
        .bind(difficulty)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Json(Acknowledged { success: true }).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResults {
    pub success: bool,
    pub questions: Vec<Question>,
    /// Count of the entire store, not of the matches.
    pub total_questions: usize,
    pub current_category: Option<String>,
}

pub async fn search_questions(
    State(pool): State<PgPool>,
    Json(payload): Json<SearchPayload>,
) -> Result<Response, ApiError> {
    let term = match payload.search_term {
        Some(term) if !term.is_empty() => term,
        _ => {
            return Err(ApiError::Validation(
                "searchTerm must not be empty".to_string(),
            ))
        }
    };

    let total_questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&pool)
        .await?;
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, question, answer, category, difficulty FROM questions \
         WHERE question ILIKE $1 ORDER BY id",
    )
    .bind(format!("%{}%", term))
    .fetch_all(&pool)
    .await?;

    Ok(Json(SearchResults {
        success: true,
        questions,
        total_questions: total_questions as usize,
        current_category: None,
    })
    .into_response())
}

#[derive(Serialize)]
pub struct CategoryQuestions {
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// An unknown or empty category is an empty result, not a 404.
pub async fn questions_by_category(
    State(pool): State<PgPool>,
    Path(category_id): Path<i64>,
) -> Result<Response, ApiError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, question, answer, category, difficulty FROM questions \
         WHERE category = $1 ORDER BY id",
    )
    .bind(category_id.to_string())
    .fetch_all(&pool)
    .await?;

    let total_questions = questions.len();
    Ok(Json(CategoryQuestions {
        questions,
        total_questions,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn twenty_three_items_paginate_into_ten_three_and_nothing() {
        let items: Vec<i32> = (1..=23).collect();

        assert_eq!(paginate(&items, 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3), vec![21, 22, 23]);
        assert!(paginate(&items, 4).is_empty());
    }

    #[test]
    fn page_below_one_behaves_like_the_first_page() {
        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(paginate(&items, 0), items);
    }

    #[test]
    fn page_defaults_to_one_when_absent() {
        let query: PageQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.page, 1);
    }

    #[test]
    fn required_text_rejects_missing_and_blank_values() {
        assert!(required_text(None, "question").is_err());
        assert!(required_text(Some("   ".to_string()), "question").is_err());
        assert_eq!(
            required_text(Some("What?".to_string()), "question").unwrap(),
            "What?"
        );
    }

    #[test]
    fn search_payload_reads_the_camel_case_key() {
        let payload: SearchPayload =
            serde_json::from_value(json!({ "searchTerm": "title" })).unwrap();
        assert_eq!(payload.search_term.as_deref(), Some("title"));

        let empty: SearchPayload = serde_json::from_value(json!({})).unwrap();
        assert!(empty.search_term.is_none());
    }
}
