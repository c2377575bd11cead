use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::Question;
use crate::utils::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct QuizPayload {
    #[serde(default)]
    pub previous_questions: Vec<i64>,
    pub quiz_category: Option<QuizCategory>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct QuizCategory {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct QuizRound {
    pub success: bool,
    /// `null` once the pool of unseen questions is exhausted; the client
    /// reads that as "quiz complete".
    pub question: Option<Question>,
    pub previous_questions: Vec<i64>,
}

/// Picks one question uniformly at random from the pool of questions not
/// yet served this session, optionally restricted to a category. The
/// filtered and unfiltered paths share one query.
pub async fn play_quiz(
    State(pool): State<PgPool>,
    payload: Option<Json<QuizPayload>>,
) -> Result<Response, ApiError> {
    let QuizPayload {
        previous_questions,
        quiz_category,
    } = payload.map(|Json(p)| p).unwrap_or_default();

    let category = quiz_category
        .and_then(|c| c.id)
        .map(|id| id.to_string());

    let question = sqlx::query_as::<_, Question>(
        "SELECT id, question, answer, category, difficulty FROM questions \
         WHERE id <> ALL($1) AND ($2::text IS NULL OR category = $2) \
         ORDER BY random() LIMIT 1",
    )
    .bind(&previous_questions)
    .bind(category.as_deref())
    .fetch_optional(&pool)
    .await?;

    Ok(Json(QuizRound {
        success: true,
        question,
        previous_questions,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn an_empty_body_defaults_to_no_history_and_no_category() {
        let payload = QuizPayload::default();
        assert!(payload.previous_questions.is_empty());
        assert!(payload.quiz_category.is_none());
    }

    #[test]
    fn history_and_category_are_read_from_the_body() {
        let payload: QuizPayload = serde_json::from_value(json!({
            "previous_questions": [2, 7],
            "quiz_category": { "id": 3, "type": "Geography" }
        }))
        .unwrap();

        assert_eq!(payload.previous_questions, vec![2, 7]);
        assert_eq!(payload.quiz_category.unwrap().id, Some(3));
    }

    #[test]
    fn a_category_without_an_id_means_the_unfiltered_pool() {
        let payload: QuizPayload = serde_json::from_value(json!({
            "quiz_category": {}
        }))
        .unwrap();

        let category = payload.quiz_category.and_then(|c| c.id);
        assert!(category.is_none());
    }

    #[test]
    fn a_round_with_no_question_left_serializes_to_null() {
        let round = QuizRound {
            success: true,
            question: None,
            previous_questions: vec![1, 2, 3],
        };

        let value = serde_json::to_value(&round).unwrap();
        assert_eq!(value["question"], serde_json::Value::Null);
        assert_eq!(value["success"], true);
    }
}
