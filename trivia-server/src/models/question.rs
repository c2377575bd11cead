use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `category` holds the string-encoded id of a category; the column is
/// deliberately not a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i32,
}
