// src/models/quiz_result.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'results' table in the database.
/// One row per completed quiz attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizResult {
    pub result_id: i64,
    pub user_id: i64,
    pub points: i64,
}

/// Aggregated struct for displaying the leaderboard.
/// Represents a row joined from `results` and `users`.
#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub username: String,
    pub name: String,
    pub points: i64,
}

/// Response body of `GET /result`.
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub username: String,
    /// Score of the attempt finalized by this request, if any.
    pub points: Option<u32>,
    pub results: Vec<LeaderboardEntry>,
}
