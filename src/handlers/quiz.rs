// src/handlers/quiz.rs

use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    error::AppError,
    models::{
        question::{AnswerForm, QuestionResponse},
        quiz_result::{LeaderboardEntry, QuizResult, ResultResponse},
        user::CurrentUser,
    },
    quiz::{Progress, QUIZ_SESSION_KEY, QuizSession},
};

/// Presents the next queued question and starts its clock.
///
/// Without a quiz in progress, or once the queue is empty, the visitor is
/// sent to the results page.
pub async fn show_question(
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(mut quiz) = session.get::<QuizSession>(QUIZ_SESSION_KEY).await? else {
        return Ok(Redirect::to("/result").into_response());
    };

    let Some(question) = quiz.next_question(Utc::now()) else {
        return Ok(Redirect::to("/result").into_response());
    };

    session.insert(QUIZ_SESSION_KEY, &quiz).await?;

    Ok(Json(QuestionResponse {
        username: user.username,
        question: question.to_public(),
        remaining: quiz.remaining(),
    })
    .into_response())
}

/// Grades the submitted answer against the question last presented.
pub async fn answer_question(
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<AnswerForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(mut quiz) = session.get::<QuizSession>(QUIZ_SESSION_KEY).await? else {
        return Ok(Redirect::to("/result"));
    };

    let grade = quiz.grade(form.answer.as_deref(), Utc::now());
    session.insert(QUIZ_SESSION_KEY, &quiz).await?;

    tracing::debug!(
        username = %user.username,
        awarded = grade.awarded,
        remaining = quiz.remaining(),
        "Answer graded"
    );

    Ok(match grade.progress {
        Progress::Continue => Redirect::to("/question"),
        Progress::Finished => Redirect::to("/result"),
    })
}

/// Records the pending score, if any, and shows the leaderboard.
///
/// The score is taken out of the session when it is recorded, so reloading
/// this page never records the same attempt twice.
pub async fn show_result(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz: Option<QuizSession> = session.get(QUIZ_SESSION_KEY).await?;
    let points = quiz.as_mut().and_then(QuizSession::finish);

    if let Some(points) = points {
        let result = sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO results (user_id, points)
            VALUES (?, ?)
            RETURNING result_id, user_id, points
            "#,
        )
        .bind(user.user_id)
        .bind(i64::from(points))
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record result: {:?}", e);
            AppError::from(e)
        })?;

        session.remove::<QuizSession>(QUIZ_SESSION_KEY).await?;

        tracing::info!(
            username = %user.username,
            result_id = result.result_id,
            points = result.points,
            "Result recorded"
        );
    }

    let results = leaderboard(&pool).await?;

    Ok(Json(ResultResponse {
        username: user.username,
        points,
        results,
    }))
}

/// Every recorded result with its user, best first.
async fn leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardEntry>, AppError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            u.username,
            u.name,
            r.points
        FROM results r
        JOIN users u ON r.user_id = u.user_id
        ORDER BY r.points DESC, r.result_id ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    Ok(entries)
}
