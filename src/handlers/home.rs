// src/handlers/home.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::{
    config::QUIZ_QUESTION_COUNT,
    error::AppError,
    question_bank::QuestionBank,
    quiz::{QUIZ_SESSION_KEY, QuizSession},
    utils::session::{current_user, take_flash},
};

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// Authenticated visitor, `None` for anonymous ones.
    pub username: Option<String>,
    /// Flash messages queued since the last render.
    pub messages: Vec<String>,
}

async fn home_page(session: &Session) -> Result<Json<HomeResponse>, AppError> {
    let username = current_user(session).await?.map(|user| user.username);
    let messages = take_flash(session).await?;

    Ok(Json(HomeResponse { username, messages }))
}

/// Main page.
pub async fn index(session: Session) -> Result<impl IntoResponse, AppError> {
    home_page(&session).await
}

/// Starts a new quiz for an authenticated visitor.
///
/// Samples the questions into the session with a zeroed total and sends the
/// visitor to the first question. Anonymous visitors just get the main page.
pub async fn start_quiz(
    State(questions): State<Arc<QuestionBank>>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(user) = current_user(&session).await? else {
        return Ok(home_page(&session).await?.into_response());
    };

    let quiz = QuizSession::start(questions.sample(QUIZ_QUESTION_COUNT));
    session.insert(QUIZ_SESSION_KEY, &quiz).await?;

    tracing::info!(
        username = %user.username,
        questions = quiz.remaining(),
        "Quiz started"
    );

    Ok(Redirect::to("/question").into_response())
}
