// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::question_bank::QuestionBank;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub questions: Arc<QuestionBank>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}
