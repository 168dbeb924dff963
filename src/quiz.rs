// src/quiz.rs

//! Per-visitor quiz state.
//!
//! A [`QuizSession`] lives in the visitor's session record under
//! [`QUIZ_SESSION_KEY`] and moves through three phases:
//!
//! * started: the sampled questions are queued and the total is 0,
//! * awaiting an answer: a question has been popped and its marker and
//!   start time recorded,
//! * finished: the pending total has been taken out for persistence.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// Session key holding the [`QuizSession`].
pub const QUIZ_SESSION_KEY: &str = "quiz";

/// Points for a correct answer given `elapsed` after the question was shown.
pub fn points_for(elapsed: TimeDelta) -> u32 {
    if elapsed < TimeDelta::seconds(10) {
        3
    } else if elapsed < TimeDelta::seconds(30) {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More questions are queued.
    Continue,
    /// The queue is empty; the visitor should see the results.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub awarded: u32,
    pub progress: Progress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    to_ask: Vec<Question>,
    correct_answer: Option<String>,
    started_at: Option<DateTime<Utc>>,
    /// Pending total. `None` once the attempt has been finalized.
    points: Option<u32>,
}

impl QuizSession {
    pub fn start(questions: Vec<Question>) -> Self {
        Self {
            to_ask: questions,
            correct_answer: None,
            started_at: None,
            points: Some(0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.to_ask.len()
    }

    pub fn points(&self) -> Option<u32> {
        self.points
    }

    /// Pops the next question and starts its clock.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> Option<Question> {
        let question = self.to_ask.pop()?;
        self.correct_answer = Some(question.answer.clone());
        self.started_at = Some(now);
        Some(question)
    }

    /// Grades `answer` against the question last presented.
    ///
    /// The marker is consumed, so answering the same question twice only
    /// counts once.
    pub fn grade(&mut self, answer: Option<&str>, now: DateTime<Utc>) -> Grade {
        let mut awarded = 0;

        if let (Some(expected), Some(started_at)) = (self.correct_answer.take(), self.started_at.take()) {
            if answer == Some(expected.as_str()) {
                if let Some(points) = self.points.as_mut() {
                    awarded = points_for(now - started_at);
                    *points += awarded;
                }
            }
        }

        let progress = if self.to_ask.is_empty() {
            Progress::Finished
        } else {
            Progress::Continue
        };

        Grade { awarded, progress }
    }

    /// Takes the pending total out, leaving nothing to record twice.
    pub fn finish(&mut self) -> Option<u32> {
        self.correct_answer = None;
        self.started_at = None;
        self.points.take()
    }
}
