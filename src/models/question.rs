// src/models/question.rs

use serde::{Deserialize, Serialize};

/// Labels given to a question's options, in the order they appear in the bank.
pub const ANSWER_IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

/// One row of the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to the visitor.
    pub text: String,

    /// Option texts, labelled `A`, `B`, ... in order.
    pub options: Vec<String>,

    /// Marker of the correct option (e.g. "B").
    pub answer: String,
}

impl Question {
    /// Builds a question from the raw fields of a bank row.
    ///
    /// The first field is the prompt, the last is the marker and everything
    /// in between is an option. Returns `None` when the row has no room for
    /// both a prompt and a marker.
    pub fn from_fields(mut fields: Vec<String>) -> Option<Self> {
        if fields.len() < 2 {
            return None;
        }

        let answer = fields.pop()?.trim().to_string();
        let text = fields.remove(0);

        Some(Self {
            text,
            options: fields,
            answer,
        })
    }

    /// Strips the marker so the question can be sent to the visitor.
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            question: self.text.clone(),
            answers: ANSWER_IDS
                .iter()
                .zip(&self.options)
                .map(|(id, text)| AnswerOption {
                    id: (*id).to_string(),
                    text: text.clone(),
                })
                .collect(),
        }
    }
}

/// DTO for sending a question to the client (excludes the marker).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub answers: Vec<AnswerOption>,
}

#[derive(Debug, Serialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
}

/// Response body of `GET /question`.
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub username: String,
    #[serde(flatten)]
    pub question: PublicQuestion,
    /// Questions still queued after this one.
    pub remaining: usize,
}

/// Form submitted to `POST /question`.
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub answer: Option<String>,
}
