// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,

    /// Unique username.
    pub username: String,

    /// Display name shown on the leaderboard.
    pub name: String,

    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,
}

/// The authenticated visitor, as remembered in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
        }
    }
}

/// Form for creating a new user (Registration).
///
/// Every field defaults to empty so a missing field is reported by
/// validation rather than rejected by the form extractor.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        length(
            min = 1,
            max = 20,
            message = "Username length must be between 1 and 20 characters."
        ),
        custom(function = validate_plain_text)
    )]
    pub username: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password length must be between 1 and 128 characters."
    ))]
    pub password: String,

    #[serde(default)]
    #[validate(must_match(other = "password", message = "Fields do not match."))]
    pub confirm_password: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name length must be between 1 and 50 characters."
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(
        email(message = "An email address must contain a single @."),
        length(max = 50, message = "Email must be at most 50 characters.")
    )]
    pub email: String,
}

impl RegisterRequest {
    /// Field names the registration form posts.
    pub const FIELDS: [&'static str; 5] = ["username", "password", "confirm_password", "name", "email"];
}

/// Form for user login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Where to send the visitor afterwards. Takes priority over the
    /// query string; defaults to the main page.
    pub came_from: Option<String>,
}

/// Query string accepted by `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub came_from: Option<String>,
}

/// Letters, digits, underscores and hyphens only.
fn validate_plain_text(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("plain_text");
        err.message = Some("Enter only letters, numbers, - (hyphen) or _ (underscore)".into());
        Err(err)
    }
}
