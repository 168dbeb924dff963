// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_sessions::Session;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CurrentUser, LoginQuery, LoginRequest, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        redirect::local_redirect,
        session::{current_user, flash, forget, remember},
    },
};

/// Describes the registration form.
pub async fn register_form(session: Session) -> Result<impl IntoResponse, AppError> {
    let username = current_user(&session).await?.map(|user| user.username);

    Ok(Json(json!({
        "username": username,
        "fields": RegisterRequest::FIELDS,
    })))
}

/// Registers a new user and logs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 400 on validation errors and 409 when the username is taken;
/// nothing is written in either case.
pub async fn register(
    State(pool): State<SqlitePool>,
    session: Session,
    Form(payload): Form<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, name, email, password)
        VALUES (?, ?, ?, ?)
        RETURNING user_id, username, name, email, password
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    remember(&session, &CurrentUser::from(&user)).await?;
    tracing::info!(username = %user.username, "User registered");

    Ok(Redirect::to("/"))
}

/// Checks the submitted credentials.
///
/// Success and failure both redirect to `came_from` (form field first, then
/// query string); the outcome is reported through a flash message that does
/// not say which field was wrong.
pub async fn login(
    State(pool): State<SqlitePool>,
    Query(query): Query<LoginQuery>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let came_from = payload
        .came_from
        .as_deref()
        .filter(|target| !target.is_empty())
        .or(query.came_from.as_deref());
    let target = local_redirect(came_from);

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, name, email, password
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(&payload.login)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?;

    let authenticated = match user {
        Some(user) if verify_password(&payload.password, &user.password)? => Some(user),
        _ => None,
    };

    match authenticated {
        Some(user) => {
            remember(&session, &CurrentUser::from(&user)).await?;
            flash(&session, "Logged in successfully.").await?;
            tracing::info!(username = %user.username, "User logged in");
        }
        None => {
            flash(&session, "Failed to login.").await?;
            tracing::debug!(login = %payload.login, "Rejected login");
        }
    }

    Ok(Redirect::to(&target))
}

/// Clears the whole session, authentication included.
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    forget(&session).await?;
    flash(&session, "Logged out successfully.").await?;

    Ok(Redirect::to("/"))
}
