// src/utils/session.rs

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::{error::AppError, models::user::CurrentUser};

/// Session key holding the authenticated [`CurrentUser`].
pub const SESSION_USER_KEY: &str = "user";

/// Session key holding queued flash messages.
pub const FLASH_KEY: &str = "_flash";

/// Returns the authenticated visitor, if any.
pub async fn current_user(session: &Session) -> Result<Option<CurrentUser>, AppError> {
    Ok(session.get(SESSION_USER_KEY).await?)
}

/// Marks the visitor as authenticated.
///
/// The session id is cycled first so an id obtained before login cannot be
/// reused afterwards.
pub async fn remember(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await?;
    Ok(())
}

/// Drops everything stored for the visitor, authentication included.
pub async fn forget(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

/// Queues a one-shot message for the next page render.
pub async fn flash(session: &Session, message: &str) -> Result<(), AppError> {
    let mut messages: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(message.to_string());
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// Drains the queued flash messages.
pub async fn take_flash(session: &Session) -> Result<Vec<String>, AppError> {
    Ok(session.remove(FLASH_KEY).await?.unwrap_or_default())
}

/// Axum Middleware: Authentication.
///
/// Looks up the authenticated visitor in the session and injects it into the
/// request extensions for handlers to use. Anonymous visitors get 401.
pub async fn auth_middleware(
    session: Session,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&session)
        .await?
        .ok_or_else(|| AppError::AuthError("Login required".to_string()))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
