// src/routes.rs

use axum::{Router, middleware, routing::get, routing::post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::{
    db::session_store,
    handlers::{auth, home, quiz},
    state::AppState,
    utils::session::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public pages: main page, registration, login, logout.
/// * Quiz pages sit behind `auth_middleware`.
/// * Sessions are stored in the application database and last for the
///   browser session.
pub fn create_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(session_store(&state.pool))
        .with_secure(state.config.session_secure)
        .with_expiry(Expiry::OnSessionEnd);

    let public_routes = Router::new()
        .route("/", get(home::index).post(home::start_quiz))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let quiz_routes = Router::new()
        .route(
            "/question",
            get(quiz::show_question).post(quiz::answer_question),
        )
        .route("/result", get(quiz::show_result))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(session_layer),
        )
        .with_state(state)
}
