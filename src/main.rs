// src/main.rs

use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use quizr::config::{Config, SESSION_CLEANUP_INTERVAL};
use quizr::db;
use quizr::question_bank::QuestionBank;
use quizr::routes;
use quizr::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "quizr.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let questions = QuestionBank::load(&config.questions_csv)?;
    if questions.is_empty() {
        tracing::warn!(
            "Question bank {} is empty, every quiz will finish immediately",
            config.questions_csv.display()
        );
    }
    tracing::info!(
        "Loaded {} questions from {}",
        questions.len(),
        config.questions_csv.display()
    );

    let pool = db::connect(&config.database_url).await?;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    let _session_cleanup = db::spawn_session_cleanup(&pool, SESSION_CLEANUP_INTERVAL);

    let state = AppState {
        pool,
        config: config.clone(),
        questions: Arc::new(questions),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
