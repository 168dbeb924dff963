// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

/// Number of questions sampled for one quiz attempt.
pub const QUIZ_QUESTION_COUNT: usize = 5;

/// How often expired sessions are purged from the store.
pub const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub questions_csv: PathBuf,
    pub rust_log: String,
    pub bind_addr: String,
    pub log_dir: String,
    /// Marks the session cookie `Secure`. Leave off when serving plain HTTP.
    pub session_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        let questions_csv = PathBuf::from(required("QUESTIONS_CSV")?);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let session_secure = env::var("SESSION_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            questions_csv,
            rust_log,
            bind_addr,
            log_dir,
            session_secure,
        })
    }
}

fn required(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("{} must be set", key))
}
