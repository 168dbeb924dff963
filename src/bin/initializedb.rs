// src/bin/initializedb.rs

//! Creates the database and applies the schema without starting the server.
//!
//! Usage: `initializedb [DATABASE_URL]`. Falls back to the `DATABASE_URL`
//! environment variable (or `.env`) when no argument is given.

use std::env;
use std::error::Error;

use dotenvy::dotenv;
use quizr::db;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url = env::args()
        .nth(1)
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or("usage: initializedb <database_url> (or set DATABASE_URL)")?;

    let pool = db::connect(&database_url).await?;
    db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Database {} initialized.", database_url);
    Ok(())
}
