// src/db.rs

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::task::JoinHandle;
use tower_sessions_core::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;

/// Opens the database, creating the file if it does not exist yet.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

/// Applies the schema migrations and creates the session table.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    session_store(pool).migrate().await?;
    Ok(())
}

/// Session store backed by the application database.
pub fn session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Deletes expired sessions every `period` for as long as the task runs.
///
/// Browser-session cookies still get a store-side expiry, so without this
/// the session table only grows.
pub fn spawn_session_cleanup(
    pool: &SqlitePool,
    period: Duration,
) -> JoinHandle<Result<(), tower_sessions::session_store::Error>> {
    tokio::task::spawn(session_store(pool).continuously_delete_expired(period))
}
