// tests/api_tests.rs

use std::path::PathBuf;
use std::sync::Arc;

use quizr::{config::Config, db, question_bank::QuestionBank, routes, state::AppState, utils::hash::verify_password};
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

const BANK: &str = "\
Q1?;right;wrong;wrong;wrong;A
Q2?;right;wrong;wrong;wrong;A
Q3?;right;wrong;wrong;wrong;A
Q4?;right;wrong;wrong;wrong;A
Q5?;right;wrong;wrong;wrong;A
";

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool.
async fn spawn_app() -> (String, SqlitePool) {
    // 1. Create an in-memory pool. A single connection keeps one database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    // 2. Run migrations
    db::migrate(&pool).await.expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        questions_csv: PathBuf::from("questions.csv"),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        log_dir: "logs".to_string(),
        session_secure: false,
    };

    let questions = QuestionBank::from_reader(BANK.as_bytes()).expect("Failed to parse bank");

    let state = AppState {
        pool: pool.clone(),
        config,
        questions: Arc::new(questions),
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// A browser-like client: keeps cookies, does not follow redirects.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn unique_name() -> String {
    // Truncate UUID to keep username within 20 characters
    format!("u_{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("Missing Location header")
        .to_str()
        .unwrap()
}

async fn register(client: &Client, address: &str, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/register", address))
        .form(&[
            ("username", username),
            ("password", password),
            ("confirm_password", password),
            ("name", "Test User"),
            ("email", "test@example.com"),
        ])
        .send()
        .await
        .expect("Failed to execute request")
}

async fn home(client: &Client, address: &str) -> serde_json::Value {
    client
        .get(format!("{}/", address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse main page json")
}

async fn user_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (address, _pool) = spawn_app().await;

    let response = browser()
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn main_page_is_anonymous_by_default() {
    let (address, _pool) = spawn_app().await;

    let page = home(&browser(), &address).await;

    assert!(page["username"].is_null());
    assert_eq!(page["messages"], serde_json::json!([]));
}

#[tokio::test]
async fn register_form_lists_fields() {
    let (address, _pool) = spawn_app().await;

    let form: serde_json::Value = browser()
        .get(format!("{}/register", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        form["fields"],
        serde_json::json!(["username", "password", "confirm_password", "name", "email"])
    );
}

#[tokio::test]
async fn register_logs_the_visitor_in() {
    let (address, _pool) = spawn_app().await;
    let client = browser();
    let username = unique_name();

    let response = register(&client, &address, &username, "password123").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = home(&client, &address).await;
    assert_eq!(page["username"], username.as_str());
}

#[tokio::test]
async fn register_stores_only_a_hash() {
    let (address, pool) = spawn_app().await;
    let username = unique_name();

    register(&browser(), &address, &username, "password123").await;

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = ?")
        .bind(&username)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_ne!(stored, "password123");
    assert!(verify_password("password123", &stored).unwrap());
}

#[tokio::test]
async fn register_fails_validation_without_writing() {
    let (address, pool) = spawn_app().await;

    let response = browser()
        .post(format!("{}/register", address))
        .form(&[
            ("username", "mismatch"),
            ("password", "password123"),
            ("confirm_password", "password124"),
            ("name", "Test User"),
            ("email", "test@example.com"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("confirm_password"));

    let response = browser()
        .post(format!("{}/register", address))
        .form(&[("username", "no_email"), ("password", "x"), ("confirm_password", "x")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(user_count(&pool).await, 0);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let (address, pool) = spawn_app().await;
    let username = unique_name();

    register(&browser(), &address, &username, "password123").await;
    let response = register(&browser(), &address, &username, "other-password").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(user_count(&pool).await, 1);
}

#[tokio::test]
async fn login_redirects_to_came_from() {
    let (address, _pool) = spawn_app().await;
    let username = unique_name();
    register(&browser(), &address, &username, "password123").await;

    let client = browser();
    let response = client
        .post(format!("{}/login", address))
        .form(&[
            ("login", username.as_str()),
            ("password", "password123"),
            ("came_from", "/register"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/register");

    let page = home(&client, &address).await;
    assert_eq!(page["username"], username.as_str());
    assert_eq!(page["messages"], serde_json::json!(["Logged in successfully."]));

    // Flash messages are shown once.
    let page = home(&client, &address).await;
    assert_eq!(page["messages"], serde_json::json!([]));
}

#[tokio::test]
async fn login_reads_came_from_from_the_query_string() {
    let (address, _pool) = spawn_app().await;
    let username = unique_name();
    register(&browser(), &address, &username, "password123").await;

    let response = browser()
        .post(format!("{}/login?came_from=/question", address))
        .form(&[("login", username.as_str()), ("password", "password123")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/question");

    // A form value wins over the query string.
    let response = browser()
        .post(format!("{}/login?came_from=/question", address))
        .form(&[
            ("login", username.as_str()),
            ("password", "password123"),
            ("came_from", "/result"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/result");

    // Failed logins go back to the same place.
    let response = browser()
        .post(format!("{}/login?came_from=/register", address))
        .form(&[("login", username.as_str()), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/register");
}

#[tokio::test]
async fn login_failures_look_the_same() {
    let (address, _pool) = spawn_app().await;
    let username = unique_name();
    register(&browser(), &address, &username, "password123").await;

    for (login, password) in [(username.as_str(), "wrong-password"), ("nobody_here", "password123")] {
        let client = browser();
        let response = client
            .post(format!("{}/login", address))
            .form(&[("login", login), ("password", password)])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let page = home(&client, &address).await;
        assert!(page["username"].is_null());
        assert_eq!(page["messages"], serde_json::json!(["Failed to login."]));
    }
}

#[tokio::test]
async fn login_ignores_offsite_came_from() {
    let (address, _pool) = spawn_app().await;
    let username = unique_name();
    register(&browser(), &address, &username, "password123").await;

    let response = browser()
        .post(format!("{}/login", address))
        .form(&[
            ("login", username.as_str()),
            ("password", "password123"),
            ("came_from", "//evil.example/phish"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn quiz_pages_require_login() {
    let (address, _pool) = spawn_app().await;
    let client = browser();

    for path in ["/question", "/result"] {
        let response = client.get(format!("{}{}", address, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {}", path);
    }

    let response = client
        .post(format!("{}/question", address))
        .form(&[("answer", "A")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_authentication() {
    let (address, _pool) = spawn_app().await;
    let client = browser();
    register(&client, &address, &unique_name(), "password123").await;

    let response = client.post(format!("{}/logout", address)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = home(&client, &address).await;
    assert!(page["username"].is_null());
    assert_eq!(page["messages"], serde_json::json!(["Logged out successfully."]));

    let response = client.get(format!("{}/result", address)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_works_for_anonymous_visitors() {
    let (address, _pool) = spawn_app().await;

    let response = browser().post(format!("{}/logout", address)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
