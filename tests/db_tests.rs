// tests/db_tests.rs
//
// Runs against a real Postgres: `DATABASE_URL=... cargo test -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use netplus_exam::{
    config::Config,
    routes,
    services::{
        attempt_store::PgAttemptStore, question_bank::QuestionBank, session::SessionStore,
    },
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;

async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url,
        jwt_secret: "db_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        server_port: 0,
        session_retention_secs: 600,
        cors_origins: vec![],
        static_dir: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        bank: Arc::new(QuestionBank::embedded().unwrap()),
        sessions: SessionStore::new(Duration::from_secs(600)),
        attempts: Arc::new(PgAttemptStore::new(pool)),
    };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn signup_login_submit_and_history() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);

    // 1. Signup
    let response = client
        .post(format!("{}/api/auth/signup", address))
        .json(&json!({
            "name": "Grace Hopper",
            "email": email,
            "password": "password123",
            "confirm_password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    // 2. Duplicate signup
    let response = client
        .post(format!("{}/api/auth/signup", address))
        .json(&json!({
            "name": "Grace Hopper",
            "email": email.to_uppercase(),
            "password": "password123",
            "confirm_password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    // 3. Wrong password, then login
    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let login: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().expect("Token not found").to_string();

    // 4. Take the exam, answering only the first question correctly
    let start: Value = client
        .post(format!("{}/api/exam/attempts", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let attempt = start["attempt_id"].as_str().unwrap();

    client
        .put(format!("{}/api/exam/attempts/{}/answers/1", address, attempt))
        .bearer_auth(&token)
        .json(&json!({ "selected_option_index": 1 }))
        .send()
        .await
        .unwrap();

    let submitted: Value = client
        .post(format!("{}/api/exam/attempts/{}/submit", address, attempt))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(submitted["saved"], true);
    assert_eq!(submitted["results"]["score_percent"], 2);

    // 5. Profile and history
    let me: Value = client
        .get(format!("{}/api/me", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["full_name"], "Grace Hopper");
    assert_eq!(me["attempts_count"], 1);
    assert_eq!(me["best_score"], 2);

    let history: Value = client
        .get(format!("{}/api/attempts", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history[0]["questions_missed"], 49);
    assert_eq!(history[0]["student_name"], "Grace Hopper");
    assert_eq!(history[0]["missed_questions"].as_array().unwrap().len(), 49);
}
