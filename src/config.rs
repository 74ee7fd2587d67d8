// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Display name of the exam, stored with every attempt.
pub const EXAM_NAME: &str = "Network+ Practice Exam";

/// Minimum percentage for a passing attempt (and a passing domain).
pub const PASSING_SCORE_PERCENTAGE: u32 = 72;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub server_port: u16,
    pub session_retention_secs: u64,
    pub cors_origins: Vec<String>,
    /// Directory with the built front end, served for unmatched paths.
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let server_port = parse_or("SERVER_PORT", 3000);

        let session_retention_secs = parse_or("SESSION_RETENTION_SECS", 7_200);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let static_dir = env::var("STATIC_DIR").ok().filter(|s| !s.is_empty());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            server_port,
            session_retention_secs,
            cors_origins,
            static_dir,
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
