// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, exam, profile},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, exam, profile).
/// * Applies global middleware (Trace, CORS).
/// * Serves the front end from `STATIC_DIR` for unmatched paths, if configured.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let exam_routes = Router::new()
        .route("/info", get(exam::exam_info))
        // Protected exam routes
        .merge(
            Router::new()
                .route("/attempts", post(exam::start_attempt))
                .route(
                    "/attempts/{id}",
                    get(exam::get_attempt).delete(exam::abandon_attempt),
                )
                .route(
                    "/attempts/{id}/answers/{question_id}",
                    put(exam::select_answer),
                )
                .route(
                    "/attempts/{id}/answers/{question_id}/review",
                    post(exam::toggle_review),
                )
                .route("/attempts/{id}/submit", post(exam::submit_attempt))
                .route("/attempts/{id}/results", get(exam::get_results))
                .route("/attempts/{id}/review", get(exam::review_attempt))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let profile_routes = Router::new()
        .route("/api/me", get(profile::get_me))
        .route("/api/attempts", get(profile::list_my_attempts))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/exam", exam_routes)
        .merge(profile_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
