use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{exam_attempt::AttemptListParams, user::MeResponse},
    services::attempt_store::AttemptStore,
    utils::jwt::Claims,
};

#[derive(sqlx::FromRow)]
struct MeRow {
    id: i64,
    email: String,
    full_name: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    attempts_count: i64,
    best_score: Option<i32>,
}

/// Get current user's profile and exam statistics.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let me = sqlx::query_as::<_, MeRow>(
        r#"
        SELECT
            u.id, u.email, u.full_name, u.created_at,
            (SELECT COUNT(*) FROM exam_attempts WHERE user_id = u.id) AS attempts_count,
            (SELECT MAX(score) FROM exam_attempts WHERE user_id = u.id) AS best_score
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        id: me.id,
        email: me.email,
        full_name: me.full_name,
        created_at: me.created_at,
        attempts_count: me.attempts_count,
        best_score: me.best_score,
    }))
}

/// List the current user's saved attempts, newest first.
pub async fn list_my_attempts(
    State(store): State<Arc<dyn AttemptStore>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<AttemptListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let attempts = store.list_for_user(claims.user_id()?, limit).await?;

    Ok(Json(attempts))
}
