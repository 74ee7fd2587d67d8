// src/services/attempt_store.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    error::AppError,
    models::exam_attempt::{ExamAttempt, NewAttempt},
};

/// Persistence of submitted attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Writes one attempt and returns its row id.
    async fn save(&self, attempt: &NewAttempt) -> Result<i64, AppError>;

    /// Most recent attempts of a user, newest first.
    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<ExamAttempt>, AppError>;
}

/// `AttemptStore` backed by the `exam_attempts` table.
#[derive(Debug, Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        PgAttemptStore { pool }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn save(&self, attempt: &NewAttempt) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO exam_attempts (
                user_id, student_name, student_email, exam_name, score,
                questions_missed, total_questions, duration_minutes,
                attempt_date, domains, missed_questions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(attempt.user_id)
        .bind(&attempt.student_name)
        .bind(&attempt.student_email)
        .bind(&attempt.exam_name)
        .bind(attempt.score)
        .bind(attempt.questions_missed)
        .bind(attempt.total_questions)
        .bind(attempt.duration_minutes)
        .bind(attempt.attempt_date)
        .bind(Json(&attempt.domains))
        .bind(Json(&attempt.missed_questions))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<ExamAttempt>, AppError> {
        let attempts = sqlx::query_as::<_, ExamAttempt>(
            r#"
            SELECT
                id, user_id, student_name, student_email, exam_name, score,
                questions_missed, total_questions, duration_minutes,
                attempt_date, domains, missed_questions
            FROM exam_attempts
            WHERE user_id = $1
            ORDER BY attempt_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exam attempts: {:?}", e);
            AppError::from(e)
        })?;

        Ok(attempts)
    }
}
