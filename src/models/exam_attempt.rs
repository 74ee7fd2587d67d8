// src/models/exam_attempt.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::{
    config::EXAM_NAME,
    models::{
        question::Domain,
        results::{DomainScore, MissedQuestion, ResultsSummary},
    },
};

/// Represents the 'exam_attempts' table in the database.
/// One row per submitted attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamAttempt {
    pub id: i64,
    pub user_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub exam_name: String,
    pub score: i32,
    pub questions_missed: i32,
    pub total_questions: i32,
    pub duration_minutes: i32,
    pub attempt_date: chrono::DateTime<chrono::Utc>,

    /// Domain label -> {correct, total}, stored as JSONB.
    pub domains: Json<BTreeMap<Domain, DomainScore>>,

    /// Stored as a JSONB array.
    pub missed_questions: Json<Vec<MissedQuestion>>,
}

/// Record handed to the persistence collaborator after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttempt {
    pub user_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub exam_name: String,
    pub score: i32,
    pub questions_missed: i32,
    pub total_questions: i32,
    pub duration_minutes: i32,
    pub attempt_date: chrono::DateTime<chrono::Utc>,
    pub domains: BTreeMap<Domain, DomainScore>,
    pub missed_questions: Vec<MissedQuestion>,
}

impl NewAttempt {
    /// Combines a results summary with identity fields the scorer does not own.
    pub fn from_summary(
        summary: &ResultsSummary,
        user_id: i64,
        student_name: &str,
        student_email: &str,
        attempt_date: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        NewAttempt {
            user_id,
            student_name: student_name.to_string(),
            student_email: student_email.to_string(),
            exam_name: EXAM_NAME.to_string(),
            score: summary.score_percent as i32,
            questions_missed: (summary.total_questions - summary.correct_count) as i32,
            total_questions: summary.total_questions as i32,
            duration_minutes: duration_minutes(summary.duration_seconds),
            attempt_date,
            domains: summary.domain_scores.clone(),
            missed_questions: summary.missed_questions.clone(),
        }
    }
}

/// Whole minutes, rounded half away from zero.
pub fn duration_minutes(seconds: u64) -> i32 {
    ((seconds + 30) / 60).min(i32::MAX as u64) as i32
}

/// Query parameters for listing past attempts.
#[derive(Debug, Deserialize)]
pub struct AttemptListParams {
    pub limit: Option<i64>,
}
