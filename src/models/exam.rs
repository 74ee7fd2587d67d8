// src/models/exam.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{
        answer::AnswerEntry,
        question::{Domain, PublicQuestion},
        results::{DomainBreakdown, ResultsSummary},
    },
    services::session::AttemptStatus,
};

/// Dashboard card describing the exam.
#[derive(Debug, Serialize)]
pub struct ExamInfo {
    pub exam_name: &'static str,
    pub question_count: usize,
    pub passing_score: u32,
    pub domains: Vec<DomainInfo>,
}

#[derive(Debug, Serialize)]
pub struct DomainInfo {
    pub domain: Domain,
    pub question_count: usize,
}

/// DTO for returning a freshly started attempt.
#[derive(Debug, Serialize)]
pub struct StartAttemptResponse {
    pub attempt_id: Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct AttemptProgress {
    pub attempt_id: Uuid,
    pub status: AttemptStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed_seconds: u64,
    pub total_questions: usize,
    pub answered_count: usize,
    pub marked_count: usize,
    pub answers: Vec<AnswerEntry>,
}

/// DTO for choosing an answer. `null` clears the selection.
#[derive(Debug, Deserialize)]
pub struct SelectAnswerRequest {
    pub selected_option_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub attempt_id: Uuid,
    pub results: ResultsSummary,
    pub passed: bool,
    pub unanswered_count: usize,
    /// Whether the attempt reached the database.
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub attempt_id: Uuid,
    pub results: ResultsSummary,
    pub passed: bool,
    pub domains: Vec<DomainBreakdown>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
}

/// Query parameters of the review page.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewParams {
    #[serde(default)]
    pub filter: ReviewFilter,
    pub domain: Option<Domain>,
}

/// One question as shown after submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub question_id: i64,
    pub prompt: String,
    pub options: Vec<String>,
    pub domain: Domain,
    pub selected_option_index: Option<usize>,
    pub correct_option_index: usize,
    pub is_correct: bool,
    pub marked_for_review: bool,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub attempt_id: Uuid,
    pub total: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub questions: Vec<ReviewItem>,
}
