// src/handlers/exam.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    config::{EXAM_NAME, PASSING_SCORE_PERCENTAGE},
    error::AppError,
    models::{
        exam::{
            AttemptProgress, DomainInfo, ExamInfo, ResultsResponse, ReviewParams, ReviewResponse,
            SelectAnswerRequest, StartAttemptResponse, SubmitResponse,
        },
        exam_attempt::NewAttempt,
        question::PublicQuestion,
    },
    services::{
        attempt_store::AttemptStore,
        question_bank::QuestionBank,
        review,
        scoring::{domain_breakdown, is_passing},
        session::{SessionError, SessionStore},
    },
    utils::jwt::Claims,
};

/// Shown when the attempt was scored but could not be persisted.
pub const SAVE_FAILED_WARNING: &str =
    "Exam completed but results could not be saved to the database.";

/// Describes the exam: size, pass mark and questions per domain.
pub async fn exam_info(State(bank): State<Arc<QuestionBank>>) -> impl IntoResponse {
    let domains = bank
        .domain_counts()
        .into_iter()
        .map(|(domain, question_count)| DomainInfo {
            domain,
            question_count,
        })
        .collect();

    Json(ExamInfo {
        exam_name: EXAM_NAME,
        question_count: bank.len(),
        passing_score: PASSING_SCORE_PERCENTAGE,
        domains,
    })
}

/// Starts a new attempt. Every question begins unanswered.
pub async fn start_attempt(
    State(bank): State<Arc<QuestionBank>>,
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let session = sessions.start(user_id, &bank).await;
    tracing::info!("User {} started exam attempt {}", user_id, session.id);

    let questions = bank.questions().iter().map(PublicQuestion::from).collect();

    Ok((
        StatusCode::CREATED,
        Json(StartAttemptResponse {
            attempt_id: session.id,
            started_at: session.started_at,
            questions,
        }),
    ))
}

/// Progress of an attempt: timer, answered and marked counts, answers so far.
pub async fn get_attempt(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(attempt_id, claims.user_id()?).await?;

    Ok(Json(AttemptProgress {
        attempt_id: session.id,
        status: session.status(),
        started_at: session.started_at,
        elapsed_seconds: session.elapsed_seconds(),
        total_questions: session.ledger.entries().len(),
        answered_count: session.ledger.answered_count(),
        marked_count: session.ledger.marked_count(),
        answers: session.ledger.entries().to_vec(),
    }))
}

/// Selects, changes or clears the answer to one question.
pub async fn select_answer(
    State(bank): State<Arc<QuestionBank>>,
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path((attempt_id, question_id)): Path<(Uuid, i64)>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entry = sessions
        .select_answer(
            attempt_id,
            claims.user_id()?,
            &bank,
            question_id,
            req.selected_option_index,
        )
        .await?;

    Ok(Json(entry))
}

/// Flips the "marked for review" flag of one question.
pub async fn toggle_review(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path((attempt_id, question_id)): Path<(Uuid, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let entry = sessions
        .toggle_review(attempt_id, claims.user_id()?, question_id)
        .await?;

    Ok(Json(entry))
}

/// Submits the attempt.
///
/// * Scores the frozen answer ledger.
/// * Tries to save the attempt once. A failed save is logged and reported as
///   a warning; the results are returned either way.
pub async fn submit_attempt(
    State(bank): State<Arc<QuestionBank>>,
    State(sessions): State<SessionStore>,
    State(store): State<Arc<dyn AttemptStore>>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let (results, unanswered_count) = sessions
        .submit(attempt_id, user_id, &bank)
        .await
        .map_err(|e| {
            if matches!(e, SessionError::Scoring(_)) {
                tracing::error!("Failed to score attempt {}: {}", attempt_id, e);
            }
            AppError::from(e)
        })?;

    let record = NewAttempt::from_summary(
        &results,
        user_id,
        &claims.name,
        &claims.email,
        chrono::Utc::now(),
    );
    let (saved, warning) = match store.save(&record).await {
        Ok(id) => {
            tracing::info!(
                "Saved attempt {} as record {} (score {}%)",
                attempt_id,
                id,
                results.score_percent
            );
            (true, None)
        }
        Err(e) => {
            tracing::warn!("Failed to save exam attempt {}: {}", attempt_id, e);
            (false, Some(SAVE_FAILED_WARNING.to_string()))
        }
    };

    Ok(Json(SubmitResponse {
        attempt_id,
        passed: is_passing(results.score_percent),
        results,
        unanswered_count,
        saved,
        warning,
    }))
}

/// Score card and per-domain breakdown of a submitted attempt.
pub async fn get_results(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(attempt_id, claims.user_id()?).await?;
    let results = session
        .results()
        .cloned()
        .ok_or(SessionError::NotSubmitted(attempt_id))?;

    Ok(Json(ResultsResponse {
        attempt_id,
        passed: is_passing(results.score_percent),
        domains: domain_breakdown(&results),
        results,
    }))
}

/// Every question with the user's answer, the correct answer and the
/// explanation. Only available after submission.
pub async fn review_attempt(
    State(bank): State<Arc<QuestionBank>>,
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
    Query(params): Query<ReviewParams>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(attempt_id, claims.user_id()?).await?;
    if session.results().is_none() {
        return Err(SessionError::NotSubmitted(attempt_id).into());
    }

    let answers = session.ledger.entries();
    let total = answers.len();
    let correct_count = review::correct_count(bank.questions(), answers);

    Ok(Json(ReviewResponse {
        attempt_id,
        total,
        correct_count,
        incorrect_count: total - correct_count,
        questions: review::review_items(bank.questions(), answers, &params),
    }))
}

/// Discards an attempt.
pub async fn abandon_attempt(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.abandon(attempt_id, claims.user_id()?).await?;
    tracing::info!("Attempt {} abandoned", attempt_id);

    Ok(StatusCode::NO_CONTENT)
}
