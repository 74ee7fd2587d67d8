// src/services/scoring.rs

//! Scoring of a submitted attempt.
//!
//! Everything here is pure: the elapsed time is passed in by the caller and
//! nothing is read from or written to the outside world.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    config::PASSING_SCORE_PERCENTAGE,
    models::{
        answer::AnswerEntry,
        question::{Domain, Question},
        results::{DomainBreakdown, DomainScore, MissedQuestion, NOT_ANSWERED, ResultsSummary},
    },
};

/// Invariant violations. These indicate a bug in the caller, not bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("{answers} answers supplied for {questions} questions")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("answer at position {position} belongs to question {found}, expected {expected}")]
    QuestionMismatch {
        position: usize,
        expected: i64,
        found: i64,
    },

    #[error("question {question_id} has no option {index}")]
    SelectionOutOfRange { question_id: i64, index: usize },

    #[error("question {0} has a correct option index outside its options")]
    InvalidQuestion(i64),
}

/// Integer percentage of `correct / total`, rounded half away from zero.
///
/// A zero total yields 0.
pub fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (correct, total) = (u64::from(correct), u64::from(total));
    ((200 * correct + total) / (2 * total)) as u32
}

/// Pass threshold, shared by the overall score and each domain.
pub fn is_passing(percent: u32) -> bool {
    percent >= PASSING_SCORE_PERCENTAGE
}

/// Scores one attempt.
///
/// `answers` must be order-aligned with `questions`, one entry per question.
pub fn score(
    questions: &[Question],
    answers: &[AnswerEntry],
    elapsed_seconds: u64,
) -> Result<ResultsSummary, ScoringError> {
    if questions.len() != answers.len() {
        return Err(ScoringError::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }

    let mut domain_scores: BTreeMap<Domain, DomainScore> = Domain::ALL
        .iter()
        .map(|domain| (*domain, DomainScore::default()))
        .collect();
    let mut correct_count = 0u32;
    let mut missed_questions = Vec::new();

    for (position, (question, answer)) in questions.iter().zip(answers).enumerate() {
        if answer.question_id != question.id {
            return Err(ScoringError::QuestionMismatch {
                position,
                expected: question.id,
                found: answer.question_id,
            });
        }
        if question.correct_option_index >= question.options.len() {
            return Err(ScoringError::InvalidQuestion(question.id));
        }

        let user_answer = match answer.selected_option_index {
            Some(index) => Some(question.options.get(index).ok_or(
                ScoringError::SelectionOutOfRange {
                    question_id: question.id,
                    index,
                },
            )?),
            None => None,
        };

        let tally = domain_scores.entry(question.domain).or_default();
        tally.total += 1;

        if question.is_correct(answer.selected_option_index) {
            correct_count += 1;
            tally.correct += 1;
        } else {
            missed_questions.push(MissedQuestion {
                question_id: question.id,
                question_text: question.prompt.clone(),
                user_answer: user_answer
                    .map(String::as_str)
                    .unwrap_or(NOT_ANSWERED)
                    .to_string(),
                correct_answer: question.correct_option().to_string(),
                domain: question.domain,
            });
        }
    }

    let total_questions = questions.len() as u32;

    Ok(ResultsSummary {
        score_percent: percent(correct_count, total_questions),
        correct_count,
        total_questions,
        duration_seconds: elapsed_seconds,
        domain_scores,
        missed_questions,
    })
}

/// Per-domain percentages and pass flags, in domain order.
pub fn domain_breakdown(summary: &ResultsSummary) -> Vec<DomainBreakdown> {
    summary
        .domain_scores
        .iter()
        .map(|(domain, tally)| {
            let pct = percent(tally.correct, tally.total);
            DomainBreakdown {
                domain: *domain,
                correct: tally.correct,
                total: tally.total,
                percent: pct,
                passed: tally.total > 0 && is_passing(pct),
            }
        })
        .collect()
}
