// src/services/review.rs

use crate::models::{
    answer::AnswerEntry,
    exam::{ReviewFilter, ReviewItem, ReviewParams},
    question::Question,
};

/// Pairs every question with its answer, then applies the correctness and
/// domain filters. Order follows the bank.
pub fn review_items(
    questions: &[Question],
    answers: &[AnswerEntry],
    params: &ReviewParams,
) -> Vec<ReviewItem> {
    questions
        .iter()
        .zip(answers)
        .map(|(q, a)| ReviewItem {
            question_id: q.id,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            domain: q.domain,
            selected_option_index: a.selected_option_index,
            correct_option_index: q.correct_option_index,
            is_correct: q.is_correct(a.selected_option_index),
            marked_for_review: a.marked_for_review,
            explanation: q.explanation.clone(),
        })
        .filter(|item| match params.filter {
            ReviewFilter::All => true,
            ReviewFilter::Correct => item.is_correct,
            ReviewFilter::Incorrect => !item.is_correct,
        })
        .filter(|item| params.domain.is_none_or(|d| d == item.domain))
        .collect()
}

/// Count of correctly answered questions, for the filter tabs.
pub fn correct_count(questions: &[Question], answers: &[AnswerEntry]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.is_correct(a.selected_option_index))
        .count()
}
