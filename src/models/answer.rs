// src/models/answer.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::question::Question;

/// The user's response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: i64,

    /// `None` means unanswered. Never defaults to a valid option index.
    pub selected_option_index: Option<usize>,

    /// UI affordance only, ignored by scoring.
    pub marked_for_review: bool,
}

impl AnswerEntry {
    pub fn unanswered(question_id: i64) -> Self {
        AnswerEntry {
            question_id,
            selected_option_index: None,
            marked_for_review: false,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.selected_option_index.is_some()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("question {0} is not part of this exam")]
    UnknownQuestion(i64),

    #[error("option {index} does not exist for question {question_id} ({options} options)")]
    OptionOutOfRange {
        question_id: i64,
        index: usize,
        options: usize,
    },
}

/// Order-aligned record of answers, exactly one entry per question in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerLedger {
    entries: Vec<AnswerEntry>,
}

impl AnswerLedger {
    /// Starts a ledger with every question unanswered and unmarked.
    pub fn for_questions(questions: &[Question]) -> Self {
        AnswerLedger {
            entries: questions
                .iter()
                .map(|q| AnswerEntry::unanswered(q.id))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[AnswerEntry] {
        &self.entries
    }

    fn position(&self, question_id: i64) -> Result<usize, LedgerError> {
        self.entries
            .iter()
            .position(|e| e.question_id == question_id)
            .ok_or(LedgerError::UnknownQuestion(question_id))
    }

    /// Selects, changes or clears (`None`) the answer to a question.
    ///
    /// `questions` must be the bank this ledger was created from.
    pub fn select(
        &mut self,
        questions: &[Question],
        question_id: i64,
        selected: Option<usize>,
    ) -> Result<&AnswerEntry, LedgerError> {
        let pos = self.position(question_id)?;
        let question = questions
            .get(pos)
            .filter(|q| q.id == question_id)
            .ok_or(LedgerError::UnknownQuestion(question_id))?;

        if let Some(index) = selected {
            if index >= question.options.len() {
                return Err(LedgerError::OptionOutOfRange {
                    question_id,
                    index,
                    options: question.options.len(),
                });
            }
        }

        let entry = &mut self.entries[pos];
        entry.selected_option_index = selected;
        Ok(entry)
    }

    pub fn toggle_review(&mut self, question_id: i64) -> Result<&AnswerEntry, LedgerError> {
        let pos = self.position(question_id)?;
        let entry = &mut self.entries[pos];
        entry.marked_for_review = !entry.marked_for_review;
        Ok(entry)
    }

    pub fn answered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_answered()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.entries.len() - self.answered_count()
    }

    pub fn marked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.marked_for_review).count()
    }
}
