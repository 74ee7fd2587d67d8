// src/services/question_bank.rs

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::models::question::{Domain, Question};

/// The exam's questions, compiled into the binary.
const EMBEDDED_QUESTIONS: &str = include_str!("../../data/questions.json");

#[derive(Debug, Error)]
pub enum BankError {
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank is empty")]
    Empty,

    #[error("question id {0} must be positive")]
    InvalidId(i64),

    #[error("question id {0} appears more than once")]
    DuplicateId(i64),

    #[error("question {0} has no options")]
    NoOptions(i64),

    #[error("question {id} marks option {index} as correct but has {options} options")]
    CorrectIndexOutOfRange { id: i64, index: usize, options: usize },
}

/// Immutable, validated, ordered sequence of exam questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validates and wraps a list of questions.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::new();
        for q in &questions {
            if q.id <= 0 {
                return Err(BankError::InvalidId(q.id));
            }
            if !seen.insert(q.id) {
                return Err(BankError::DuplicateId(q.id));
            }
            if q.options.is_empty() {
                return Err(BankError::NoOptions(q.id));
            }
            if q.correct_option_index >= q.options.len() {
                return Err(BankError::CorrectIndexOutOfRange {
                    id: q.id,
                    index: q.correct_option_index,
                    options: q.options.len(),
                });
            }
        }

        Ok(QuestionBank { questions })
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    /// The Network+ bank shipped with the service.
    pub fn embedded() -> Result<Self, BankError> {
        Self::from_json(EMBEDDED_QUESTIONS)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions per domain, every domain included.
    pub fn domain_counts(&self) -> BTreeMap<Domain, usize> {
        let mut counts: BTreeMap<Domain, usize> = Domain::ALL.iter().map(|d| (*d, 0)).collect();
        for q in &self.questions {
            *counts.entry(q.domain).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: i64, options: usize, correct: usize) -> Question {
        Question {
            id,
            prompt: "p".to_string(),
            options: (0..options).map(|i| format!("opt {}", i)).collect(),
            correct_option_index: correct,
            domain: Domain::Infrastructure,
            explanation: "e".to_string(),
        }
    }

    #[test]
    fn embedded_bank_has_fifty_questions() {
        let bank = QuestionBank::embedded().unwrap();
        assert_eq!(bank.len(), 50);

        let counts = bank.domain_counts();
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|c| *c == 10));
    }

    #[test]
    fn embedded_bank_lookup() {
        let bank = QuestionBank::embedded().unwrap();
        let first = &bank.questions()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.domain, Domain::NetworkingConcepts);
        assert_eq!(first.correct_option(), "Network Layer");
        assert!(!bank.is_empty());
        assert!(bank.questions().iter().all(|q| q.id != 51));
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(matches!(QuestionBank::new(vec![]), Err(BankError::Empty)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionBank::new(vec![q(1, 4, 0), q(1, 4, 0)]).unwrap_err();
        assert!(matches!(err, BankError::DuplicateId(1)));
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = QuestionBank::new(vec![q(0, 4, 0)]).unwrap_err();
        assert!(matches!(err, BankError::InvalidId(0)));
    }

    #[test]
    fn rejects_correct_index_out_of_range() {
        let err = QuestionBank::new(vec![q(3, 4, 4)]).unwrap_err();
        assert!(matches!(
            err,
            BankError::CorrectIndexOutOfRange {
                id: 3,
                index: 4,
                options: 4
            }
        ));

        let err = QuestionBank::new(vec![q(4, 0, 0)]).unwrap_err();
        assert!(matches!(err, BankError::NoOptions(4)));
    }

    #[test]
    fn rejects_unknown_domain() {
        let raw = r#"[{"id":1,"prompt":"p","options":["a"],"correct_option_index":0,
                       "domain":"Cooking","explanation":"e"}]"#;
        assert!(matches!(
            QuestionBank::from_json(raw),
            Err(BankError::Parse(_))
        ));
    }
}
