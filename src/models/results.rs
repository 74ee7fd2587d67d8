// src/models/results.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Domain;

/// Marker stored as the user's answer text when a question was skipped.
pub const NOT_ANSWERED: &str = "Not answered";

/// Aggregate tally for one domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub correct: u32,
    pub total: u32,
}

/// One question the user did not answer correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedQuestion {
    pub question_id: i64,
    pub question_text: String,
    /// Text of the chosen option, or [`NOT_ANSWERED`].
    pub user_answer: String,
    pub correct_answer: String,
    pub domain: Domain,
}

/// Output of one scoring pass. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub score_percent: u32,
    pub correct_count: u32,
    pub total_questions: u32,
    pub duration_seconds: u64,
    /// Always holds every domain of [`Domain::ALL`].
    pub domain_scores: BTreeMap<Domain, DomainScore>,
    pub missed_questions: Vec<MissedQuestion>,
}

/// Per-domain row of the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainBreakdown {
    pub domain: Domain,
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub passed: bool,
}
