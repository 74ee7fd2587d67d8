// src/models/question.rs

use serde::{Deserialize, Serialize};

/// Knowledge domains covered by the exam.
/// Declaration order is the display order of every breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Networking Concepts")]
    NetworkingConcepts,
    #[serde(rename = "Infrastructure")]
    Infrastructure,
    #[serde(rename = "Network Operations")]
    NetworkOperations,
    #[serde(rename = "Network Security")]
    NetworkSecurity,
    #[serde(rename = "Network Troubleshooting")]
    NetworkTroubleshooting,
}

impl Domain {
    /// The fixed domain set.
    pub const ALL: [Domain; 5] = [
        Domain::NetworkingConcepts,
        Domain::Infrastructure,
        Domain::NetworkOperations,
        Domain::NetworkSecurity,
        Domain::NetworkTroubleshooting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Domain::NetworkingConcepts => "Networking Concepts",
            Domain::Infrastructure => "Infrastructure",
            Domain::NetworkOperations => "Network Operations",
            Domain::NetworkSecurity => "Network Security",
            Domain::NetworkTroubleshooting => "Network Troubleshooting",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One fixed exam item from the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, correlates the question with its answer entry.
    pub id: i64,

    /// Display text of the question.
    pub prompt: String,

    /// Answer choices. The index of a choice is its identifier.
    pub options: Vec<String>,

    /// Index into `options` of the single correct choice.
    pub correct_option_index: usize,

    pub domain: Domain,

    /// Shown during review only.
    pub explanation: String,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_option_index)
    }
}

/// DTO for sending a question to a client during an attempt
/// (excludes the correct index and the explanation).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub options: Vec<String>,
    pub domain: Domain,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            id: q.id,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            domain: q.domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_serializes_as_display_name() {
        let json = serde_json::to_string(&Domain::NetworkTroubleshooting).unwrap();
        assert_eq!(json, "\"Network Troubleshooting\"");

        let parsed: Domain = serde_json::from_str("\"Infrastructure\"").unwrap();
        assert_eq!(parsed, Domain::Infrastructure);
    }

    #[test]
    fn domain_labels_match_serde_names() {
        for domain in Domain::ALL {
            let json = serde_json::to_string(&domain).unwrap();
            assert_eq!(json, format!("\"{}\"", domain.label()));
        }
    }

    #[test]
    fn public_question_hides_answer() {
        let q = Question {
            id: 7,
            prompt: "Which port does HTTPS use?".to_string(),
            options: vec!["80".to_string(), "443".to_string()],
            correct_option_index: 1,
            domain: Domain::NetworkingConcepts,
            explanation: "TLS".to_string(),
        };

        let value = serde_json::to_value(PublicQuestion::from(&q)).unwrap();
        assert_eq!(value["id"], 7);
        assert!(value.get("correct_option_index").is_none());
        assert!(value.get("explanation").is_none());
    }
}
