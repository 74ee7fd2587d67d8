// src/services/session.rs

//! In-memory exam attempts.
//!
//! Each session owns the answer ledger of one attempt. Sessions are private to
//! the user that started them and disappear when abandoned, when the process
//! restarts, or after sitting idle longer than the configured retention.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    models::{
        answer::{AnswerEntry, AnswerLedger, LedgerError},
        results::ResultsSummary,
    },
    services::{
        question_bank::QuestionBank,
        scoring::{self, ScoringError},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("exam attempt {0} not found")]
    NotFound(Uuid),

    #[error("exam attempt {0} has already been submitted")]
    AlreadySubmitted(Uuid),

    #[error("exam attempt {0} has not been submitted yet")]
    NotSubmitted(Uuid),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// One exam attempt.
#[derive(Debug, Clone)]
pub struct ExamSession {
    pub id: Uuid,
    pub user_id: i64,
    pub ledger: AnswerLedger,
    pub started_at: DateTime<Utc>,
    started: Instant,
    last_activity: Instant,
    results: Option<ResultsSummary>,
}

impl ExamSession {
    fn new(user_id: i64, bank: &QuestionBank) -> Self {
        let now = Instant::now();
        ExamSession {
            id: Uuid::new_v4(),
            user_id,
            ledger: AnswerLedger::for_questions(bank.questions()),
            started_at: Utc::now(),
            started: now,
            last_activity: now,
            results: None,
        }
    }

    pub fn status(&self) -> AttemptStatus {
        if self.results.is_some() {
            AttemptStatus::Submitted
        } else {
            AttemptStatus::InProgress
        }
    }

    /// Seconds since the attempt started, frozen once submitted.
    pub fn elapsed_seconds(&self) -> u64 {
        match &self.results {
            Some(results) => results.duration_seconds,
            None => self.started.elapsed().as_secs(),
        }
    }

    pub fn results(&self) -> Option<&ResultsSummary> {
        self.results.as_ref()
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.results.is_some() {
            return Err(SessionError::AlreadySubmitted(self.id));
        }
        Ok(())
    }
}

/// Shared store of exam sessions, cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, ExamSession>>>,
    retention: Duration,
}

impl SessionStore {
    pub fn new(retention: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Begins a new attempt with every question unanswered.
    pub async fn start(&self, user_id: i64, bank: &QuestionBank) -> ExamSession {
        let session = ExamSession::new(user_id, bank);
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        let retention = self.retention;
        sessions.retain(|_, s| s.last_activity.elapsed() <= retention);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!("Purged {} idle exam sessions", purged);
        }

        sessions.insert(session.id, session.clone());
        session
    }

    /// Returns a snapshot of the session. Reads count as activity.
    pub async fn get(&self, id: Uuid, user_id: i64) -> Result<ExamSession, SessionError> {
        self.update(id, user_id, |session| Ok(session.clone())).await
    }

    async fn update<T>(
        &self,
        id: Uuid,
        user_id: i64,
        f: impl FnOnce(&mut ExamSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.user_id == user_id)
            .ok_or(SessionError::NotFound(id))?;
        session.last_activity = Instant::now();
        f(session)
    }

    pub async fn select_answer(
        &self,
        id: Uuid,
        user_id: i64,
        bank: &QuestionBank,
        question_id: i64,
        selected: Option<usize>,
    ) -> Result<AnswerEntry, SessionError> {
        self.update(id, user_id, |session| {
            session.ensure_in_progress()?;
            let entry = session
                .ledger
                .select(bank.questions(), question_id, selected)?;
            Ok(entry.clone())
        })
        .await
    }

    pub async fn toggle_review(
        &self,
        id: Uuid,
        user_id: i64,
        question_id: i64,
    ) -> Result<AnswerEntry, SessionError> {
        self.update(id, user_id, |session| {
            session.ensure_in_progress()?;
            let entry = session.ledger.toggle_review(question_id)?;
            Ok(entry.clone())
        })
        .await
    }

    /// Freezes the ledger and scores it. A session can only be submitted once.
    ///
    /// Returns the results with the number of unanswered questions, both taken
    /// from the same frozen ledger.
    pub async fn submit(
        &self,
        id: Uuid,
        user_id: i64,
        bank: &QuestionBank,
    ) -> Result<(ResultsSummary, usize), SessionError> {
        self.update(id, user_id, |session| {
            session.ensure_in_progress()?;
            let elapsed = session.started.elapsed().as_secs();
            let summary = scoring::score(bank.questions(), session.ledger.entries(), elapsed)?;
            session.results = Some(summary.clone());
            Ok((summary, session.ledger.unanswered_count()))
        })
        .await
    }

    /// Discards an attempt, submitted or not.
    pub async fn abandon(&self, id: Uuid, user_id: i64) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(s) if s.user_id == user_id => {
                sessions.remove(&id);
                Ok(())
            }
            _ => Err(SessionError::NotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::embedded().unwrap()
    }

    #[tokio::test]
    async fn start_creates_unanswered_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();

        let session = store.start(1, &bank).await;
        assert_eq!(session.status(), AttemptStatus::InProgress);
        assert_eq!(session.ledger.entries().len(), 50);
        assert_eq!(session.ledger.answered_count(), 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn session_is_private_to_its_user() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(1, &bank).await;

        assert!(matches!(
            store.get(session.id, 2).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            store.select_answer(session.id, 2, &bank, 1, Some(0)).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            store.abandon(session.id, 2).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(store.get(session.id, 1).await.is_ok());
    }

    #[tokio::test]
    async fn answers_are_recorded_and_scored() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(7, &bank).await;

        for q in bank.questions() {
            store
                .select_answer(session.id, 7, &bank, q.id, Some(q.correct_option_index))
                .await
                .unwrap();
        }
        let entry = store.toggle_review(session.id, 7, 3).await.unwrap();
        assert!(entry.marked_for_review);

        let (summary, unanswered) = store.submit(session.id, 7, &bank).await.unwrap();
        assert_eq!(summary.score_percent, 100);
        assert_eq!(unanswered, 0);

        let stored = store.get(session.id, 7).await.unwrap();
        assert_eq!(stored.status(), AttemptStatus::Submitted);
        assert_eq!(stored.results(), Some(&summary));
        assert_eq!(stored.elapsed_seconds(), summary.duration_seconds);
    }

    #[tokio::test]
    async fn submitted_session_is_frozen() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(7, &bank).await;
        store.submit(session.id, 7, &bank).await.unwrap();

        assert!(matches!(
            store.submit(session.id, 7, &bank).await,
            Err(SessionError::AlreadySubmitted(_))
        ));
        assert!(matches!(
            store.select_answer(session.id, 7, &bank, 1, Some(1)).await,
            Err(SessionError::AlreadySubmitted(_))
        ));
        assert!(matches!(
            store.toggle_review(session.id, 7, 1).await,
            Err(SessionError::AlreadySubmitted(_))
        ));
    }

    #[tokio::test]
    async fn invalid_selection_surfaces_ledger_error() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(7, &bank).await;

        assert!(matches!(
            store.select_answer(session.id, 7, &bank, 1, Some(9)).await,
            Err(SessionError::Ledger(LedgerError::OptionOutOfRange { .. }))
        ));
        assert!(matches!(
            store.select_answer(session.id, 7, &bank, 500, Some(0)).await,
            Err(SessionError::Ledger(LedgerError::UnknownQuestion(500)))
        ));
    }

    #[tokio::test]
    async fn abandon_removes_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(7, &bank).await;

        store.abandon(session.id, 7).await.unwrap();
        assert_eq!(store.len().await, 0);
        assert!(matches!(
            store.get(session.id, 7).await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn idle_sessions_are_purged_on_start() {
        let store = SessionStore::new(Duration::ZERO);
        let bank = bank();
        let first = store.start(7, &bank).await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.start(7, &bank).await;

        assert_eq!(store.len().await, 1);
        assert!(store.get(first.id, 7).await.is_err());
        assert!(store.get(second.id, 7).await.is_ok());
    }

    #[tokio::test]
    async fn submit_result_survives_abandon() {
        let store = SessionStore::new(Duration::from_secs(60));
        let bank = bank();
        let session = store.start(7, &bank).await;
        store
            .select_answer(session.id, 7, &bank, 1, Some(1))
            .await
            .unwrap();

        let (summary, unanswered) = store.submit(session.id, 7, &bank).await.unwrap();
        store.abandon(session.id, 7).await.unwrap();

        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.total_questions, 50);
        assert_eq!(unanswered, 49);
    }

    #[tokio::test]
    async fn reads_keep_a_session_alive() {
        let store = SessionStore::new(Duration::from_millis(300));
        let bank = bank();
        let polled = store.start(7, &bank).await;
        let idle = store.start(7, &bank).await;

        tokio::time::sleep(Duration::from_millis(200)).await;
        store.get(polled.id, 7).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        store.start(7, &bank).await;

        assert!(store.get(polled.id, 7).await.is_ok());
        assert!(matches!(
            store.get(idle.id, 7).await,
            Err(SessionError::NotFound(_))
        ));
    }
}
