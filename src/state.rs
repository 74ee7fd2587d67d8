use std::sync::Arc;

use crate::{
    config::Config,
    services::{attempt_store::AttemptStore, question_bank::QuestionBank, session::SessionStore},
};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub bank: Arc<QuestionBank>,
    pub sessions: SessionStore,
    pub attempts: Arc<dyn AttemptStore>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.bank.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AttemptStore> {
    fn from_ref(state: &AppState) -> Self {
        state.attempts.clone()
    }
}
