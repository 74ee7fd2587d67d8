// src/services/mod.rs

pub mod attempt_store;
pub mod question_bank;
pub mod review;
pub mod scoring;
pub mod session;
