// src/models/mod.rs

pub mod answer;
pub mod exam;
pub mod exam_attempt;
pub mod question;
pub mod results;
pub mod user;
