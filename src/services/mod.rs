//! Business logic services

pub mod evaluation;
pub mod scoring;

pub use evaluation::{EvaluationRequest, SubmissionEvaluator};
pub use scoring::ScoringEngine;
