//! Remote judge client
//!
//! The judge is an external HTTP service that compiles and runs untrusted
//! code against test cases. This module hides its asynchronous batch
//! protocol behind two operations: submit a batch, then await results.

pub mod client;
pub mod languages;
pub mod types;

pub use client::{HttpJudgeClient, JudgeClient};
pub use languages::LanguageMap;
pub use types::{CaseResult, CaseStatus, JudgeCase};

#[cfg(test)]
pub use client::MockJudgeClient;
