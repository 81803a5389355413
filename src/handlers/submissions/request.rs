//! Submission request types

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    models::SubmissionFilter,
    services::EvaluationRequest,
};

/// Request body for creating a submission
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    #[validate(length(min = 1, max = 32))]
    pub language: String,
    #[validate(length(min = 1))]
    pub source_code: String,
}

impl From<SubmitRequest> for EvaluationRequest {
    fn from(req: SubmitRequest) -> Self {
        Self {
            user_id: req.user_id,
            problem_id: req.problem_id,
            contest_id: req.contest_id,
            language: req.language,
            source_code: req.source_code,
        }
    }
}

/// Request body for running code against the sample cases
#[derive(Debug, Deserialize, Validate)]
pub struct RunRequest {
    pub user_id: Uuid,
    pub problem_id: Uuid,
    #[validate(length(min = 1, max = 32))]
    pub language: String,
    #[validate(length(min = 1))]
    pub source_code: String,
}

impl From<RunRequest> for EvaluationRequest {
    fn from(req: RunRequest) -> Self {
        Self {
            user_id: req.user_id,
            problem_id: req.problem_id,
            contest_id: None,
            language: req.language,
            source_code: req.source_code,
        }
    }
}

/// Query parameters for listing submissions
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub user_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    pub contest_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Normalize into a repository filter with clamped pagination
    pub fn into_filter(self) -> SubmissionFilter {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        SubmissionFilter {
            user_id: self.user_id,
            problem_id: self.problem_id,
            contest_id: self.contest_id,
            offset: (i64::from(page) - 1) * i64::from(limit),
            limit: i64::from(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let filter = ListQuery::default().into_filter();
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 20);

        let filter = ListQuery {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(filter.limit, 100);
        assert_eq!(filter.offset, 200);

        let filter = ListQuery {
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 1);
    }
}
