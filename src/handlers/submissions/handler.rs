//! Submission handler functions

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::{
    request::{ListQuery, RunRequest, SubmitRequest},
    response::{ListResponse, RunResponse, SubmissionResponse},
};

/// Create a submission and judge it against the hidden test suite
///
/// The response carries the terminal verdict; judging happens within the
/// request, so slow problems take as long as the judge takes.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    request.validate()?;

    let submission = state.evaluator().evaluate(request.into()).await?;
    Ok((StatusCode::CREATED, Json(submission.into())))
}

/// Run code against the sample cases without recording a submission
pub async fn run_samples(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> AppResult<Json<RunResponse>> {
    request.validate()?;

    let results = state.evaluator().run_samples(request.into()).await?;
    Ok(Json(RunResponse { results }))
}

/// Fetch a single submission by id
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = state
        .submissions()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {id}")))?;

    Ok(Json(submission.into()))
}

/// List submissions with optional filters and pagination
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListResponse>> {
    let (submissions, total) = state.submissions().list(query.into_filter()).await?;

    Ok(Json(ListResponse {
        submissions: submissions.into_iter().map(Into::into).collect(),
        total,
    }))
}
