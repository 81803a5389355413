//! Submission evaluation pipeline
//!
//! One submission becomes one pending row, one judge batch, and exactly one
//! terminal update. Once the pending row exists the pipeline guarantees
//! progress: any failure past that point finalizes the row to `error`
//! before the typed error propagates to the caller.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    constants::MAX_SOURCE_CODE_SIZE,
    db::repositories::{ContestStore, ProblemStore, SubmissionStore, UserStore},
    error::{AppError, AppResult},
    judge::{CaseResult, CaseStatus, JudgeCase, JudgeClient, LanguageMap},
    models::{
        ContestStatus, NewSubmission, Problem, Submission, SubmissionOutcome, SubmissionStatus,
        SuiteKind, TestCase,
    },
    services::scoring::ScoringEngine,
};

/// A request to evaluate source code against a problem
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language: String,
    pub source_code: String,
}

/// Orchestrates the judge round trip for submissions and sample runs
pub struct SubmissionEvaluator {
    submissions: Arc<dyn SubmissionStore>,
    problems: Arc<dyn ProblemStore>,
    users: Arc<dyn UserStore>,
    contests: Arc<dyn ContestStore>,
    judge: Arc<dyn JudgeClient>,
    scoring: Arc<ScoringEngine>,
    languages: LanguageMap,
}

impl SubmissionEvaluator {
    /// Create a new evaluator
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        problems: Arc<dyn ProblemStore>,
        users: Arc<dyn UserStore>,
        contests: Arc<dyn ContestStore>,
        judge: Arc<dyn JudgeClient>,
        scoring: Arc<ScoringEngine>,
        languages: LanguageMap,
    ) -> Self {
        Self {
            submissions,
            problems,
            users,
            contests,
            judge,
            scoring,
            languages,
        }
    }

    /// Evaluate a submission against the problem's hidden test suite
    ///
    /// Validates the request, records a pending submission, runs the judge
    /// batch and applies the terminal outcome. Side effects that follow the
    /// verdict (solved-set update, leaderboard recompute) are best-effort
    /// and never fail an already judged submission.
    pub async fn evaluate(&self, request: EvaluationRequest) -> AppResult<Submission> {
        let language_id = self.language_id(&request.language)?;
        validate_source(&request.source_code)?;

        if let Some(contest_id) = request.contest_id {
            self.check_contest_submission(contest_id, &request).await?;
        }

        self.users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", request.user_id)))?;

        let (problem, cases) = self.load_suite(request.problem_id, SuiteKind::Hidden).await?;
        if cases.is_empty() {
            return Err(AppError::Validation(
                "Problem has no test cases to judge against".to_string(),
            ));
        }

        let pending = self
            .submissions
            .create(NewSubmission {
                user_id: request.user_id,
                problem_id: request.problem_id,
                contest_id: request.contest_id,
                language: request.language.clone(),
                source_code: request.source_code.clone(),
                test_cases_total: cases.len() as i32,
            })
            .await?;

        tracing::info!(
            submission_id = %pending.id,
            problem_id = %request.problem_id,
            cases = cases.len(),
            "Submission created, dispatching to judge"
        );

        // The pending row exists now. From here on, every failure path
        // must still leave the submission in a terminal state.
        let judged = match self
            .judge_and_finalize(&pending, language_id, &request.source_code, &problem, &cases)
            .await
        {
            Ok(judged) => judged,
            Err(e) => {
                self.fail_submission(pending.id, &e.to_string()).await;
                return Err(e);
            }
        };

        if judged.is_accepted() {
            if let Err(e) = self
                .users
                .add_solved_problem(request.user_id, request.problem_id)
                .await
            {
                tracing::error!(
                    submission_id = %judged.id,
                    "Failed to record solved problem: {}",
                    e
                );
            }
        }

        if let Some(contest_id) = request.contest_id {
            if let Err(e) = self.scoring.recompute(contest_id).await {
                tracing::error!(
                    %contest_id,
                    submission_id = %judged.id,
                    "Leaderboard recompute failed after judging: {}",
                    e
                );
            }
        }

        Ok(judged)
    }

    /// Run source code against the sample suite without recording anything
    pub async fn run_samples(&self, request: EvaluationRequest) -> AppResult<Vec<CaseResult>> {
        let language_id = self.language_id(&request.language)?;
        validate_source(&request.source_code)?;

        let (problem, cases) = self.load_suite(request.problem_id, SuiteKind::Sample).await?;
        if cases.is_empty() {
            return Err(AppError::Validation(
                "Problem has no sample test cases".to_string(),
            ));
        }

        let tokens = self
            .judge
            .submit_batch(build_batch(
                &request.source_code,
                language_id,
                &problem,
                &cases,
            ))
            .await?;
        self.judge.await_results(tokens).await
    }

    fn language_id(&self, language: &str) -> AppResult<u32> {
        self.languages.id_for(language).ok_or_else(|| {
            AppError::UnsupportedLanguage(format!(
                "{language} (supported: {})",
                self.languages.names().join(", ")
            ))
        })
    }

    async fn check_contest_submission(
        &self,
        contest_id: Uuid,
        request: &EvaluationRequest,
    ) -> AppResult<()> {
        let contest = self
            .contests
            .find_by_id(contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contest {contest_id}")))?;

        if contest.status() != ContestStatus::Ongoing {
            return Err(AppError::Forbidden(format!(
                "Contest is {}, submissions are only accepted while it is ongoing",
                contest.status()
            )));
        }
        if !self.contests.has_problem(contest_id, request.problem_id).await? {
            return Err(AppError::Forbidden(
                "Problem is not part of this contest".to_string(),
            ));
        }
        if !self.contests.is_participant(contest_id, request.user_id).await? {
            return Err(AppError::Forbidden(
                "User is not registered for this contest".to_string(),
            ));
        }

        Ok(())
    }

    async fn load_suite(
        &self,
        problem_id: Uuid,
        suite: SuiteKind,
    ) -> AppResult<(Problem, Vec<TestCase>)> {
        let problem = self
            .problems
            .find_by_id(problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Problem {problem_id}")))?;
        let cases = self.problems.test_cases(problem_id, suite).await?;
        Ok((problem, cases))
    }

    async fn judge_and_finalize(
        &self,
        pending: &Submission,
        language_id: u32,
        source_code: &str,
        problem: &Problem,
        cases: &[TestCase],
    ) -> AppResult<Submission> {
        let tokens = self
            .judge
            .submit_batch(build_batch(source_code, language_id, problem, cases))
            .await?;
        let results = self.judge.await_results(tokens).await?;

        let outcome = reduce_case_results(&results);
        self.submissions.finalize(pending.id, outcome).await
    }

    /// Best-effort finalization to `error` when the pipeline breaks mid-flight
    async fn fail_submission(&self, id: Uuid, reason: &str) {
        let outcome = SubmissionOutcome {
            status: SubmissionStatus::Error,
            test_cases_passed: 0,
            runtime_ms: 0.0,
            memory_kb: 0,
            error_message: Some(reason.to_string()),
        };
        if let Err(e) = self.submissions.finalize(id, outcome).await {
            tracing::error!(submission_id = %id, "Failed to mark submission as errored: {}", e);
        }
    }
}

fn validate_source(source_code: &str) -> AppResult<()> {
    if source_code.trim().is_empty() {
        return Err(AppError::Validation("Source code is empty".to_string()));
    }
    if source_code.len() as u64 > MAX_SOURCE_CODE_SIZE {
        return Err(AppError::Validation(format!(
            "Source code exceeds {MAX_SOURCE_CODE_SIZE} bytes"
        )));
    }
    Ok(())
}

fn build_batch(
    source_code: &str,
    language_id: u32,
    problem: &Problem,
    cases: &[TestCase],
) -> Vec<JudgeCase> {
    cases
        .iter()
        .map(|case| JudgeCase {
            source_code: source_code.to_string(),
            language_id,
            stdin: case.input.clone(),
            expected_output: case.expected_output.clone(),
            cpu_time_limit: problem.time_limit_seconds(),
            memory_limit: i64::from(problem.memory_limit_kb),
        })
        .collect()
}

/// Reduce per-case judge results into one submission outcome
///
/// Every case is counted toward `test_cases_passed`, even those after the
/// first failure. Runtime is summed and memory is the peak over accepted
/// cases only. The first non-accepted case decides the verdict and the
/// error message.
pub fn reduce_case_results(results: &[CaseResult]) -> SubmissionOutcome {
    let mut outcome = SubmissionOutcome {
        status: SubmissionStatus::Accepted,
        test_cases_passed: 0,
        runtime_ms: 0.0,
        memory_kb: 0,
        error_message: None,
    };

    for result in results {
        match result.status {
            CaseStatus::Accepted => {
                outcome.test_cases_passed += 1;
                outcome.runtime_ms += result.time_ms;
                outcome.memory_kb = outcome.memory_kb.max(result.memory_kb);
            }
            status if outcome.error_message.is_none() => {
                outcome.status = match status {
                    CaseStatus::WrongAnswer | CaseStatus::TimeLimitExceeded => {
                        SubmissionStatus::Wrong
                    }
                    _ => SubmissionStatus::Error,
                };
                outcome.error_message = Some(describe_failure(result));
            }
            _ => {}
        }
    }

    if results.is_empty() {
        outcome.status = SubmissionStatus::Error;
        outcome.error_message = Some("Judge returned no results".to_string());
    }

    outcome
}

fn describe_failure(result: &CaseResult) -> String {
    if let Some(stderr) = result.stderr.as_deref().filter(|s| !s.trim().is_empty()) {
        return stderr.to_string();
    }
    if let Some(message) = result.message.as_deref().filter(|s| !s.trim().is_empty()) {
        return message.to_string();
    }
    format!("Test case failed: {}", result.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::{
        db::repositories::{
            MockContestStore, MockProblemStore, MockSubmissionStore, MockUserStore,
        },
        judge::MockJudgeClient,
        models::{Contest, User},
        realtime::NoopPublisher,
    };

    fn case(status: CaseStatus, time_ms: f64, memory_kb: i64) -> CaseResult {
        CaseResult {
            status,
            time_ms,
            memory_kb,
            stdout: None,
            stderr: None,
            message: None,
        }
    }

    #[test]
    fn test_reduce_all_accepted() {
        let results = vec![
            case(CaseStatus::Accepted, 10.0, 512),
            case(CaseStatus::Accepted, 25.0, 2048),
            case(CaseStatus::Accepted, 5.0, 1024),
        ];
        let outcome = reduce_case_results(&results);
        assert_eq!(outcome.status, SubmissionStatus::Accepted);
        assert_eq!(outcome.test_cases_passed, 3);
        assert!((outcome.runtime_ms - 40.0).abs() < 1e-9);
        assert_eq!(outcome.memory_kb, 2048);
        assert!(outcome.error_message.is_none());
    }

    #[test]
    fn test_reduce_counts_passes_after_a_failure() {
        // Cases after the first failure still count toward passed
        let results = vec![
            case(CaseStatus::Accepted, 10.0, 100),
            case(CaseStatus::Accepted, 10.0, 100),
            case(CaseStatus::WrongAnswer, 10.0, 100),
            case(CaseStatus::Accepted, 10.0, 100),
        ];
        let outcome = reduce_case_results(&results);
        assert_eq!(outcome.status, SubmissionStatus::Wrong);
        assert_eq!(outcome.test_cases_passed, 3);
        // Metrics only aggregate over accepted cases
        assert!((outcome.runtime_ms - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduce_first_failure_decides_verdict() {
        let mut tle = case(CaseStatus::TimeLimitExceeded, 0.0, 0);
        tle.message = Some("Time limit exceeded".to_string());
        let results = vec![tle, case(CaseStatus::RuntimeError, 0.0, 0)];

        let outcome = reduce_case_results(&results);
        assert_eq!(outcome.status, SubmissionStatus::Wrong);
        assert_eq!(outcome.error_message.as_deref(), Some("Time limit exceeded"));
    }

    #[test]
    fn test_reduce_error_verdicts() {
        for status in [
            CaseStatus::RuntimeError,
            CaseStatus::CompilationError,
            CaseStatus::JudgeError(13),
        ] {
            let outcome = reduce_case_results(&[case(status, 0.0, 0)]);
            assert_eq!(outcome.status, SubmissionStatus::Error);
        }
    }

    #[test]
    fn test_reduce_prefers_stderr_over_message() {
        let mut failed = case(CaseStatus::RuntimeError, 0.0, 0);
        failed.stderr = Some("segmentation fault".to_string());
        failed.message = Some("Exited with error status 139".to_string());

        let outcome = reduce_case_results(&[failed]);
        assert_eq!(outcome.error_message.as_deref(), Some("segmentation fault"));
    }

    #[test]
    fn test_reduce_empty_results_is_an_error() {
        let outcome = reduce_case_results(&[]);
        assert_eq!(outcome.status, SubmissionStatus::Error);
        assert_eq!(outcome.test_cases_passed, 0);
    }

    // Pipeline tests with mocked stores and judge

    fn problem(id: Uuid) -> Problem {
        Problem {
            id,
            title: "Two Sum".to_string(),
            description: String::new(),
            difficulty: Some("easy".to_string()),
            time_limit_ms: 2000,
            memory_limit_kb: 262_144,
            is_public: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_case(problem_id: Uuid, order: i32) -> TestCase {
        TestCase {
            id: Uuid::new_v4(),
            problem_id,
            input: format!("input {order}"),
            expected_output: format!("output {order}"),
            is_sample: false,
            order,
            created_at: Utc::now(),
        }
    }

    fn pending_submission(request: &EvaluationRequest, total: i32) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            problem_id: request.problem_id,
            contest_id: request.contest_id,
            language: request.language.clone(),
            source_code: request.source_code.clone(),
            status: "pending".to_string(),
            test_cases_passed: 0,
            test_cases_total: total,
            runtime_ms: 0.0,
            memory_kb: 0,
            error_message: None,
            submitted_at: Utc::now(),
            judged_at: None,
        }
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            user_id: Uuid::new_v4(),
            problem_id: Uuid::new_v4(),
            contest_id: None,
            language: "c++".to_string(),
            source_code: "int main() {}".to_string(),
        }
    }

    struct Mocks {
        submissions: MockSubmissionStore,
        problems: MockProblemStore,
        users: MockUserStore,
        contests: MockContestStore,
        judge: MockJudgeClient,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                submissions: MockSubmissionStore::new(),
                problems: MockProblemStore::new(),
                users: MockUserStore::new(),
                contests: MockContestStore::new(),
                judge: MockJudgeClient::new(),
            }
        }

        fn into_evaluator(self) -> SubmissionEvaluator {
            let contests = Arc::new(self.contests);
            let submissions = Arc::new(self.submissions);
            let scoring = Arc::new(ScoringEngine::new(
                contests.clone(),
                submissions.clone(),
                Arc::new(NoopPublisher),
                20,
            ));
            SubmissionEvaluator::new(
                submissions,
                Arc::new(self.problems),
                Arc::new(self.users),
                contests,
                Arc::new(self.judge),
                scoring,
                LanguageMap::with_defaults(),
            )
        }
    }

    fn expect_problem_with_cases(mocks: &mut Mocks, count: i32) {
        mocks
            .problems
            .expect_find_by_id()
            .returning(move |id| Ok(Some(problem(id))));
        mocks.problems.expect_test_cases().returning(move |pid, _| {
            Ok((0..count).map(|i| test_case(pid, i)).collect())
        });
    }

    fn expect_known_user(mocks: &mut Mocks) {
        mocks.users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                display_name: None,
                created_at: Utc::now(),
            }))
        });
    }

    #[tokio::test]
    async fn test_accepted_submission_records_solved_problem() {
        let req = request();
        let mut mocks = Mocks::new();
        expect_known_user(&mut mocks);
        expect_problem_with_cases(&mut mocks, 2);

        let pending = pending_submission(&req, 2);
        let pending_id = pending.id;
        mocks
            .submissions
            .expect_create()
            .times(1)
            .returning(move |_| Ok(pending.clone()));
        mocks
            .submissions
            .expect_finalize()
            .withf(move |id, outcome| {
                *id == pending_id
                    && outcome.status == SubmissionStatus::Accepted
                    && outcome.test_cases_passed == 2
            })
            .times(1)
            .returning(move |id, outcome| {
                let req = request();
                let mut judged = pending_submission(&req, 2);
                judged.id = id;
                judged.status = outcome.status.as_str().to_string();
                judged.test_cases_passed = outcome.test_cases_passed;
                Ok(judged)
            });

        mocks
            .judge
            .expect_submit_batch()
            .withf(|cases| cases.len() == 2 && cases[0].language_id == 54)
            .returning(|cases| Ok((0..cases.len()).map(|i| format!("tok{i}")).collect()));
        mocks.judge.expect_await_results().returning(|tokens| {
            Ok(tokens
                .iter()
                .map(|_| case(CaseStatus::Accepted, 12.0, 256))
                .collect())
        });

        let user_id = req.user_id;
        let problem_id = req.problem_id;
        mocks
            .users
            .expect_add_solved_problem()
            .withf(move |u, p| *u == user_id && *p == problem_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let judged = mocks.into_evaluator().evaluate(req).await.unwrap();
        assert!(judged.is_accepted());
    }

    #[tokio::test]
    async fn test_unsupported_language_is_rejected_before_any_write() {
        let mut req = request();
        req.language = "brainfuck".to_string();

        // No store expectations: nothing may be touched
        let result = Mocks::new().into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::UnsupportedLanguage(_))));
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected() {
        let mut req = request();
        req.source_code = "   \n".to_string();

        let result = Mocks::new().into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected_before_any_write() {
        let req = request();
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(|_| Ok(None));

        let result = mocks.into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_problem_without_cases_is_rejected() {
        let req = request();
        let mut mocks = Mocks::new();
        expect_known_user(&mut mocks);
        expect_problem_with_cases(&mut mocks, 0);

        let result = mocks.into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_non_participant_is_forbidden() {
        let mut req = request();
        let contest_id = Uuid::new_v4();
        req.contest_id = Some(contest_id);

        let now = Utc::now();
        let contest = Contest {
            id: contest_id,
            title: "Weekly Round".to_string(),
            description: None,
            start_time: now - Duration::minutes(30),
            end_time: now + Duration::minutes(90),
            is_published: true,
            cached_leaderboard: serde_json::Value::Array(vec![]),
            created_at: now,
            updated_at: now,
        };

        let mut mocks = Mocks::new();
        mocks
            .contests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(contest.clone())));
        mocks.contests.expect_has_problem().returning(|_, _| Ok(true));
        mocks
            .contests
            .expect_is_participant()
            .returning(|_, _| Ok(false));

        let result = mocks.into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_ended_contest_rejects_submissions() {
        let mut req = request();
        let contest_id = Uuid::new_v4();
        req.contest_id = Some(contest_id);

        let now = Utc::now();
        let contest = Contest {
            id: contest_id,
            title: "Weekly Round".to_string(),
            description: None,
            start_time: now - Duration::minutes(180),
            end_time: now - Duration::minutes(30),
            is_published: true,
            cached_leaderboard: serde_json::Value::Array(vec![]),
            created_at: now,
            updated_at: now,
        };

        let mut mocks = Mocks::new();
        mocks
            .contests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(contest.clone())));

        let result = mocks.into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_judge_outage_finalizes_submission_to_error() {
        let req = request();
        let mut mocks = Mocks::new();
        expect_known_user(&mut mocks);
        expect_problem_with_cases(&mut mocks, 1);

        let pending = pending_submission(&req, 1);
        let pending_id = pending.id;
        mocks
            .submissions
            .expect_create()
            .returning(move |_| Ok(pending.clone()));
        mocks
            .judge
            .expect_submit_batch()
            .returning(|_| Err(AppError::UpstreamUnavailable("connection refused".to_string())));

        // The pending row must still reach a terminal state
        mocks
            .submissions
            .expect_finalize()
            .withf(move |id, outcome| {
                *id == pending_id
                    && outcome.status == SubmissionStatus::Error
                    && outcome.error_message.is_some()
            })
            .times(1)
            .returning(move |id, outcome| {
                let req = request();
                let mut errored = pending_submission(&req, 1);
                errored.id = id;
                errored.status = outcome.status.as_str().to_string();
                Ok(errored)
            });

        let result = mocks.into_evaluator().evaluate(req).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_run_samples_creates_no_submission() {
        let req = request();
        let mut mocks = Mocks::new();

        mocks
            .problems
            .expect_find_by_id()
            .returning(move |id| Ok(Some(problem(id))));
        mocks.problems.expect_test_cases().returning(move |pid, _| {
            let mut sample = test_case(pid, 0);
            sample.is_sample = true;
            Ok(vec![sample])
        });
        mocks
            .judge
            .expect_submit_batch()
            .returning(|cases| Ok((0..cases.len()).map(|i| format!("tok{i}")).collect()));
        mocks.judge.expect_await_results().returning(|tokens| {
            Ok(tokens
                .iter()
                .map(|_| case(CaseStatus::WrongAnswer, 3.0, 64))
                .collect())
        });

        // No create/finalize expectations: a sample run never touches the
        // submissions table
        let results = mocks.into_evaluator().run_samples(req).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CaseStatus::WrongAnswer);
    }
}
