//! Judge client trait and HTTP implementation

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    config::JudgeConfig,
    error::{AppError, AppResult},
};

use super::types::{
    BatchStatusResponse, BatchSubmitRequest, CaseResult, CaseStatus, CreatedCase, JudgeCase,
};

/// Client for the remote judge's batch protocol
///
/// Both operations are order-preserving: result `i` always corresponds to
/// case/token `i`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Submit a batch of cases; returns one opaque token per case
    async fn submit_batch(&self, cases: Vec<JudgeCase>) -> AppResult<Vec<String>>;

    /// Poll until every case is terminal; returns one result per token
    async fn await_results(&self, tokens: Vec<String>) -> AppResult<Vec<CaseResult>>;
}

/// HTTP judge client with bounded polling
///
/// Constructed once at startup and injected into the evaluator; owns no
/// state beyond the connection pool inside [`reqwest::Client`].
pub struct HttpJudgeClient {
    http: reqwest::Client,
    config: JudgeConfig,
}

impl HttpJudgeClient {
    /// Create a new judge client
    pub fn new(config: JudgeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn batch_url(&self) -> String {
        format!("{}/submissions/batch", self.config.base_url)
    }

    fn with_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut request = request;
        if let Some(key) = &self.config.api_key {
            request = request.header("x-rapidapi-key", key);
        }
        if let Some(host) = &self.config.api_host {
            request = request.header("x-rapidapi-host", host);
        }
        request
    }
}

#[async_trait]
impl JudgeClient for HttpJudgeClient {
    async fn submit_batch(&self, cases: Vec<JudgeCase>) -> AppResult<Vec<String>> {
        let response = self
            .with_headers(
                self.http
                    .post(self.batch_url())
                    .query(&[("base64_encoded", "false")])
                    .json(&BatchSubmitRequest { submissions: cases }),
            )
            .send()
            .await?
            .error_for_status()?;

        let created: Vec<CreatedCase> = response.json().await?;
        Ok(created.into_iter().map(|c| c.token).collect())
    }

    async fn await_results(&self, tokens: Vec<String>) -> AppResult<Vec<CaseResult>> {
        let joined = tokens.join(",");
        let deadline = Instant::now() + self.config.poll_timeout();

        loop {
            let response = self
                .with_headers(self.http.get(self.batch_url()).query(&[
                    ("tokens", joined.as_str()),
                    ("base64_encoded", "false"),
                    ("fields", "*"),
                ]))
                .send()
                .await?
                .error_for_status()?;

            let batch: BatchStatusResponse = response.json().await?;

            // Some cases may be terminal while others are still queued;
            // keep polling until the whole batch is done.
            let all_terminal = batch.submissions.len() == tokens.len()
                && batch
                    .submissions
                    .iter()
                    .all(|r| CaseStatus::from_id(r.status_id).is_terminal());

            if all_terminal {
                return Ok(batch.submissions.into_iter().map(CaseResult::from).collect());
            }

            if Instant::now() + self.config.poll_interval() >= deadline {
                tracing::warn!(
                    tokens = tokens.len(),
                    timeout_secs = self.config.poll_timeout_secs,
                    "judge polling deadline exceeded"
                );
                return Err(AppError::JudgeTimeout(self.config.poll_timeout_secs));
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::judge::languages::LanguageMap;

    /// Minimal judge stand-in: answers every request with 200 and the body
    /// for the current hit count (the last body repeats).
    async fn spawn_judge_stub(bodies: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let idx = seen.fetch_add(1, Ordering::SeqCst).min(bodies.len() - 1);
                let body = bodies[idx];
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn config(base_url: String, poll_interval_ms: u64, poll_timeout_secs: u64) -> JudgeConfig {
        JudgeConfig {
            base_url,
            api_key: None,
            api_host: None,
            poll_interval_ms,
            poll_timeout_secs,
            languages: LanguageMap::with_defaults(),
        }
    }

    #[tokio::test]
    async fn test_polling_deadline_yields_judge_timeout() {
        // The stub never leaves `processing`, so only the deadline can
        // terminate the loop.
        let (base_url, _) = spawn_judge_stub(vec![r#"{"submissions":[{"status_id":2}]}"#]).await;
        let client = HttpJudgeClient::new(config(base_url, 600, 1));

        let err = client
            .await_results(vec!["tok0".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::JudgeTimeout(1)));
    }

    #[tokio::test]
    async fn test_partial_batch_keeps_polling_until_all_terminal() {
        // First poll: one case done, one still queued. Second poll: both
        // terminal.
        let (base_url, hits) = spawn_judge_stub(vec![
            r#"{"submissions":[{"status_id":3,"time":"0.01","memory":128},{"status_id":1}]}"#,
            r#"{"submissions":[{"status_id":3,"time":"0.01","memory":128},{"status_id":5}]}"#,
        ])
        .await;
        let client = HttpJudgeClient::new(config(base_url, 10, 10));

        let results = client
            .await_results(vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, CaseStatus::Accepted);
        assert_eq!(results[1].status, CaseStatus::WrongAnswer);
        assert!(hits.load(Ordering::SeqCst) >= 2);
    }
}
