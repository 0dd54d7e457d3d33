//! Waits for a remote run to reach a terminal state.

use std::time::Duration;

use relay_openai::api::{Run, RunStatus};
use relay_openai::{AssistantApi, OpenAIError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How a run wait ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(Run),
    /// Terminal but not completed (`cancelled`, `failed`, `expired`, `incomplete`).
    Failed(Run),
    TimedOut,
    Cancelled,
}

/// Fixed-interval run poller with an optional deadline.
#[derive(Debug, Clone)]
pub struct RunPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl RunPoller {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Poll `run_id` until it is terminal, the deadline passes or `cancel` fires.
    pub async fn wait(
        &self,
        api: &dyn AssistantApi,
        thread_id: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, OpenAIError> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let run = tokio::select! {
                _ = cancel.cancelled() => return Ok(RunOutcome::Cancelled),
                run = api.retrieve_run(thread_id, run_id) => run?,
            };

            match run.status {
                RunStatus::Completed => {
                    debug!("Run {} completed after {} polls", run_id, attempts);
                    return Ok(RunOutcome::Completed(run));
                }
                status if status.is_terminal() => {
                    warn!("Run {} ended with status {:?}", run_id, status);
                    return Ok(RunOutcome::Failed(run));
                }
                _ => {}
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!("Run {} still {:?} after {} polls, giving up", run_id, run.status, attempts);
                return Ok(RunOutcome::TimedOut);
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(RunOutcome::Cancelled),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_openai::OpenAIAssistantClient;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn run_body(status: &str) -> serde_json::Value {
        serde_json::json!({"id": "R1", "thread_id": "T1", "assistant_id": "A1", "status": status})
    }

    async fn mount_status(server: &MockServer, status: &str, times: Option<u64>) {
        let mock = Mock::given(matchers::method("GET"))
            .and(matchers::path("/threads/T1/runs/R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body(status)));
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(server).await;
    }

    fn poller() -> RunPoller {
        RunPoller::new(Duration::from_millis(10), Some(Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_wait_until_completed() {
        let server = MockServer::start().await;
        mount_status(&server, "queued", Some(1)).await;
        mount_status(&server, "in_progress", Some(2)).await;
        mount_status(&server, "completed", None).await;

        let api = OpenAIAssistantClient::with_url("key".to_string(), server.uri());
        let outcome = poller()
            .wait(&api, "T1", "R1", &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(run) if run.id == "R1"));
    }

    #[tokio::test]
    async fn test_wait_failed_statuses() {
        for status in ["failed", "cancelled", "expired", "incomplete"] {
            let server = MockServer::start().await;
            mount_status(&server, status, None).await;

            let api = OpenAIAssistantClient::with_url("key".to_string(), server.uri());
            let outcome = poller()
                .wait(&api, "T1", "R1", &CancellationToken::new())
                .await
                .unwrap();
            assert!(matches!(outcome, RunOutcome::Failed(_)), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let server = MockServer::start().await;
        mount_status(&server, "in_progress", None).await;

        let api = OpenAIAssistantClient::with_url("key".to_string(), server.uri());
        let poller = RunPoller::new(Duration::from_millis(10), Some(Duration::from_millis(100)));
        let outcome = poller
            .wait(&api, "T1", "R1", &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::TimedOut));
    }

    #[tokio::test]
    async fn test_wait_cancelled() {
        let server = MockServer::start().await;
        mount_status(&server, "in_progress", None).await;

        let api = OpenAIAssistantClient::with_url("key".to_string(), server.uri());
        let poller = RunPoller::new(Duration::from_millis(10), None);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let outcome = poller.wait(&api, "T1", "R1", &cancel).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_wait_propagates_remote_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/threads/T1/runs/R1"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"error": {"message": "No run found with id 'R1'."}}"#,
            ))
            .mount(&server)
            .await;

        let api = OpenAIAssistantClient::with_url("key".to_string(), server.uri());
        let err = poller()
            .wait(&api, "T1", "R1", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No run found"));
    }
}
