//! Interval-driven refetching for queries that must stay live.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::cache::{QueryClient, decode_payload};
use crate::error::{QueryError, QueryResult};
use crate::query::QueryKey;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Latest observation of a polled query.
#[derive(Debug, Clone)]
pub enum QuerySnapshot {
    /// No poll has completed yet.
    Pending,
    /// Most recent poll succeeded.
    Ready(Arc<Value>),
    /// Most recent poll failed after retries.
    Failed(QueryError),
}

impl QuerySnapshot {
    /// Whether a poll has completed, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Handle to a background poller; dropping it stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    key: QueryKey,
    updates: watch::Receiver<QuerySnapshot>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Key being polled.
    #[must_use]
    pub const fn key(&self) -> QueryKey {
        self.key
    }

    /// Most recent snapshot without waiting.
    #[must_use]
    pub fn snapshot(&self) -> QuerySnapshot {
        self.updates.borrow().clone()
    }

    /// Wait for the next completed poll.
    ///
    /// Returns `None` once the poller has stopped.
    pub async fn changed(&mut self) -> Option<QuerySnapshot> {
        self.updates.changed().await.ok()?;
        Some(self.updates.borrow_and_update().clone())
    }

    /// Decode the latest snapshot. `None` while no poll has completed.
    ///
    /// # Errors
    ///
    /// Returns the poll failure, or a decode error when the payload does not
    /// match `T`.
    pub fn latest<T: DeserializeOwned>(&self) -> Option<QueryResult<Option<T>>> {
        match self.snapshot() {
            QuerySnapshot::Pending => None,
            QuerySnapshot::Ready(data) => Some(decode_payload(&self.key, &data)),
            QuerySnapshot::Failed(err) => Some(Err(err)),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl QueryClient {
    /// Refetch `key` immediately and then every `every`, publishing each
    /// outcome. Successful polls also refresh the shared cache entry.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn_poll(&self, key: QueryKey, every: Duration) -> PollHandle {
        let (sender, updates) = watch::channel(QuerySnapshot::Pending);
        let client = self.clone();
        let period = every.max(MIN_POLL_INTERVAL);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = match client.refetch(key).await {
                    Ok(data) => QuerySnapshot::Ready(data),
                    Err(err) => QuerySnapshot::Failed(err),
                };
                if sender.send(snapshot).is_err() {
                    debug!(%key, "poll receiver dropped; stopping");
                    break;
                }
            }
        });
        PollHandle { key, updates, task }
    }

    /// Poll the monitor status at the policy's interval.
    #[must_use]
    pub fn spawn_status_poll(&self) -> PollHandle {
        self.spawn_poll(QueryKey::Status, self.policy().status_poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use mediabridge_api_models::StatusResponse;
    use mediabridge_test_support::fixtures::running_status;
    use mediabridge_test_support::mocks::{mock_failure, mock_get};

    use crate::api::{ApiClient, paths};
    use crate::query::QueryPolicy;

    fn query_client(server: &MockServer) -> QueryClient {
        let base_url = server.base_url().parse().expect("mock server URL");
        let api = ApiClient::new(base_url, Duration::from_secs(5), None).expect("client");
        QueryClient::new(
            api,
            QueryPolicy {
                retry: 0,
                retry_base_delay: Duration::ZERO,
                ..QueryPolicy::default()
            },
        )
    }

    #[tokio::test]
    async fn poll_publishes_repeated_snapshots() {
        let server = MockServer::start_async().await;
        let mock = mock_get(&server, paths::STATUS, &running_status(3));
        let client = query_client(&server);
        let mut handle = client.spawn_poll(QueryKey::Status, Duration::from_millis(20));

        assert!(!handle.snapshot().is_settled());
        for _ in 0..2 {
            let snapshot = handle.changed().await.expect("poller alive");
            assert!(matches!(snapshot, QuerySnapshot::Ready(_)));
        }

        let status: Option<StatusResponse> = handle
            .latest()
            .expect("settled")
            .expect("decoded");
        assert_eq!(status, Some(running_status(3)));
        assert!(mock.calls() >= 2);
        assert!(client.cached(&QueryKey::Status).is_some());
    }

    #[tokio::test]
    async fn poll_reports_failures() {
        let server = MockServer::start_async().await;
        mock_failure(&server, GET, paths::STATUS, 502, "gateway");
        let client = query_client(&server);
        let mut handle = client.spawn_poll(QueryKey::Status, Duration::from_secs(60));

        let snapshot = handle.changed().await.expect("poller alive");
        let QuerySnapshot::Failed(err) = snapshot else {
            panic!("expected failure snapshot");
        };
        assert_eq!(err.api().status(), Some(502));
        assert!(handle.latest::<StatusResponse>().expect("settled").is_err());
    }

    #[tokio::test]
    async fn dropping_handle_stops_polling() {
        let server = MockServer::start_async().await;
        let mock = mock_get(&server, paths::STATUS, &running_status(1));
        let client = query_client(&server);
        let mut handle = client.spawn_poll(QueryKey::Status, Duration::from_millis(20));

        handle.changed().await.expect("poller alive");
        drop(handle);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let settled = mock.calls();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(settled >= 1);
        assert_eq!(mock.calls(), settled);
    }
}
