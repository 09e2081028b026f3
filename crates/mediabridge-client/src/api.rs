//! Thin HTTP passthrough over the MediaBridge REST surface.
//!
//! Every call returns the envelope's `data` field. Non-2xx responses become
//! [`ApiError::Status`]; retries and caching belong to [`crate::QueryClient`].

use std::time::Duration;

use mediabridge_api_models::{
    AddTaskRequest, ApiEnvelope, ConfigResponse, LibrariesResponse, OrganizeRecordsResponse,
    PageQuery, StatusResponse, TaskListResponse, UpdateConfigRequest,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Backend REST paths.
pub mod paths {
    /// Monitor status snapshot.
    pub const STATUS: &str = "/api/status";
    /// Task collection.
    pub const TASKS: &str = "/api/tasks";
    /// Configured libraries.
    pub const LIBRARIES: &str = "/api/libraries";
    /// Configuration aggregate.
    pub const CONFIG: &str = "/api/config";
    /// Organize record log.
    pub const ORGANIZE_RECORDS: &str = "/api/organize/records";
}

/// HTTP client bound to a backend origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client with a request timeout and an optional trace identifier
    /// attached to every request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] when the TLS backend cannot be
    /// initialised or the trace identifier is not a valid header value.
    pub fn new(base_url: Url, timeout: Duration, request_id: Option<&str>) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        if let Some(id) = request_id
            && let Ok(value) = HeaderValue::from_str(id)
        {
            default_headers.insert(HEADER_REQUEST_ID, value);
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(Self { client, base_url })
    }

    /// Origin all relative paths are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET path?query` returning the envelope payload.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Option<T>> {
        let url = self.url(path)?;
        let builder = self.client.request(Method::GET, url).query(query);
        self.send(Method::GET, path, builder).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Option<T>> {
        let url = self.url(path)?;
        let builder = self.client.request(Method::POST, url).json(body);
        self.send(Method::POST, path, builder).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Option<T>> {
        let url = self.url(path)?;
        let builder = self.client.request(Method::PUT, url).json(body);
        self.send(Method::PUT, path, builder).await
    }

    /// `DELETE url`.
    async fn delete_url<T: DeserializeOwned>(&self, path: &str, url: Url) -> ApiResult<Option<T>> {
        let builder = self.client.request(Method::DELETE, url);
        self.send(Method::DELETE, path, builder).await
    }

    /// Fetch the monitor status snapshot.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn fetch_status(&self) -> ApiResult<Option<StatusResponse>> {
        self.get(paths::STATUS, &[]).await
    }

    /// Fetch one page of tasks.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn fetch_tasks(&self, query: &PageQuery) -> ApiResult<Option<TaskListResponse>> {
        self.get(paths::TASKS, &query.to_pairs()).await
    }

    /// Create a download task.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn add_task(&self, request: &AddTaskRequest) -> ApiResult<Option<Value>> {
        self.post(paths::TASKS, request).await
    }

    /// Delete a task by identifier.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete_task(&self, task_id: &str) -> ApiResult<Option<Value>> {
        let path = format!("{}/{task_id}", paths::TASKS);
        let mut url = self.url(paths::TASKS)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidPath {
                path: path.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(task_id);
        self.delete_url(&path, url).await
    }

    /// Fetch configured libraries.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn fetch_libraries(&self) -> ApiResult<Option<LibrariesResponse>> {
        self.get(paths::LIBRARIES, &[]).await
    }

    /// Fetch the configuration aggregate.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn fetch_config(&self) -> ApiResult<Option<ConfigResponse>> {
        self.get(paths::CONFIG, &[]).await
    }

    /// Replace configuration fields present in `request`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn update_config(&self, request: &UpdateConfigRequest) -> ApiResult<Option<Value>> {
        self.put(paths::CONFIG, request).await
    }

    /// Fetch one page of organize records.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn fetch_organize_records(
        &self,
        query: &PageQuery,
    ) -> ApiResult<Option<OrganizeRecordsResponse>> {
        self.get(paths::ORGANIZE_RECORDS, &query.to_pairs()).await
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| ApiError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        debug!(%method, path, "sending request");
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiEnvelope<Value>>(&bytes)
                .ok()
                .map(|envelope| envelope.message)
                .filter(|message| !message.is_empty());
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        decode_envelope(path, &bytes)
    }
}

/// Decode an envelope body, treating an empty body as "no data".
pub(crate) fn decode_envelope<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> ApiResult<Option<T>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<ApiEnvelope<T>>(bytes)
        .map(|envelope| envelope.data)
        .map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use mediabridge_api_models::TaskStatus;
    use mediabridge_test_support::fixtures::{running_status, sample_config, task_mix};
    use mediabridge_test_support::mocks::{envelope, mock_failure, mock_get};
    use serde_json::json;

    fn client_for(server: &MockServer) -> ApiClient {
        let base_url = server.base_url().parse().expect("mock server URL");
        ApiClient::new(base_url, Duration::from_secs(5), Some("trace-123")).expect("client")
    }

    #[tokio::test]
    async fn fetch_status_unwraps_envelope() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(paths::STATUS)
                .header(HEADER_REQUEST_ID, "trace-123");
            then.status(200).json_body(envelope(&running_status(3)));
        });

        let status = client_for(&server)
            .fetch_status()
            .await
            .expect("status request")
            .expect("status data");
        assert!(status.monitor_running);
        assert_eq!(status.active_tasks, 3);
        mock.assert();
    }

    #[tokio::test]
    async fn fetch_tasks_sends_pagination() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(paths::TASKS)
                .query_param("page", "1")
                .query_param("page_size", "100");
            then.status(200).json_body(envelope(&task_mix(1, 1, 0)));
        });

        let list = client_for(&server)
            .fetch_tasks(&PageQuery::new(1, 100))
            .await
            .expect("tasks request")
            .expect("tasks data");
        assert_eq!(list.tasks.len(), 2);
        assert_eq!(list.tasks[1].status, TaskStatus::Completed);
        mock.assert();
    }

    #[tokio::test]
    async fn fetch_records_passes_status_filter() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(paths::ORGANIZE_RECORDS)
                .query_param("page", "3")
                .query_param("page_size", "20")
                .query_param("status", "1");
            then.status(200).json_body(json!({
                "code": 0,
                "message": "success",
                "data": {"records": [], "total": 41, "page": 3, "page_size": 20}
            }));
        });

        let records = client_for(&server)
            .fetch_organize_records(&PageQuery::new(3, 20).with_status(Some(1)))
            .await
            .expect("records request")
            .expect("records data");
        assert_eq!(records.total, 41);
        mock.assert();
    }

    #[tokio::test]
    async fn add_task_posts_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path(paths::TASKS).json_body(json!({
                "magnet": "magnet:?xt=urn:btih:abc",
                "library_name": "movies"
            }));
            then.status(200)
                .json_body(json!({"code": 0, "message": "ok", "data": {"task_id": "abc"}}));
        });

        let created = client_for(&server)
            .add_task(&AddTaskRequest {
                magnet: "magnet:?xt=urn:btih:abc".into(),
                library_name: "movies".into(),
                name: None,
            })
            .await
            .expect("add request");
        assert_eq!(created, Some(json!({"task_id": "abc"})));
        mock.assert();
    }

    #[tokio::test]
    async fn delete_task_targets_id_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/tasks/deadbeef");
            then.status(200)
                .json_body(json!({"code": 0, "message": "deleted", "data": null}));
        });

        let result = client_for(&server)
            .delete_task("deadbeef")
            .await
            .expect("delete request");
        assert!(result.is_none());
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_surfaces_envelope_message() {
        let server = MockServer::start_async().await;
        let mock = mock_failure(&server, PUT, paths::CONFIG, 500, "write failed");

        let err = client_for(&server)
            .update_config(&UpdateConfigRequest::default())
            .await
            .expect_err("500 should fail");
        match err {
            ApiError::Status {
                status, message, ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("write failed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        mock.assert();
    }

    #[tokio::test]
    async fn empty_body_is_no_data() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(paths::LIBRARIES);
            then.status(200);
        });

        let libraries = client_for(&server)
            .fetch_libraries()
            .await
            .expect("libraries request");
        assert!(libraries.is_none());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(paths::CONFIG);
            then.status(200).body("not json");
        });

        let err = client_for(&server)
            .fetch_config()
            .await
            .expect_err("decode should fail");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn fetch_config_parses_aggregate() {
        let server = MockServer::start_async().await;
        let mock = mock_get(&server, paths::CONFIG, &sample_config());

        let config = client_for(&server)
            .fetch_config()
            .await
            .expect("config request")
            .expect("config data");
        assert_eq!(config, sample_config());
        mock.assert();
    }
}
