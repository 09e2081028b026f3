//! Keyed query cache with a staleness window, in-flight de-duplication, retry,
//! and mutation-driven invalidation.
//!
//! # Design
//! - Entries store the envelope payload as JSON; typed accessors decode on read.
//! - A read for a key that is already being fetched joins the pending request.
//! - Mutations never touch cached data; they only mark scopes stale on success.
//! - The lock is never held across an await point.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use mediabridge_api_models::{
    AddTaskRequest, ConfigResponse, LibrariesResponse, LibraryItem, OrganizeRecordsResponse,
    PageQuery, StatusResponse, TaskListResponse, UpdateConfigRequest,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult, QueryError, QueryResult};
use crate::query::{QueryKey, QueryPolicy, QueryScope};

type SharedFetch = Shared<BoxFuture<'static, QueryResult<Arc<Value>>>>;

struct CacheEntry {
    data: Arc<Value>,
    fetched_at: Instant,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.fetched_at.elapsed() < stale_time
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, (u64, SharedFetch)>,
    invalidated_at: HashMap<QueryScope, Instant>,
    next_fetch_id: u64,
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cached, de-duplicated access to the backend.
#[derive(Clone)]
pub struct QueryClient {
    api: ApiClient,
    policy: QueryPolicy,
    state: Arc<Mutex<CacheState>>,
}

impl Debug for QueryClient {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("QueryClient")
            .field("base_url", &self.api.base_url().as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    /// Wrap an API client with the given cache policy.
    #[must_use]
    pub fn new(api: ApiClient, policy: QueryPolicy) -> Self {
        Self {
            api,
            policy,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Active cache policy.
    #[must_use]
    pub const fn policy(&self) -> &QueryPolicy {
        &self.policy
    }

    /// Read `key`, serving fresh cached data without a network round-trip.
    ///
    /// # Errors
    ///
    /// Returns the last failure once the retry budget is exhausted.
    pub async fn fetch(&self, key: QueryKey) -> QueryResult<Arc<Value>> {
        self.load(key, false).await
    }

    /// Read `key` ignoring freshness; still joins a request already in flight.
    ///
    /// # Errors
    ///
    /// Returns the last failure once the retry budget is exhausted.
    pub async fn refetch(&self, key: QueryKey) -> QueryResult<Arc<Value>> {
        self.load(key, true).await
    }

    /// Cached payload for `key`, fresh or not.
    #[must_use]
    pub fn cached(&self, key: &QueryKey) -> Option<Arc<Value>> {
        lock(&self.state)
            .entries
            .get(key)
            .map(|entry| Arc::clone(&entry.data))
    }

    /// Whether a read of `key` would be served from the cache.
    #[must_use]
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        lock(&self.state)
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.policy.stale_time))
    }

    /// Mark every cached key in `scope` stale so the next read refetches.
    pub fn invalidate(&self, scope: QueryScope) {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        state.invalidated_at.insert(scope, Instant::now());
        let mut marked = 0_usize;
        for (key, entry) in &mut state.entries {
            if key.scope() == scope {
                entry.invalidated = true;
                marked += 1;
            }
        }
        state.in_flight.retain(|key, _| key.scope() != scope);
        debug!(%scope, entries = marked, "invalidated cached queries");
    }

    /// Monitor status snapshot.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn status(&self) -> QueryResult<Option<StatusResponse>> {
        self.read(QueryKey::Status).await
    }

    /// One page of tasks.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn tasks(&self, query: PageQuery) -> QueryResult<Option<TaskListResponse>> {
        self.read(QueryKey::Tasks(query)).await
    }

    /// Configured libraries; "no data" is an empty list.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn libraries(&self) -> QueryResult<Vec<LibraryItem>> {
        let response: Option<LibrariesResponse> = self.read(QueryKey::Libraries).await?;
        Ok(response.map(|response| response.libraries).unwrap_or_default())
    }

    /// Configuration aggregate.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn config(&self) -> QueryResult<Option<ConfigResponse>> {
        self.read(QueryKey::Config).await
    }

    /// One page of organize records.
    ///
    /// # Errors
    ///
    /// See [`QueryClient::fetch`].
    pub async fn organize_records(
        &self,
        query: PageQuery,
    ) -> QueryResult<Option<OrganizeRecordsResponse>> {
        self.read(QueryKey::OrganizeRecords(query)).await
    }

    /// Create a task and invalidate task pages on success.
    ///
    /// # Errors
    ///
    /// Propagates the API failure unchanged; nothing is invalidated.
    pub async fn add_task(&self, request: &AddTaskRequest) -> ApiResult<Option<Value>> {
        let created = self.api.add_task(request).await?;
        info!(library = %request.library_name, "task created");
        self.invalidate(QueryScope::Tasks);
        Ok(created)
    }

    /// Delete a task and invalidate task pages on success.
    ///
    /// # Errors
    ///
    /// Propagates the API failure unchanged; nothing is invalidated.
    pub async fn delete_task(&self, task_id: &str) -> ApiResult<Option<Value>> {
        let deleted = self.api.delete_task(task_id).await?;
        info!(task_id, "task deleted");
        self.invalidate(QueryScope::Tasks);
        Ok(deleted)
    }

    /// Write configuration and invalidate the configuration and library reads.
    ///
    /// # Errors
    ///
    /// Propagates the API failure unchanged; nothing is invalidated.
    pub async fn update_config(&self, request: &UpdateConfigRequest) -> ApiResult<Option<Value>> {
        let updated = self.api.update_config(request).await?;
        info!("configuration updated");
        self.invalidate(QueryScope::Config);
        self.invalidate(QueryScope::Libraries);
        Ok(updated)
    }

    async fn read<T: DeserializeOwned>(&self, key: QueryKey) -> QueryResult<Option<T>> {
        let data = self.fetch(key).await?;
        decode_payload(&key, &data)
    }

    async fn load(&self, key: QueryKey, force: bool) -> QueryResult<Arc<Value>> {
        let pending = {
            let mut state = lock(&self.state);
            if !force
                && let Some(entry) = state.entries.get(&key)
                && entry.is_fresh(self.policy.stale_time)
            {
                debug!(%key, "serving cached query");
                return Ok(Arc::clone(&entry.data));
            }
            if let Some((_, pending)) = state.in_flight.get(&key) {
                debug!(%key, "joining in-flight query");
                pending.clone()
            } else {
                let fetch_id = state.next_fetch_id;
                state.next_fetch_id = state.next_fetch_id.wrapping_add(1);
                let pending = self.start_fetch(key, fetch_id);
                state.in_flight.insert(key, (fetch_id, pending.clone()));
                pending
            }
        };
        pending.await
    }

    fn start_fetch(&self, key: QueryKey, fetch_id: u64) -> SharedFetch {
        let api = self.api.clone();
        let policy = self.policy;
        let state = Arc::clone(&self.state);
        let started_at = Instant::now();
        async move {
            let result = fetch_with_retry(&api, key, &policy)
                .await
                .map(Arc::new)
                .map_err(QueryError::from);

            let mut guard = lock(&state);
            if guard
                .in_flight
                .get(&key)
                .is_some_and(|(current, _)| *current == fetch_id)
            {
                guard.in_flight.remove(&key);
            }
            if let Ok(data) = &result {
                let invalidated = guard
                    .invalidated_at
                    .get(&key.scope())
                    .is_some_and(|at| *at >= started_at);
                guard.entries.insert(
                    key,
                    CacheEntry {
                        data: Arc::clone(data),
                        fetched_at: Instant::now(),
                        invalidated,
                    },
                );
            }
            drop(guard);
            result
        }
        .boxed()
        .shared()
    }
}

async fn fetch_with_retry(api: &ApiClient, key: QueryKey, policy: &QueryPolicy) -> ApiResult<Value> {
    let mut attempt = 0_u32;
    loop {
        match fetch_once(api, key).await {
            Ok(data) => return Ok(data),
            Err(err) if attempt < policy.retry => {
                let delay = policy.retry_delay(attempt);
                warn!(%key, attempt = attempt + 1, error = %err, ?delay, "query failed; retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(%key, error = %err, "query failed");
                return Err(err);
            }
        }
    }
}

/// Issue the typed read behind `key` and store its payload as JSON.
async fn fetch_once(api: &ApiClient, key: QueryKey) -> ApiResult<Value> {
    let encoded = match key {
        QueryKey::Status => serde_json::to_value(api.fetch_status().await?),
        QueryKey::Tasks(query) => serde_json::to_value(api.fetch_tasks(&query).await?),
        QueryKey::Libraries => serde_json::to_value(api.fetch_libraries().await?),
        QueryKey::Config => serde_json::to_value(api.fetch_config().await?),
        QueryKey::OrganizeRecords(query) => {
            serde_json::to_value(api.fetch_organize_records(&query).await?)
        }
    };
    encoded.map_err(|source| ApiError::Decode {
        path: key.path().to_string(),
        source,
    })
}

/// Decode a cached payload; JSON `null` is "no data".
pub(crate) fn decode_payload<T: DeserializeOwned>(
    key: &QueryKey,
    data: &Value,
) -> QueryResult<Option<T>> {
    if data.is_null() {
        return Ok(None);
    }
    T::deserialize(data).map(Some).map_err(|source| {
        QueryError::from(ApiError::Decode {
            path: key.path().to_string(),
            source,
        })
    })
}
