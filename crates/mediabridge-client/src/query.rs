//! Cache keys, invalidation scopes, and fetch policy.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use mediabridge_api_models::PageQuery;

use crate::api::paths;

/// Default window during which cached data is served without a request.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);
/// Default number of extra attempts after a failed read.
pub const DEFAULT_RETRY: u32 = 2;
/// Default delay before the first retry; doubled per attempt.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
/// Upper bound on a single retry delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);
/// Default interval for the background status poll.
pub const DEFAULT_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Identity of a cached read: operation plus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `GET /api/status`.
    Status,
    /// `GET /api/tasks` for one page/filter combination.
    Tasks(PageQuery),
    /// `GET /api/libraries`.
    Libraries,
    /// `GET /api/config`.
    Config,
    /// `GET /api/organize/records` for one page/filter combination.
    OrganizeRecords(PageQuery),
}

impl QueryKey {
    /// Invalidation scope this key belongs to.
    #[must_use]
    pub const fn scope(&self) -> QueryScope {
        match self {
            Self::Status => QueryScope::Status,
            Self::Tasks(_) => QueryScope::Tasks,
            Self::Libraries => QueryScope::Libraries,
            Self::Config => QueryScope::Config,
            Self::OrganizeRecords(_) => QueryScope::OrganizeRecords,
        }
    }

    /// Relative REST path for the read.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Status => paths::STATUS,
            Self::Tasks(_) => paths::TASKS,
            Self::Libraries => paths::LIBRARIES,
            Self::Config => paths::CONFIG,
            Self::OrganizeRecords(_) => paths::ORGANIZE_RECORDS,
        }
    }

}

impl Display for QueryKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tasks(query) | Self::OrganizeRecords(query) => {
                write!(
                    formatter,
                    "{}[page={},size={}",
                    self.scope(),
                    query.page,
                    query.page_size
                )?;
                if let Some(status) = query.status {
                    write!(formatter, ",status={status}")?;
                }
                formatter.write_str("]")
            }
            Self::Status | Self::Libraries | Self::Config => write!(formatter, "{}", self.scope()),
        }
    }
}

/// Group of keys invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    /// Status snapshot.
    Status,
    /// Every task page.
    Tasks,
    /// Library list.
    Libraries,
    /// Configuration aggregate.
    Config,
    /// Every organize record page.
    OrganizeRecords,
}

impl QueryScope {
    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Tasks => "tasks",
            Self::Libraries => "libraries",
            Self::Config => "config",
            Self::OrganizeRecords => "organize-records",
        }
    }
}

impl Display for QueryScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Cache and retry behaviour shared by every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// How long a successful result is served without refetching.
    pub stale_time: Duration,
    /// Extra attempts after the first failure.
    pub retry: u32,
    /// Delay before the first retry.
    pub retry_base_delay: Duration,
    /// Interval for the background status poll.
    pub status_poll_interval: Duration,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retry: DEFAULT_RETRY,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            status_poll_interval: DEFAULT_STATUS_POLL_INTERVAL,
        }
    }
}

impl QueryPolicy {
    /// Delay before retry number `attempt` (zero-based), doubling each time.
    #[must_use]
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_different_parameters_are_distinct() {
        let first = QueryKey::Tasks(PageQuery::new(1, 100));
        let second = QueryKey::Tasks(PageQuery::new(2, 100));
        assert_ne!(first, second);
        assert_eq!(first.scope(), second.scope());
    }

    #[test]
    fn key_display_includes_filter() {
        let key = QueryKey::OrganizeRecords(PageQuery::new(2, 20).with_status(Some(0)));
        assert_eq!(key.to_string(), "organize-records[page=2,size=20,status=0]");
        assert_eq!(QueryKey::Config.to_string(), "config");
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        let policy = QueryPolicy::default();
        assert_eq!(policy.retry_delay(0), Duration::from_secs(1));
        assert_eq!(policy.retry_delay(1), Duration::from_secs(2));
        assert_eq!(policy.retry_delay(10), MAX_RETRY_DELAY);
        assert_eq!(policy.retry_delay(64), MAX_RETRY_DELAY);
    }

    #[test]
    fn default_policy_matches_dashboard_contract() {
        let policy = QueryPolicy::default();
        assert_eq!(policy.stale_time, Duration::from_secs(30));
        assert_eq!(policy.retry, 2);
        assert_eq!(policy.status_poll_interval, Duration::from_secs(30));
    }
}
