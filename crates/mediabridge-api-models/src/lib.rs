#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the MediaBridge REST API.
//!
//! Every response from the backend is wrapped in an [`ApiEnvelope`]. The client
//! and the page models both consume these types so the wire contract lives in
//! one place.

use serde::{Deserialize, Serialize};

mod number;

/// Library type assigned when the editor leaves the field blank.
pub const DEFAULT_LIBRARY_TYPE: &str = "system";

/// Uniform response wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    /// Backend status code (informational only).
    #[serde(default)]
    pub code: i64,
    /// Backend message, surfaced when a request fails.
    #[serde(default)]
    pub message: String,
    /// Payload; `None` means "no data" rather than an error.
    pub data: Option<T>,
}

/// Offline download task lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "i64", into = "i64")]
pub enum TaskStatus {
    /// Still downloading (进行中).
    Pending,
    /// Download failed (失败).
    Failed,
    /// Download finished (完成).
    Completed,
    /// Code the client does not recognise.
    Unknown(i64),
}

impl TaskStatus {
    /// Wire code used by the backend.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Failed => 1,
            Self::Completed => 2,
            Self::Unknown(code) => code,
        }
    }

    /// Display label used across the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "进行中",
            Self::Failed => "失败",
            Self::Completed => "完成",
            Self::Unknown(_) => "未知",
        }
    }
}

impl From<i64> for TaskStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Pending,
            1 => Self::Failed,
            2 => Self::Completed,
            other => Self::Unknown(other),
        }
    }
}

impl From<TaskStatus> for i64 {
    fn from(value: TaskStatus) -> Self {
        value.code()
    }
}

/// Result of a single organize operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "i64", into = "i64")]
pub enum OrganizeStatus {
    /// File was moved and renamed (成功).
    Success,
    /// Organizing failed (失败).
    Failed,
    /// Code the client does not recognise.
    Unknown(i64),
}

impl OrganizeStatus {
    /// Wire code used by the backend.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
            Self::Unknown(code) => code,
        }
    }

    /// Display label used by the records screen.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "成功",
            Self::Failed => "失败",
            Self::Unknown(_) => "未知",
        }
    }
}

impl From<i64> for OrganizeStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Success,
            1 => Self::Failed,
            other => Self::Unknown(other),
        }
    }
}

impl From<OrganizeStatus> for i64 {
    fn from(value: OrganizeStatus) -> Self {
        value.code()
    }
}

/// Pagination and status filter sent as query parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PageQuery {
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Optional status code filter; omitted from the query string when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
}

impl PageQuery {
    /// Build a query without a status filter.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            status: None,
        }
    }

    /// Attach a status filter.
    #[must_use]
    pub const fn with_status(mut self, status: Option<i64>) -> Self {
        self.status = status;
        self
    }

    /// Render as ordered query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

/// Body for `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddTaskRequest {
    /// Magnet link to download.
    pub magnet: String,
    /// Target library name.
    pub library_name: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Task row as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskItem {
    /// Hash-like task identifier.
    pub task_id: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Download progress reported by the backend.
    #[serde(default)]
    pub progress: f64,
    /// Creation time as an ISO string.
    pub add_time: String,
}

/// Paginated task list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskListResponse {
    /// Tasks on the requested page.
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    /// Total tasks known to the backend.
    #[serde(default)]
    pub total: u64,
}

/// One file-organization log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizeRecordItem {
    /// Record identifier.
    pub id: i64,
    /// File name before organizing.
    pub original_name: String,
    /// File name after organizing.
    pub organized_name: String,
    /// Source path.
    pub source_path: String,
    /// Target path.
    pub target_path: String,
    /// Outcome.
    pub status: OrganizeStatus,
    /// Failure detail, when the record failed.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Creation time as an ISO string.
    pub created_at: String,
}

/// Paginated organize record list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizeRecordsResponse {
    /// Records on the requested page.
    #[serde(default)]
    pub records: Vec<OrganizeRecordItem>,
    /// Total records matching the filter.
    #[serde(default)]
    pub total: u64,
    /// Page echoed by the backend.
    #[serde(default)]
    pub page: u32,
    /// Page size echoed by the backend.
    #[serde(default)]
    pub page_size: u32,
}

/// Mapping between a download directory and an organized target directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryItem {
    /// Unique (by convention) library name.
    pub name: String,
    /// Directory the downloader writes into.
    pub download_path: String,
    /// Directory organized files land in.
    pub target_path: String,
    /// Library type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Minimum transfer size in MB.
    #[serde(default, deserialize_with = "number::whole")]
    pub min_transfer_size: u64,
}

/// Payload of `GET /api/libraries`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibrariesResponse {
    /// Configured libraries.
    #[serde(default)]
    pub libraries: Vec<LibraryItem>,
}

/// Polling interval bounds for the cloud-drive monitor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct P115Config {
    /// Lower polling bound in seconds.
    #[serde(deserialize_with = "number::whole")]
    pub rotation_training_interval_min: u32,
    /// Upper polling bound in seconds.
    #[serde(deserialize_with = "number::whole")]
    pub rotation_training_interval_max: u32,
}

/// Filename cleanup settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct XxConfig {
    /// Keywords stripped from file names.
    #[serde(default)]
    pub remove_keywords: Vec<String>,
}

/// Media organization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaConfig {
    /// Global minimum transfer size in MB.
    #[serde(default, deserialize_with = "number::whole")]
    pub min_transfer_size: u64,
    /// Recognised video extensions.
    #[serde(default)]
    pub video_formats: Vec<String>,
    /// Ordered library list.
    #[serde(default)]
    pub libraries: Vec<LibraryItem>,
    /// Filename cleanup settings.
    #[serde(default)]
    pub xx: XxConfig,
}

/// Full configuration aggregate from `GET /api/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigResponse {
    /// Monitor polling settings.
    pub p115: P115Config,
    /// Media settings.
    pub media: MediaConfig,
}

/// Partial polling settings for an update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct P115ConfigPatch {
    /// Lower polling bound in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_training_interval_min: Option<u32>,
    /// Upper polling bound in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_training_interval_max: Option<u32>,
}

/// Partial cleanup settings for an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct XxConfigPatch {
    /// Keywords stripped from file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_keywords: Option<Vec<String>>,
}

/// Partial media settings for an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaConfigPatch {
    /// Global minimum transfer size in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_transfer_size: Option<u64>,
    /// Recognised video extensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_formats: Option<Vec<String>>,
    /// Ordered library list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libraries: Option<Vec<LibraryItem>>,
    /// Filename cleanup settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xx: Option<XxConfigPatch>,
}

/// Body for `PUT /api/config`; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateConfigRequest {
    /// Monitor polling settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p115: Option<P115ConfigPatch>,
    /// Media settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaConfigPatch>,
}

/// Monitor status snapshot from `GET /api/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    /// Whether the backend monitor loop is running.
    pub monitor_running: bool,
    /// Number of active tasks.
    #[serde(default)]
    pub active_tasks: u64,
    /// Time of the last monitor pass, if any.
    #[serde(default)]
    pub last_check_time: Option<String>,
}
