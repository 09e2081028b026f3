//! Dashboard view and add-task form state.

use mediabridge_api_models::{
    AddTaskRequest, LibraryItem, OrganizeRecordItem, PageQuery, StatusResponse, TaskItem,
};
use thiserror::Error;

use crate::core::logic::format_optional_date;
use crate::features::tasks::state::TaskCounts;

/// Organize records shown on the dashboard.
pub const DASHBOARD_RECORDS_QUERY: PageQuery = PageQuery::new(1, 5);

/// Rows in each "recent" list.
pub const RECENT_LIMIT: usize = 5;

/// Monitor status card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSummary {
    /// Whether the monitor loop is running.
    pub running: bool,
    /// Active task count reported by the backend.
    pub active_tasks: u64,
    /// Last monitor pass in display form, or `-`.
    pub last_check: String,
}

impl StatusSummary {
    /// Running/stopped label.
    #[must_use]
    pub const fn state_label(&self) -> &'static str {
        if self.running { "运行中" } else { "已停止" }
    }
}

impl From<&StatusResponse> for StatusSummary {
    fn from(status: &StatusResponse) -> Self {
        Self {
            running: status.monitor_running,
            active_tasks: status.active_tasks,
            last_check: format_optional_date(status.last_check_time.as_deref()),
        }
    }
}

/// Assembled dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardView {
    /// Status card; `None` when the status query failed or had no data.
    pub status: Option<StatusSummary>,
    /// Task counters.
    pub counts: TaskCounts,
    /// Most recent tasks in backend order.
    pub recent_tasks: Vec<TaskItem>,
    /// Most recent organize records.
    pub recent_records: Vec<OrganizeRecordItem>,
    /// Libraries offered by the add-task form.
    pub libraries: Vec<LibraryItem>,
    /// Sections that failed to load, by name.
    pub failed_sections: Vec<&'static str>,
}

/// Reasons the add-task form cannot be submitted.
#[derive(Debug, Error)]
pub enum AddTaskError {
    /// The magnet field is blank.
    #[error("magnet link is required")]
    MissingMagnet,
    /// No library was selected.
    #[error("a library must be selected")]
    MissingLibrary,
    /// The backend rejected the request.
    #[error(transparent)]
    Api(#[from] mediabridge_client::ApiError),
}

/// Raw add-task form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddTaskForm {
    /// Magnet link as typed.
    pub magnet: String,
    /// Selected library name.
    pub library_name: String,
    /// Optional display name.
    pub name: String,
}

impl AddTaskForm {
    /// Build the request: magnet trimmed and required, library required,
    /// blank name omitted.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field.
    pub fn to_request(&self) -> Result<AddTaskRequest, AddTaskError> {
        let magnet = self.magnet.trim();
        if magnet.is_empty() {
            return Err(AddTaskError::MissingMagnet);
        }
        if self.library_name.trim().is_empty() {
            return Err(AddTaskError::MissingLibrary);
        }
        let name = self.name.trim();
        Ok(AddTaskRequest {
            magnet: magnet.to_string(),
            library_name: self.library_name.trim().to_string(),
            name: (!name.is_empty()).then(|| name.to_string()),
        })
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabridge_test_support::fixtures::running_status;

    #[test]
    fn form_requires_magnet_and_library() {
        let mut form = AddTaskForm {
            magnet: "   ".into(),
            library_name: "movies".into(),
            name: String::new(),
        };
        assert!(matches!(form.to_request(), Err(AddTaskError::MissingMagnet)));

        form.magnet = " magnet:?xt=urn:btih:abc ".into();
        form.library_name.clear();
        assert!(matches!(form.to_request(), Err(AddTaskError::MissingLibrary)));
    }

    #[test]
    fn form_trims_and_omits_blank_name() {
        let mut form = AddTaskForm {
            magnet: " magnet:?xt=urn:btih:abc ".into(),
            library_name: "movies".into(),
            name: "  ".into(),
        };
        let request = form.to_request().expect("valid form");
        assert_eq!(request.magnet, "magnet:?xt=urn:btih:abc");
        assert_eq!(request.name, None);

        form.name = "Film".into();
        assert_eq!(form.to_request().expect("valid form").name.as_deref(), Some("Film"));

        form.clear();
        assert_eq!(form, AddTaskForm::default());
    }

    #[test]
    fn status_summary_labels() {
        let summary = StatusSummary::from(&running_status(4));
        assert_eq!(summary.state_label(), "运行中");
        assert_eq!(summary.active_tasks, 4);
        assert_eq!(summary.last_check, "2024/05/01 12:00");

        let stopped = StatusSummary::from(&StatusResponse::default());
        assert_eq!(stopped.state_label(), "已停止");
        assert_eq!(stopped.last_check, "-");
    }
}
