//! Task list state: active tab and pending delete confirmation.

use mediabridge_api_models::{PageQuery, TaskStatus};

/// Query used by the task list and the dashboard counters.
pub const TASKS_PAGE_QUERY: PageQuery = PageQuery::new(1, 100);

/// Status tab on the task list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    /// Every task (全部).
    #[default]
    All,
    /// Pending tasks (进行中).
    Pending,
    /// Completed tasks (完成).
    Completed,
    /// Failed tasks (失败).
    Failed,
}

impl TaskFilter {
    /// Tabs in display order.
    pub const TABS: [Self; 4] = [Self::All, Self::Pending, Self::Completed, Self::Failed];

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "全部",
            Self::Pending => "进行中",
            Self::Completed => "完成",
            Self::Failed => "失败",
        }
    }

    /// Whether a task with `status` belongs under this tab.
    #[must_use]
    pub const fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => matches!(status, TaskStatus::Pending),
            Self::Completed => matches!(status, TaskStatus::Completed),
            Self::Failed => matches!(status, TaskStatus::Failed),
        }
    }

    /// Parse a tab from its label or an English alias.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "all" | "全部" => Some(Self::All),
            "pending" | "进行中" => Some(Self::Pending),
            "completed" | "完成" => Some(Self::Completed),
            "failed" | "失败" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Per-tab task counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// All tasks, including unknown statuses.
    pub all: usize,
    /// Pending tasks.
    pub pending: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Failed tasks.
    pub failed: usize,
}

impl TaskCounts {
    /// Count shown on `filter`'s tab.
    #[must_use]
    pub const fn for_filter(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.all,
            TaskFilter::Pending => self.pending,
            TaskFilter::Completed => self.completed,
            TaskFilter::Failed => self.failed,
        }
    }
}

/// Mutable task list state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TasksState {
    /// Selected tab.
    pub filter: TaskFilter,
    pending_delete: Option<String>,
}

impl TasksState {
    /// Open the delete confirmation for `task_id`, replacing any earlier one.
    pub fn request_delete(&mut self, task_id: impl Into<String>) {
        self.pending_delete = Some(task_id.into());
    }

    /// Task awaiting confirmation, if any.
    #[must_use]
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Close the confirmation without deleting.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Take the confirmed target, closing the confirmation.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }
}
