//! Dashboard assembly from individual query results.

use mediabridge_api_models::{
    LibraryItem, OrganizeRecordsResponse, StatusResponse, TaskListResponse,
};
use mediabridge_client::QueryResult;

use crate::features::dashboard::state::{DashboardView, RECENT_LIMIT, StatusSummary};
use crate::features::tasks::logic::tab_counts;

/// Results of the dashboard's independent queries.
#[derive(Debug)]
pub struct DashboardInputs {
    /// Monitor status.
    pub status: QueryResult<Option<StatusResponse>>,
    /// Task list page.
    pub tasks: QueryResult<Option<TaskListResponse>>,
    /// Recent organize records.
    pub records: QueryResult<Option<OrganizeRecordsResponse>>,
    /// Library list.
    pub libraries: QueryResult<Vec<LibraryItem>>,
}

/// Fold query results into a view; failed sections render empty and are named.
#[must_use]
pub fn build_view(inputs: DashboardInputs) -> DashboardView {
    let mut view = DashboardView::default();

    match inputs.status {
        Ok(status) => view.status = status.as_ref().map(StatusSummary::from),
        Err(_) => view.failed_sections.push("status"),
    }
    match inputs.tasks {
        Ok(tasks) => {
            let tasks = tasks.unwrap_or_default().tasks;
            view.counts = tab_counts(&tasks);
            view.recent_tasks = tasks.into_iter().take(RECENT_LIMIT).collect();
        }
        Err(_) => view.failed_sections.push("tasks"),
    }
    match inputs.records {
        Ok(records) => {
            view.recent_records = records
                .unwrap_or_default()
                .records
                .into_iter()
                .take(RECENT_LIMIT)
                .collect();
        }
        Err(_) => view.failed_sections.push("records"),
    }
    match inputs.libraries {
        Ok(libraries) => view.libraries = libraries,
        Err(_) => view.failed_sections.push("libraries"),
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabridge_api_models::OrganizeStatus;
    use mediabridge_client::{ApiError, QueryError};
    use mediabridge_test_support::fixtures::{library, record, running_status, task_mix};

    fn failure() -> QueryError {
        QueryError::from(ApiError::Status {
            path: "/api/status".into(),
            status: 500,
            message: None,
        })
    }

    #[test]
    fn view_counts_and_limits_recent_lists() {
        let records = OrganizeRecordsResponse {
            records: (1..=7).map(|id| record(id, OrganizeStatus::Success)).collect(),
            total: 7,
            page: 1,
            page_size: 5,
        };
        let view = build_view(DashboardInputs {
            status: Ok(Some(running_status(12))),
            tasks: Ok(Some(task_mix(12, 3, 1))),
            records: Ok(Some(records)),
            libraries: Ok(vec![library("movies")]),
        });

        assert_eq!(view.counts.pending, 12);
        assert_eq!(view.counts.completed, 3);
        assert_eq!(view.counts.failed, 1);
        assert_eq!(view.recent_tasks.len(), RECENT_LIMIT);
        assert_eq!(view.recent_records.len(), RECENT_LIMIT);
        assert_eq!(view.recent_records[0].id, 1);
        assert!(view.failed_sections.is_empty());
        assert!(view.status.is_some());
    }

    #[test]
    fn failed_sections_render_empty() {
        let view = build_view(DashboardInputs {
            status: Err(failure()),
            tasks: Ok(None),
            records: Err(failure()),
            libraries: Ok(Vec::new()),
        });

        assert!(view.status.is_none());
        assert_eq!(view.counts.all, 0);
        assert_eq!(view.failed_sections, vec!["status", "records"]);
    }
}
