//! Task list data access.

use mediabridge_api_models::TaskListResponse;
use mediabridge_client::{ApiResult, QueryClient, QueryResult};
use tracing::info;

use crate::features::tasks::state::{TASKS_PAGE_QUERY, TasksState};

/// Load the task list; "no data" is an empty list.
///
/// # Errors
///
/// Returns the query failure after retries.
pub async fn load_tasks(client: &QueryClient) -> QueryResult<TaskListResponse> {
    Ok(client.tasks(TASKS_PAGE_QUERY).await?.unwrap_or_default())
}

/// Delete the task awaiting confirmation, if any.
///
/// Returns the deleted identifier. The confirmation is closed either way.
///
/// # Errors
///
/// Propagates the backend failure; the list cache is left as it was.
pub async fn delete_confirmed(
    client: &QueryClient,
    state: &mut TasksState,
) -> ApiResult<Option<String>> {
    let Some(task_id) = state.confirm_delete() else {
        return Ok(None);
    };
    client.delete_task(&task_id).await?;
    info!(task_id = %task_id, "deleted task from list");
    Ok(Some(task_id))
}
