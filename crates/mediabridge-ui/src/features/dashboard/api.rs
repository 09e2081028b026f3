//! Dashboard data access and the add-task mutation.

use mediabridge_client::QueryClient;
use tracing::info;

use crate::features::dashboard::logic::{DashboardInputs, build_view};
use crate::features::dashboard::state::{
    AddTaskError, AddTaskForm, DASHBOARD_RECORDS_QUERY, DashboardView,
};
use crate::features::tasks::state::TASKS_PAGE_QUERY;

/// Load every dashboard section concurrently.
pub async fn load_dashboard(client: &QueryClient) -> DashboardView {
    let (status, tasks, records, libraries) = tokio::join!(
        client.status(),
        client.tasks(TASKS_PAGE_QUERY),
        client.organize_records(DASHBOARD_RECORDS_QUERY),
        client.libraries(),
    );
    build_view(DashboardInputs {
        status,
        tasks,
        records,
        libraries,
    })
}

/// Validate and submit the form; a successful add clears it.
///
/// # Errors
///
/// Returns a validation error without touching the network, or the backend
/// failure with the form left intact.
pub async fn submit_add_task(
    client: &QueryClient,
    form: &mut AddTaskForm,
) -> Result<(), AddTaskError> {
    let request = form.to_request()?;
    client.add_task(&request).await?;
    info!(library = %request.library_name, "submitted task from dashboard");
    form.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use mediabridge_client::{ApiClient, QueryPolicy};
    use mediabridge_test_support::fixtures::{running_status, task_mix};
    use mediabridge_test_support::mocks::{empty_envelope, mock_failure, mock_get};
    use serde_json::json;
    use std::time::Duration;

    fn query_client(server: &MockServer) -> QueryClient {
        let base_url = server.base_url().parse().expect("mock server URL");
        let api = ApiClient::new(base_url, Duration::from_secs(5), None).expect("client");
        QueryClient::new(
            api,
            QueryPolicy {
                retry: 0,
                ..QueryPolicy::default()
            },
        )
    }

    #[tokio::test]
    async fn dashboard_loads_all_sections() {
        let server = MockServer::start_async().await;
        mock_get(&server, "/api/status", &running_status(2));
        let tasks = server.mock(|when, then| {
            when.method(GET)
                .path("/api/tasks")
                .query_param("page", "1")
                .query_param("page_size", "100");
            then.status(200)
                .json_body(json!({"code": 0, "message": "ok", "data": task_mix(2, 1, 0)}));
        });
        let records = server.mock(|when, then| {
            when.method(GET)
                .path("/api/organize/records")
                .query_param("page", "1")
                .query_param("page_size", "5");
            then.status(200).json_body(empty_envelope());
        });
        mock_failure(&server, GET, "/api/libraries", 500, "broken");
        let client = query_client(&server);

        let view = load_dashboard(&client).await;

        tasks.assert();
        records.assert();
        assert_eq!(view.counts.all, 3);
        assert_eq!(view.status.map(|status| status.active_tasks), Some(2));
        assert_eq!(view.failed_sections, vec!["libraries"]);
    }

    #[tokio::test]
    async fn successful_add_clears_form() {
        let server = MockServer::start_async().await;
        let add = server.mock(|when, then| {
            when.method(POST).path("/api/tasks").json_body(json!({
                "magnet": "magnet:?xt=urn:btih:abc",
                "library_name": "movies"
            }));
            then.status(200).json_body(empty_envelope());
        });
        let client = query_client(&server);
        let mut form = AddTaskForm {
            magnet: "  magnet:?xt=urn:btih:abc ".into(),
            library_name: "movies".into(),
            name: String::new(),
        };

        submit_add_task(&client, &mut form).await.expect("submit");

        add.assert();
        assert_eq!(form, AddTaskForm::default());
    }

    #[tokio::test]
    async fn invalid_or_failed_add_keeps_form() {
        let server = MockServer::start_async().await;
        let add = mock_failure(&server, POST, "/api/tasks", 400, "bad magnet");
        let client = query_client(&server);

        let mut blank = AddTaskForm::default();
        let err = submit_add_task(&client, &mut blank)
            .await
            .expect_err("blank form");
        assert!(matches!(err, AddTaskError::MissingMagnet));
        assert_eq!(add.calls(), 0);

        let mut form = AddTaskForm {
            magnet: "magnet:?xt=urn:btih:abc".into(),
            library_name: "movies".into(),
            name: "Film".into(),
        };
        let err = submit_add_task(&client, &mut form)
            .await
            .expect_err("backend rejects");
        assert!(matches!(err, AddTaskError::Api(_)));
        assert_eq!(form.name, "Film");
        assert_eq!(add.calls(), 1);
    }
}
