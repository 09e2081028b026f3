use std::io::Write;

use anyhow::anyhow;
use mediabridge_client::QuerySnapshot;
use mediabridge_ui::DashboardView;
use mediabridge_ui::features::dashboard::api::load_dashboard;
use tracing::{info, warn};

use crate::cli::DashboardArgs;
use crate::client::{AppContext, CliError, CliResult, emit, say};
use crate::output::render_dashboard;

const SECTION_COUNT: usize = 4;

pub(crate) async fn handle_dashboard<W: Write>(
    ctx: &AppContext,
    args: DashboardArgs,
    out: &mut W,
) -> CliResult<()> {
    if args.watch {
        return watch_dashboard(ctx, out, None, ctrl_c()).await;
    }
    let view = load_dashboard(&ctx.query).await;
    ensure_reachable(&view)?;
    emit(out, &render_dashboard(&view, ctx.output)?)
}

fn ensure_reachable(view: &DashboardView) -> CliResult<()> {
    if view.failed_sections.len() >= SECTION_COUNT {
        return Err(CliError::failure(anyhow!(
            "dashboard unavailable: every query failed"
        )));
    }
    Ok(())
}

/// Redraw on every status poll until `interrupt` resolves or `max_updates`
/// redraws. The interrupt is watched during reloads too.
async fn watch_dashboard<W, F>(
    ctx: &AppContext,
    out: &mut W,
    max_updates: Option<usize>,
    interrupt: F,
) -> CliResult<()>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut poll = ctx.query.spawn_status_poll();
    let mut redraws = 0_usize;
    tokio::pin!(interrupt);
    loop {
        let snapshot = tokio::select! {
            snapshot = poll.changed() => snapshot,
            () = &mut interrupt => {
                info!("dashboard watch interrupted");
                break;
            }
        };
        let Some(snapshot) = snapshot else {
            break;
        };
        if let QuerySnapshot::Failed(err) = &snapshot {
            warn!(error = %err, "status poll failed");
        }
        let view = tokio::select! {
            view = load_dashboard(&ctx.query) => view,
            () = &mut interrupt => {
                info!("dashboard watch interrupted during reload");
                break;
            }
        };
        if redraws > 0 {
            say(out, "")?;
        }
        emit(out, &render_dashboard(&view, ctx.output)?)?;
        redraws += 1;
        if max_updates.is_some_and(|limit| redraws >= limit) {
            break;
        }
    }
    Ok(())
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use httpmock::prelude::*;
    use mediabridge_client::{ApiClient, QueryClient, QueryPolicy};
    use mediabridge_test_support::fixtures::{library, running_status, task_mix};
    use mediabridge_test_support::mocks::{mock_failure, mock_get};
    use mediabridge_api_models::{LibrariesResponse, TaskListResponse};
    use std::time::Duration;

    fn context(server: &MockServer, output: OutputFormat) -> AppContext {
        let base_url = server.base_url().parse().expect("mock server URL");
        let api = ApiClient::new(base_url, Duration::from_secs(5), None).expect("client");
        AppContext {
            query: QueryClient::new(
                api,
                QueryPolicy {
                    retry: 0,
                    stale_time: Duration::ZERO,
                    status_poll_interval: Duration::from_millis(20),
                    ..QueryPolicy::default()
                },
            ),
            output,
        }
    }

    #[tokio::test]
    async fn dashboard_renders_partial_failures() {
        let server = MockServer::start_async().await;
        mock_get(&server, "/api/status", &running_status(1));
        mock_get(&server, "/api/tasks", &task_mix(2, 1, 0));
        mock_failure(&server, GET, "/api/organize/records", 500, "db locked");
        mock_get(
            &server,
            "/api/libraries",
            &LibrariesResponse {
                libraries: vec![library("movies")],
            },
        );

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle_dashboard(&ctx, DashboardArgs::default(), &mut out)
            .await
            .expect("dashboard should render");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("全部 3 | 进行中 2 | 完成 1 | 失败 0"));
        assert!(text.contains("unavailable: records"));
    }

    #[tokio::test]
    async fn dashboard_fails_when_backend_is_down() {
        let server = MockServer::start_async().await;
        for path in ["/api/status", "/api/tasks", "/api/organize/records", "/api/libraries"] {
            mock_failure(&server, GET, path, 503, "maintenance");
        }

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        let err = handle_dashboard(&ctx, DashboardArgs::default(), &mut out)
            .await
            .expect_err("all sections failed");
        assert_eq!(err.exit_code(), 3);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn dashboard_treats_missing_data_as_empty() {
        let server = MockServer::start_async().await;
        for path in ["/api/status", "/api/tasks", "/api/organize/records", "/api/libraries"] {
            mock_get(&server, path, &serde_json::Value::Null);
        }

        let ctx = context(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle_dashboard(&ctx, DashboardArgs::default(), &mut out)
            .await
            .expect("dashboard should render");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("JSON output");
        assert!(value["status"].is_null());
        assert_eq!(value["counts"]["all"], 0);
        assert_eq!(value["recent_tasks"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn watch_redraws_on_each_status_poll() {
        let server = MockServer::start_async().await;
        let status = mock_get(&server, "/api/status", &running_status(0));
        mock_get(&server, "/api/tasks", &TaskListResponse::default());
        mock_get(&server, "/api/organize/records", &serde_json::Value::Null);
        mock_get(&server, "/api/libraries", &LibrariesResponse { libraries: Vec::new() });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        watch_dashboard(&ctx, &mut out, Some(2), std::future::pending())
            .await
            .expect("watch should stop after two redraws");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches("monitor: 运行中").count(), 2);
        assert!(status.calls() >= 2);
    }

    #[tokio::test]
    async fn watch_stops_when_interrupted_mid_reload() {
        let server = MockServer::start_async().await;
        mock_get(&server, "/api/status", &running_status(0));
        server.mock(|when, then| {
            when.method(GET).path("/api/tasks");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"code": 0, "message": "ok", "data": null}));
        });
        mock_get(&server, "/api/organize/records", &serde_json::Value::Null);
        mock_get(&server, "/api/libraries", &LibrariesResponse { libraries: Vec::new() });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        let started = std::time::Instant::now();
        watch_dashboard(
            &ctx,
            &mut out,
            None,
            tokio::time::sleep(Duration::from_millis(100)),
        )
        .await
        .expect("interrupt ends the watch cleanly");

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(out.is_empty());
    }
}
