//! Output renderers and formatting helpers for CLI commands.
//!
//! Renderers return text so handlers decide where it goes.

use anyhow::anyhow;
use mediabridge_api_models::{LibraryItem, OrganizeRecordItem, TaskItem};
use mediabridge_ui::core::logic::{EMPTY_CELL, format_date, progress_percent, truncate};
use mediabridge_ui::features::records::logic::{record_detail, record_time};
use mediabridge_ui::features::settings::state::{ConfirmPrompt, DraftConfig};
use mediabridge_ui::{DashboardView, RecordFilter, RecordsView, StatusSummary, TaskCounts, TaskFilter};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const NAME_WIDTH: usize = 48;

fn to_json(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn status_json(status: Option<&StatusSummary>) -> Value {
    status.map_or(Value::Null, |summary| {
        json!({
            "monitor_running": summary.running,
            "state": summary.state_label(),
            "active_tasks": summary.active_tasks,
            "last_check": summary.last_check,
        })
    })
}

fn status_line(status: Option<&StatusSummary>) -> String {
    status.map_or_else(
        || format!("monitor: {EMPTY_CELL}"),
        |summary| {
            format!(
                "monitor: {} | active tasks: {} | last check: {}",
                summary.state_label(),
                summary.active_tasks,
                summary.last_check
            )
        },
    )
}

fn counts_line(counts: &TaskCounts) -> String {
    TaskFilter::TABS
        .iter()
        .map(|tab| format!("{} {}", tab.label(), counts.for_filter(*tab)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn task_rows(tasks: &[&TaskItem], lines: &mut Vec<String>) {
    lines.push(format!(
        "{:<40} {:<6} {:>5} {:<16} NAME",
        "ID", "STATUS", "PROG", "ADDED"
    ));
    for task in tasks {
        lines.push(format!(
            "{:<40} {:<6} {:>4}% {:<16} {}",
            task.task_id,
            task.status.label(),
            progress_percent(task.progress),
            format_date(&task.add_time),
            truncate(&task.name, NAME_WIDTH)
        ));
    }
}

fn record_rows(records: &[OrganizeRecordItem], lines: &mut Vec<String>) {
    lines.push(format!("{:<16} {:<6} {:<32} DETAIL", "TIME", "STATUS", "ORGANIZED"));
    for record in records {
        lines.push(format!(
            "{:<16} {:<6} {:<32} {}",
            record_time(record),
            record.status.label(),
            truncate(&record.organized_name, 29),
            record_detail(record)
        ));
    }
}

fn library_lines(libraries: &[LibraryItem], lines: &mut Vec<String>) {
    for (index, library) in libraries.iter().enumerate() {
        lines.push(format!(
            "  {}. {} [{}] min {} MB",
            index + 1,
            library.name,
            library.kind,
            library.min_transfer_size
        ));
        lines.push(format!("     download: {}", library.download_path));
        lines.push(format!("     target:   {}", library.target_path));
    }
}

fn joined_or_empty(values: &[String]) -> String {
    if values.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        values.join(", ")
    }
}

pub(crate) fn render_dashboard(view: &DashboardView, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "status": status_json(view.status.as_ref()),
            "counts": {
                "all": view.counts.all,
                "pending": view.counts.pending,
                "completed": view.counts.completed,
                "failed": view.counts.failed,
            },
            "recent_tasks": view.recent_tasks,
            "recent_records": view.recent_records,
            "libraries": view.libraries,
            "failed_sections": view.failed_sections,
        })),
        OutputFormat::Table => {
            let mut lines = vec![status_line(view.status.as_ref()), counts_line(&view.counts)];
            lines.push(String::new());
            lines.push("recent tasks:".to_string());
            if view.recent_tasks.is_empty() {
                lines.push("  no tasks".to_string());
            } else {
                let tasks: Vec<&TaskItem> = view.recent_tasks.iter().collect();
                task_rows(&tasks, &mut lines);
            }
            lines.push(String::new());
            lines.push("recent records:".to_string());
            if view.recent_records.is_empty() {
                lines.push("  no records".to_string());
            } else {
                record_rows(&view.recent_records, &mut lines);
            }
            lines.push(String::new());
            lines.push(format!("libraries: {}", view.libraries.len()));
            library_lines(&view.libraries, &mut lines);
            if !view.failed_sections.is_empty() {
                lines.push(String::new());
                lines.push(format!("unavailable: {}", view.failed_sections.join(", ")));
            }
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_task_list(
    tasks: &[&TaskItem],
    counts: &TaskCounts,
    filter: TaskFilter,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "filter": filter.label(),
            "counts": {
                "all": counts.all,
                "pending": counts.pending,
                "completed": counts.completed,
                "failed": counts.failed,
            },
            "tasks": tasks,
        })),
        OutputFormat::Table => {
            let mut lines = vec![counts_line(counts)];
            if tasks.is_empty() {
                lines.push(format!("no {} tasks", filter.label()));
            } else {
                task_rows(tasks, &mut lines);
            }
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_records(
    view: &RecordsView,
    filter: RecordFilter,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "filter": filter.label(),
            "page": view.page,
            "total_pages": view.total_pages,
            "total": view.total,
            "records": view.records,
        })),
        OutputFormat::Table => {
            let mut lines = vec![format!("{} records: {}", filter.label(), view.total)];
            if view.records.is_empty() {
                lines.push("no records".to_string());
            } else {
                record_rows(&view.records, &mut lines);
            }
            if view.shows_pagination() {
                lines.push(format!("page {}/{}", view.page, view.total_pages));
            }
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_settings(
    draft: &DraftConfig,
    status: Option<&StatusSummary>,
    dirty: bool,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "status": status_json(status),
            "dirty": dirty,
            "config": draft.to_update_request(),
        })),
        OutputFormat::Table => {
            let mut lines = vec![status_line(status)];
            lines.push(format!("interval_min: {}", draft.interval_min));
            lines.push(format!("interval_max: {}", draft.interval_max));
            lines.push(format!("min_transfer_size: {} MB", draft.min_transfer_size));
            lines.push(format!("video_formats: {}", joined_or_empty(&draft.video_formats)));
            lines.push(format!("remove_keywords: {}", joined_or_empty(&draft.remove_keywords)));
            lines.push(format!("libraries: {}", draft.libraries.len()));
            library_lines(&draft.libraries, &mut lines);
            if dirty {
                lines.push("unsaved changes (run `save` to apply)".to_string());
            }
            Ok(lines.join("\n"))
        }
    }
}

pub(crate) fn render_prompt(prompt: &ConfirmPrompt) -> String {
    format!("{}: {}", prompt.title, prompt.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabridge_api_models::{OrganizeStatus, StatusResponse, TaskStatus};
    use mediabridge_test_support::fixtures::{library, record, running_status, sample_config, task};

    #[test]
    fn dashboard_table_lists_sections_and_failures() {
        let view = DashboardView {
            status: Some(StatusSummary::from(&running_status(3))),
            counts: TaskCounts {
                all: 2,
                pending: 1,
                completed: 1,
                failed: 0,
            },
            recent_tasks: vec![task(0, TaskStatus::Pending)],
            recent_records: Vec::new(),
            libraries: vec![library("movies")],
            failed_sections: vec!["records"],
        };
        let text = render_dashboard(&view, OutputFormat::Table).expect("render");
        assert!(text.starts_with("monitor: 运行中 | active tasks: 3 | last check: 2024/05/01 12:00"));
        assert!(text.contains("全部 2 | 进行中 1 | 完成 1 | 失败 0"));
        assert!(text.contains("task-0"));
        assert!(text.contains("no records"));
        assert!(text.contains("1. movies [system] min 0 MB"));
        assert!(text.ends_with("unavailable: records"));
    }

    #[test]
    fn dashboard_json_is_structured() {
        let view = DashboardView {
            status: Some(StatusSummary::from(&StatusResponse::default())),
            ..DashboardView::default()
        };
        let text = render_dashboard(&view, OutputFormat::Json).expect("render");
        let value: Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value["status"]["state"], "已停止");
        assert_eq!(value["counts"]["all"], 0);
        assert_eq!(value["failed_sections"], json!([]));
    }

    #[test]
    fn records_table_shows_detail_and_pages() {
        let view = RecordsView {
            records: vec![record(1, OrganizeStatus::Success), record(2, OrganizeStatus::Failed)],
            total: 41,
            page: 2,
            total_pages: 3,
        };
        let text = render_records(&view, RecordFilter::All, OutputFormat::Table).expect("render");
        assert!(text.contains("/media/movies/Movie 1 (2024).mkv"));
        assert!(text.contains("target exists"));
        assert!(text.ends_with("page 2/3"));

        let single = RecordsView {
            total_pages: 1,
            ..view
        };
        let text = render_records(&single, RecordFilter::All, OutputFormat::Table).expect("render");
        assert!(!text.contains("page "));
    }

    #[test]
    fn settings_table_marks_unsaved_changes() {
        let draft = DraftConfig::from_server(&sample_config());
        let text = render_settings(&draft, None, true, OutputFormat::Table).expect("render");
        assert!(text.contains("video_formats: mp4, mkv"));
        assert!(text.contains("remove_keywords: sample"));
        assert!(text.contains("2. tv [system] min 0 MB"));
        assert!(text.ends_with("unsaved changes (run `save` to apply)"));

        let json = render_settings(&draft, None, false, OutputFormat::Json).expect("render");
        let value: Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["config"]["media"]["video_formats"], json!(["mp4", "mkv"]));
        assert_eq!(value["dirty"], false);
    }
}
