//! Canned API payloads.

use mediabridge_api_models::{
    ConfigResponse, LibraryItem, MediaConfig, OrganizeRecordItem, OrganizeStatus, P115Config,
    StatusResponse, TaskItem, TaskListResponse, TaskStatus, XxConfig,
};

/// Build a task with a deterministic id derived from `index`.
#[must_use]
pub fn task(index: usize, status: TaskStatus) -> TaskItem {
    TaskItem {
        task_id: format!("{index:040x}"),
        name: format!("task-{index}"),
        status,
        progress: match status {
            TaskStatus::Completed => 100.0,
            _ => 0.0,
        },
        add_time: format!("2024-05-{:02}T08:30:00", index % 28 + 1),
    }
}

/// Task list with the requested number of tasks per status, pending first.
#[must_use]
pub fn task_mix(pending: usize, completed: usize, failed: usize) -> TaskListResponse {
    let statuses = std::iter::repeat_n(TaskStatus::Pending, pending)
        .chain(std::iter::repeat_n(TaskStatus::Completed, completed))
        .chain(std::iter::repeat_n(TaskStatus::Failed, failed));
    let tasks: Vec<TaskItem> = statuses
        .enumerate()
        .map(|(index, status)| task(index, status))
        .collect();
    TaskListResponse {
        total: tasks.len() as u64,
        tasks,
    }
}

/// Library entry with paths derived from the name.
#[must_use]
pub fn library(name: &str) -> LibraryItem {
    LibraryItem {
        name: name.to_string(),
        download_path: format!("/downloads/{name}"),
        target_path: format!("/media/{name}"),
        kind: "system".to_string(),
        min_transfer_size: 0,
    }
}

/// Configuration aggregate used by settings tests.
#[must_use]
pub fn sample_config() -> ConfigResponse {
    ConfigResponse {
        p115: P115Config {
            rotation_training_interval_min: 30,
            rotation_training_interval_max: 120,
        },
        media: MediaConfig {
            min_transfer_size: 100,
            video_formats: vec!["mp4".into(), "mkv".into()],
            libraries: vec![library("movies"), library("tv")],
            xx: XxConfig {
                remove_keywords: vec!["sample".into()],
            },
        },
    }
}

/// Organize record with deterministic names.
#[must_use]
pub fn record(id: i64, status: OrganizeStatus) -> OrganizeRecordItem {
    OrganizeRecordItem {
        id,
        original_name: format!("raw-{id}.mkv"),
        organized_name: format!("Movie {id} (2024).mkv"),
        source_path: format!("/downloads/movies/raw-{id}.mkv"),
        target_path: format!("/media/movies/Movie {id} (2024).mkv"),
        status,
        error_message: match status {
            OrganizeStatus::Failed => Some("target exists".into()),
            _ => None,
        },
        created_at: "2024-05-01T12:00:00".into(),
    }
}

/// Status snapshot with a running monitor.
#[must_use]
pub fn running_status(active_tasks: u64) -> StatusResponse {
    StatusResponse {
        monitor_running: true,
        active_tasks,
        last_check_time: Some("2024-05-01T12:00:00".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_mix_orders_statuses() {
        let list = task_mix(2, 1, 1);
        let statuses: Vec<TaskStatus> = list.tasks.iter().map(|task| task.status).collect();
        assert_eq!(
            statuses,
            vec![
                TaskStatus::Pending,
                TaskStatus::Pending,
                TaskStatus::Completed,
                TaskStatus::Failed
            ]
        );
        assert_eq!(list.total, 4);
    }

    #[test]
    fn task_ids_are_unique() {
        let list = task_mix(12, 3, 1);
        let mut ids: Vec<&str> = list.tasks.iter().map(|task| task.task_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}
