//! Task filtering and counting.

use mediabridge_api_models::{TaskItem, TaskStatus};

use crate::features::tasks::state::{TaskCounts, TaskFilter};

/// Count tasks per tab.
#[must_use]
pub fn tab_counts(tasks: &[TaskItem]) -> TaskCounts {
    tasks.iter().fold(
        TaskCounts {
            all: tasks.len(),
            ..TaskCounts::default()
        },
        |mut counts, task| {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Failed => counts.failed += 1,
                TaskStatus::Unknown(_) => {}
            }
            counts
        },
    )
}

/// Tasks visible under `filter`, in backend order.
#[must_use]
pub fn filter_tasks(tasks: &[TaskItem], filter: TaskFilter) -> Vec<&TaskItem> {
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabridge_test_support::fixtures::{task, task_mix};

    #[test]
    fn counts_and_filters_mixed_list() {
        let list = task_mix(12, 3, 1);
        let counts = tab_counts(&list.tasks);

        let shown: Vec<usize> = TaskFilter::TABS
            .iter()
            .map(|filter| counts.for_filter(*filter))
            .collect();
        assert_eq!(shown, vec![16, 12, 3, 1]);

        let completed = filter_tasks(&list.tasks, TaskFilter::Completed);
        assert_eq!(completed.len(), 3);
        assert!(
            completed
                .iter()
                .all(|task| task.status == TaskStatus::Completed)
        );
    }

    #[test]
    fn filtered_subset_matches_status_for_every_tab() {
        let mut tasks = task_mix(2, 2, 2).tasks;
        tasks.push(task(99, TaskStatus::Unknown(7)));

        for filter in TaskFilter::TABS {
            let visible = filter_tasks(&tasks, filter);
            let expected: Vec<&TaskItem> = tasks
                .iter()
                .filter(|task| filter.matches(task.status))
                .collect();
            assert_eq!(visible, expected);
        }
        assert_eq!(filter_tasks(&tasks, TaskFilter::All).len(), 7);
        assert_eq!(tab_counts(&tasks).all, 7);
    }
}
