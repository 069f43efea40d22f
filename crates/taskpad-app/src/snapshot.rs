//! Client-side snapshot of the task collection.

use std::collections::HashMap;

use taskpad_core::{StatusFilter, Task, TaskId};

/// The client's last-known copy of the full task collection.
///
/// Advisory, not authoritative: it reflects the store as of the last fetch
/// and is replaced wholesale after every mutation. The revision counter makes
/// each install observable, so views can tell "same value" from "same value,
/// re-fetched".
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    revision: u64,
}

impl Snapshot {
    /// Replace the snapshot contents with a freshly fetched task list.
    pub(crate) fn install(&mut self, tasks: Vec<Task>) {
        self.index = tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| (task.id, idx))
            .collect();
        self.tasks = tasks;
        self.revision += 1;
    }

    /// Tasks in the order the store returned them.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).and_then(|&idx| self.tasks.get(idx))
    }

    /// Whether a task with the id is present.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of tasks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the snapshot holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// How many times the snapshot has been installed.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Derive the filtered view, preserving snapshot order.
    #[must_use]
    pub fn filtered(&self, filter: StatusFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use time::OffsetDateTime;

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: format!("task {id}"),
            completed,
            created_at: OffsetDateTime::from_unix_timestamp(id).expect("valid timestamp"),
        }
    }

    #[test]
    fn install_indexes_tasks_and_bumps_revision() {
        let mut snapshot = Snapshot::default();
        assert_eq!(snapshot.revision(), 0);

        snapshot.install(vec![task(1, false), task(2, true)]);
        assert_eq!(snapshot.revision(), 1);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(TaskId(2)));
        assert_eq!(snapshot.get(TaskId(1)).map(|t| t.id), Some(TaskId(1)));

        snapshot.install(vec![task(3, false)]);
        assert_eq!(snapshot.revision(), 2);
        assert!(!snapshot.contains(TaskId(1)));
        assert!(snapshot.contains(TaskId(3)));
    }

    #[test]
    fn filtered_preserves_snapshot_order() {
        let mut snapshot = Snapshot::default();
        snapshot.install(vec![task(3, true), task(1, false), task(2, true)]);

        let completed: Vec<TaskId> = snapshot
            .filtered(StatusFilter::Completed)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(completed, vec![TaskId(3), TaskId(2)]);

        let active: Vec<TaskId> = snapshot
            .filtered(StatusFilter::Active)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(active, vec![TaskId(1)]);
    }

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.get(TaskId(1)).is_none());
        assert!(snapshot.filtered(StatusFilter::All).is_empty());
    }
}
