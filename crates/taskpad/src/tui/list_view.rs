use std::collections::HashMap;

use taskpad_core::{StatusFilter, Task, TaskId};

/// Manages task visibility, the status filter, and selection independent of IO.
///
/// Holds indexes into the snapshot's task slice; rebuilt after every snapshot
/// install or filter change. Never re-sorts: visible order is snapshot order.
#[derive(Debug, Default)]
pub(super) struct ListView {
    filter: StatusFilter,
    visible: Vec<usize>,
    visible_index: HashMap<TaskId, usize>,
    selected: usize,
}

#[allow(clippy::missing_const_for_fn)]
impl ListView {
    pub(super) fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub(super) fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub(super) fn rebuild(&mut self, tasks: &[Task], preferred: Option<TaskId>) {
        self.visible.clear();
        self.visible_index.clear();

        if tasks.is_empty() {
            self.selected = 0;
            return;
        }

        for (idx, task) in tasks.iter().enumerate() {
            if self.filter.matches(task) {
                let pos = self.visible.len();
                self.visible.push(idx);
                self.visible_index.insert(task.id, pos);
            }
        }

        self.selected = self.resolve_selection(preferred);
    }

    fn resolve_selection(&self, preferred: Option<TaskId>) -> usize {
        if self.visible.is_empty() {
            return 0;
        }
        if let Some(id) = preferred
            && let Some(&index) = self.visible_index.get(&id)
        {
            return index;
        }
        self.selected.min(self.visible.len() - 1)
    }

    pub(super) fn has_visible_tasks(&self) -> bool {
        !self.visible.is_empty()
    }

    pub(super) fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub(super) fn visible_tasks<'a>(
        &'a self,
        tasks: &'a [Task],
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.visible.iter().filter_map(move |&idx| tasks.get(idx))
    }

    #[cfg(test)]
    pub(super) fn contains(&self, task_id: TaskId) -> bool {
        self.visible_index.contains_key(&task_id)
    }

    pub(super) fn selected_index(&self) -> usize {
        self.selected
    }

    pub(super) fn selected_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        self.visible.get(self.selected).and_then(|&idx| tasks.get(idx))
    }

    pub(super) fn selected_task_id(&self, tasks: &[Task]) -> Option<TaskId> {
        self.selected_task(tasks).map(|task| task.id)
    }

    pub(super) fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub(super) fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        }
    }
}
