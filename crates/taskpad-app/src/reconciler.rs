//! Client state reconciliation against the task store.

use tracing::{debug, warn};

use taskpad_core::{Task, TaskId};

use crate::service::{TaskService, TaskServiceError, TaskStore};
use crate::snapshot::Snapshot;

/// Keeps a client-local [`Snapshot`] consistent with the task store.
///
/// Every mutating intent maps to exactly one service call; on success the
/// full list is re-fetched and installed wholesale. Consistency comes from
/// discarding the stale snapshot, never from merging diffs. When several
/// clients race, the last snapshot installed wins; requests carry no sequence
/// token, so an older in-flight fetch that resolves late can briefly shadow a
/// newer one.
///
/// On any service failure the previous snapshot stays installed untouched;
/// the attempted intent simply has no visible effect.
pub struct Reconciler<S> {
    service: TaskService<S>,
    snapshot: Snapshot,
}

impl<S> Reconciler<S> {
    /// Wrap a service; the snapshot starts empty until the first [`sync`].
    ///
    /// [`sync`]: Self::sync
    pub fn new(service: TaskService<S>) -> Self {
        Self {
            service,
            snapshot: Snapshot::default(),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Borrow the underlying service (read-only use such as `get_latest`).
    #[must_use]
    pub const fn service(&self) -> &TaskService<S> {
        &self.service
    }
}

impl<S: TaskStore> Reconciler<S> {
    /// Fetch the full task list and install it as the new snapshot.
    ///
    /// # Errors
    /// Propagates service failures; the previous snapshot stays installed.
    pub fn sync(&mut self) -> Result<(), TaskServiceError> {
        let tasks = self.service.list_all()?;
        self.snapshot.install(tasks);
        Ok(())
    }

    /// Create a task from the given title, then re-sync.
    ///
    /// A blank title is rejected locally and reported as `None` without any
    /// service call; otherwise the store-assigned record is returned.
    ///
    /// # Errors
    /// Propagates service failures; the previous snapshot stays installed.
    pub fn add_task(&mut self, title: &str) -> Result<Option<Task>, TaskServiceError> {
        if title.trim().is_empty() {
            debug!("dropping add intent with blank title");
            return Ok(None);
        }
        let created = self.service.create(title)?;
        self.sync()?;
        Ok(Some(created))
    }

    /// Negate a task's completion flag, then re-sync.
    ///
    /// The task is looked up in the current snapshot, not the store: an id
    /// that is no longer present is silently dropped and reported as `false`.
    ///
    /// # Errors
    /// Propagates service failures; the previous snapshot stays installed.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool, TaskServiceError> {
        let Some(task) = self.snapshot.get(id) else {
            debug!(id = %id, "dropping toggle intent for task missing from snapshot");
            return Ok(false);
        };
        let title = task.title.clone();
        let completed = task.completed;
        self.service.update(id, &title, !completed)?;
        self.sync()?;
        Ok(true)
    }

    /// Replace a task's title, re-sending the snapshot's completion flag,
    /// then re-sync.
    ///
    /// A blank title is rejected locally before any service call; an id
    /// missing from the snapshot is dropped the same way a stale toggle is.
    ///
    /// # Errors
    /// Propagates service failures; the previous snapshot stays installed.
    pub fn edit_title(&mut self, id: TaskId, new_title: &str) -> Result<bool, TaskServiceError> {
        if new_title.trim().is_empty() {
            debug!(id = %id, "dropping edit intent with blank title");
            return Ok(false);
        }
        let Some(task) = self.snapshot.get(id) else {
            debug!(id = %id, "dropping edit intent for task missing from snapshot");
            return Ok(false);
        };
        let completed = task.completed;
        self.service.update(id, new_title, completed)?;
        self.sync()?;
        Ok(true)
    }

    /// Delete a task, then re-sync.
    ///
    /// A not-found from a concurrent delete is tolerated: the re-sync simply
    /// reflects the absence.
    ///
    /// # Errors
    /// Propagates other service failures; the previous snapshot stays
    /// installed.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), TaskServiceError> {
        match self.service.delete(id) {
            Ok(()) => {}
            Err(TaskServiceError::NotFound(_)) => {
                warn!(id = %id, "task already gone, re-syncing");
            }
            Err(err) => return Err(err),
        }
        self.sync()
    }
}
