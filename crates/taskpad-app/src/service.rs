//! Validated task mutation service shared by CLI/TUI/MCP surfaces.

use anyhow::Error;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{debug, info};

use taskpad_core::{Task, TaskId};
use taskpad_store_sqlite::{SqliteStore, SqliteStoreError};

/// Minimal storage abstraction required by [`TaskService`].
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Insert a new task; the store assigns `id` and `created_at`.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting the row fails.
    fn insert_task(&self, title: &str) -> Result<Task, Self::Error>;

    /// List every task in store order.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error>;

    /// Replace the mutable field group of a task; `None` when the id is
    /// unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn replace_task(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Option<Task>, Self::Error>;

    /// Delete a task row; `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns a store-specific error when the delete fails.
    fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error>;

    /// The most recently created task, or `None` when the store is empty.
    ///
    /// # Errors
    /// Returns a store-specific error when the query fails.
    fn latest_task(&self) -> Result<Option<Task>, Self::Error>;
}

impl TaskStore for SqliteStore {
    type Error = SqliteStoreError;

    fn insert_task(&self, title: &str) -> Result<Task, Self::Error> {
        Self::insert_task(self, title)
    }

    fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        Self::fetch_tasks(self)
    }

    fn replace_task(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Option<Task>, Self::Error> {
        Self::replace_task(self, id, title, completed)
    }

    fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        Self::remove_task(self, id)
    }

    fn latest_task(&self) -> Result<Option<Task>, Self::Error> {
        Self::latest_task(self)
    }
}

impl<S: TaskStore> TaskStore for &S {
    type Error = S::Error;

    fn insert_task(&self, title: &str) -> Result<Task, Self::Error> {
        (**self).insert_task(title)
    }

    fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).fetch_tasks()
    }

    fn replace_task(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Option<Task>, Self::Error> {
        (**self).replace_task(id, title, completed)
    }

    fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        (**self).remove_task(id)
    }

    fn latest_task(&self) -> Result<Option<Task>, Self::Error> {
        (**self).latest_task()
    }
}

impl<S: TaskStore> TaskStore for Arc<S> {
    type Error = S::Error;

    fn insert_task(&self, title: &str) -> Result<Task, Self::Error> {
        (**self).insert_task(title)
    }

    fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).fetch_tasks()
    }

    fn replace_task(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Option<Task>, Self::Error> {
        (**self).replace_task(id, title, completed)
    }

    fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error> {
        (**self).remove_task(id)
    }

    fn latest_task(&self) -> Result<Option<Task>, Self::Error> {
        (**self).latest_task()
    }
}

/// Failures surfaced by [`TaskService`].
///
/// Validation and not-found conditions are distinct, distinguishable errors;
/// the service never silently swallows either.
#[derive(Debug, ThisError)]
pub enum TaskServiceError {
    /// The supplied title was empty or whitespace-only.
    #[error("title must not be empty")]
    EmptyTitle,

    /// No task with the referenced id exists in the store.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The round trip to the backing store failed.
    #[error("store error: {0}")]
    Store(#[source] Error),
}

/// Validated CRUD surface over the task store.
///
/// Owns the title validation and identity rules; every operation either fully
/// applies or fully fails before any store mutation.
pub struct TaskService<S> {
    store: S,
}

impl<S> TaskService<S> {
    /// Construct a service over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Expose a reference to the underlying store (read-only operations).
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TaskStore> TaskService<S> {
    fn store_error(err: S::Error) -> TaskServiceError {
        TaskServiceError::Store(err.into())
    }

    fn validate_title(title: &str) -> Result<(), TaskServiceError> {
        if title.trim().is_empty() {
            debug!("rejecting blank title");
            return Err(TaskServiceError::EmptyTitle);
        }
        Ok(())
    }

    /// Every task currently in the store, in store order.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when the fetch fails.
    pub fn list_all(&self) -> Result<Vec<Task>, TaskServiceError> {
        self.store.fetch_tasks().map_err(Self::store_error)
    }

    /// Create a task with the given title and return the full record.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::EmptyTitle`] before any store mutation
    /// when the title is blank, or [`TaskServiceError::Store`] when the
    /// insert fails.
    pub fn create(&self, title: &str) -> Result<Task, TaskServiceError> {
        Self::validate_title(title)?;
        let task = self.store.insert_task(title).map_err(Self::store_error)?;
        info!(id = %task.id, "created task");
        Ok(task)
    }

    /// Replace the mutable field group (`title`, `completed`) of a task.
    ///
    /// Partial-field updates are unsupported: callers supply both fields on
    /// every update, re-sending whichever one is unchanged.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::EmptyTitle`] when the title is blank,
    /// [`TaskServiceError::NotFound`] when the id is unknown, or
    /// [`TaskServiceError::Store`] when the write fails.
    pub fn update(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Task, TaskServiceError> {
        Self::validate_title(title)?;
        match self
            .store
            .replace_task(id, title, completed)
            .map_err(Self::store_error)?
        {
            Some(task) => {
                info!(id = %task.id, completed = task.completed, "updated task");
                Ok(task)
            }
            None => Err(TaskServiceError::NotFound(id)),
        }
    }

    /// Delete a task permanently.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::NotFound`] when the id is unknown, or
    /// [`TaskServiceError::Store`] when the delete fails.
    pub fn delete(&self, id: TaskId) -> Result<(), TaskServiceError> {
        if self.store.remove_task(id).map_err(Self::store_error)? {
            info!(id = %id, "deleted task");
            Ok(())
        } else {
            Err(TaskServiceError::NotFound(id))
        }
    }

    /// The most recently created task, or `None` when the store is empty.
    ///
    /// # Errors
    /// Returns [`TaskServiceError::Store`] when the query fails.
    pub fn get_latest(&self) -> Result<Option<Task>, TaskServiceError> {
        self.store.latest_task().map_err(Self::store_error)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    #![allow(clippy::unwrap_used)]

    use super::TaskStore;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use taskpad_core::{Task, TaskId};
    use time::OffsetDateTime;

    /// Shared in-memory store for unit tests, with call recording and
    /// injectable failures.
    #[derive(Clone, Default)]
    pub(crate) struct MockStore {
        inner: Arc<MockStoreInner>,
    }

    #[derive(Default)]
    struct MockStoreInner {
        tasks: Mutex<Vec<Task>>,
        next_id: Mutex<i64>,
        insert_calls: Mutex<u32>,
        fetch_calls: Mutex<u32>,
        replace_calls: Mutex<Vec<(TaskId, String, bool)>>,
        remove_calls: Mutex<Vec<TaskId>>,
        fail_insert: Mutex<bool>,
        fail_fetch: Mutex<bool>,
    }

    pub(crate) fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl MockStore {
        pub(crate) fn tasks(&self) -> Vec<Task> {
            guard(&self.inner.tasks).clone()
        }

        pub(crate) fn insert_calls(&self) -> u32 {
            *guard(&self.inner.insert_calls)
        }

        pub(crate) fn fetch_calls(&self) -> u32 {
            *guard(&self.inner.fetch_calls)
        }

        pub(crate) fn replace_calls(&self) -> Vec<(TaskId, String, bool)> {
            guard(&self.inner.replace_calls).clone()
        }

        pub(crate) fn remove_calls(&self) -> Vec<TaskId> {
            guard(&self.inner.remove_calls).clone()
        }

        pub(crate) fn fail_insert(&self) {
            *guard(&self.inner.fail_insert) = true;
        }

        pub(crate) fn fail_fetch(&self) {
            *guard(&self.inner.fail_fetch) = true;
        }

        /// Drop a task behind the client's back, simulating another client.
        pub(crate) fn evict(&self, id: TaskId) {
            guard(&self.inner.tasks).retain(|task| task.id != id);
        }
    }

    impl TaskStore for MockStore {
        type Error = anyhow::Error;

        fn insert_task(&self, title: &str) -> Result<Task, Self::Error> {
            *guard(&self.inner.insert_calls) += 1;
            if *guard(&self.inner.fail_insert) {
                return Err(anyhow!("injected insert failure"));
            }
            let id = {
                let mut next = guard(&self.inner.next_id);
                *next += 1;
                *next
            };
            let task = Task {
                id: TaskId(id),
                title: title.to_owned(),
                completed: false,
                created_at: OffsetDateTime::from_unix_timestamp(id).unwrap(),
            };
            guard(&self.inner.tasks).push(task.clone());
            Ok(task)
        }

        fn fetch_tasks(&self) -> Result<Vec<Task>, Self::Error> {
            *guard(&self.inner.fetch_calls) += 1;
            if *guard(&self.inner.fail_fetch) {
                return Err(anyhow!("injected fetch failure"));
            }
            Ok(guard(&self.inner.tasks).clone())
        }

        fn replace_task(
            &self,
            id: TaskId,
            title: &str,
            completed: bool,
        ) -> Result<Option<Task>, Self::Error> {
            guard(&self.inner.replace_calls).push((id, title.to_owned(), completed));
            let mut tasks = guard(&self.inner.tasks);
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return Ok(None);
            };
            task.title = title.to_owned();
            task.completed = completed;
            Ok(Some(task.clone()))
        }

        fn remove_task(&self, id: TaskId) -> Result<bool, Self::Error> {
            guard(&self.inner.remove_calls).push(id);
            let mut tasks = guard(&self.inner.tasks);
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            Ok(tasks.len() < before)
        }

        fn latest_task(&self) -> Result<Option<Task>, Self::Error> {
            Ok(guard(&self.inner.tasks)
                .iter()
                .max_by_key(|task| (task.created_at, task.id))
                .cloned())
        }
    }
}
