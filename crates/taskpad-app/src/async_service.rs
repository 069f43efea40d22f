//! Async adapter over the blocking task service for the MCP surface.

use anyhow::anyhow;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task;

use taskpad_core::{Task, TaskId};

use crate::service::{TaskService, TaskServiceError, TaskStore};

/// Async façade over a [`TaskService`].
///
/// The blocking service (and its SQLite connection) lives behind a mutex;
/// each call moves the work onto the blocking thread pool so async handlers
/// never hold the lock across an await point.
pub struct AsyncTaskService<S> {
    inner: Arc<Mutex<TaskService<S>>>,
}

impl<S> Clone for AsyncTaskService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AsyncTaskService<S>
where
    S: TaskStore + Send + 'static,
{
    /// Wrap a blocking service for async use.
    #[must_use]
    pub fn new(service: TaskService<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, TaskServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskService<S>) -> Result<T, TaskServiceError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || {
            let guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
            op(&guard)
        })
        .await
        .map_err(|err| TaskServiceError::Store(anyhow!("task join error: {err}")))?
    }

    /// Async [`TaskService::list_all`].
    ///
    /// # Errors
    /// Propagates service failures.
    pub async fn list_all(&self) -> Result<Vec<Task>, TaskServiceError> {
        self.run(TaskService::list_all).await
    }

    /// Async [`TaskService::create`].
    ///
    /// # Errors
    /// Propagates service failures.
    pub async fn create(&self, title: String) -> Result<Task, TaskServiceError> {
        self.run(move |service| service.create(&title)).await
    }

    /// Async [`TaskService::update`].
    ///
    /// # Errors
    /// Propagates service failures.
    pub async fn update(
        &self,
        id: TaskId,
        title: String,
        completed: bool,
    ) -> Result<Task, TaskServiceError> {
        self.run(move |service| service.update(id, &title, completed))
            .await
    }

    /// Async [`TaskService::delete`].
    ///
    /// # Errors
    /// Propagates service failures.
    pub async fn delete(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.run(move |service| service.delete(id)).await
    }

    /// Async [`TaskService::get_latest`].
    ///
    /// # Errors
    /// Propagates service failures.
    pub async fn get_latest(&self) -> Result<Option<Task>, TaskServiceError> {
        self.run(TaskService::get_latest).await
    }
}
