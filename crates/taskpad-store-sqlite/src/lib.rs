//! SQLite-backed task store.
//!
//! The store is the single source of truth: one `tasks` table, each operation
//! a single atomic SQL statement. `id` and `created_at` are assigned by the
//! database at insertion time and never change afterwards.

mod error;

pub use error::SqliteStoreError;

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

use taskpad_core::{Task, TaskId};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT    NOT NULL CHECK (length(title) > 0),
    completed  INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

const TASK_COLUMNS: &str = "id, title, completed, created_at";

/// Raw column tuple as read from the `tasks` table.
type RawTaskRow = (i64, String, i64, i64);

/// Persistent task store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema.
    ///
    /// # Errors
    /// Returns an error when the file cannot be opened or bootstrapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// Open an in-memory database.
    ///
    /// Nothing persists across restarts; this backs tests and the standalone
    /// no-database mode.
    ///
    /// # Errors
    /// Returns an error when bootstrap fails.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, SqliteStoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        debug!("task store ready");
        Ok(Self { conn })
    }

    /// Insert a new task; the database assigns `id` and `created_at`.
    ///
    /// # Errors
    /// Returns an error when the insert fails or the returned row is invalid.
    pub fn insert_task(&self, title: &str) -> Result<Task, SqliteStoreError> {
        let raw: RawTaskRow = self.conn.query_row(
            &format!("INSERT INTO tasks (title) VALUES (?1) RETURNING {TASK_COLUMNS};"),
            params![title],
            read_raw_row,
        )?;
        let task = task_from_row(raw)?;
        debug!(id = %task.id, "inserted task");
        Ok(task)
    }

    /// List every task in store order (ascending id, i.e. insertion order).
    ///
    /// # Errors
    /// Returns an error when the query fails or a row is invalid.
    pub fn fetch_tasks(&self) -> Result<Vec<Task>, SqliteStoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: RawTaskRow = (row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?);
            tasks.push(task_from_row(raw)?);
        }
        Ok(tasks)
    }

    /// Replace the mutable field group (`title`, `completed`) of a task.
    ///
    /// Returns `None` when no row with the given id exists; `created_at` is
    /// left untouched.
    ///
    /// # Errors
    /// Returns an error when the update fails or the returned row is invalid.
    pub fn replace_task(
        &self,
        id: TaskId,
        title: &str,
        completed: bool,
    ) -> Result<Option<Task>, SqliteStoreError> {
        let raw: Option<RawTaskRow> = self
            .conn
            .query_row(
                &format!(
                    "UPDATE tasks SET title = ?1, completed = ?2 WHERE id = ?3 \
                     RETURNING {TASK_COLUMNS};"
                ),
                params![title, i64::from(completed), id.as_i64()],
                read_raw_row,
            )
            .optional()?;
        match raw {
            Some(raw) => {
                let task = task_from_row(raw)?;
                debug!(id = %task.id, completed = task.completed, "replaced task");
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// Delete a task row. Returns `false` when no row with the id exists.
    ///
    /// # Errors
    /// Returns an error when the delete fails.
    pub fn remove_task(&self, id: TaskId) -> Result<bool, SqliteStoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", params![id.as_i64()])?;
        let deleted = changed > 0;
        debug!(id = %id, deleted, "removed task");
        Ok(deleted)
    }

    /// The most recently created task, ties broken by the higher id.
    ///
    /// # Errors
    /// Returns an error when the query fails or the row is invalid.
    pub fn latest_task(&self) -> Result<Option<Task>, SqliteStoreError> {
        let raw: Option<RawTaskRow> = self
            .conn
            .query_row(
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks \
                     ORDER BY created_at DESC, id DESC LIMIT 1;"
                ),
                [],
                read_raw_row,
            )
            .optional()?;
        raw.map(task_from_row).transpose()
    }
}

fn read_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTaskRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn task_from_row((id, title, completed, created_at_ms): RawTaskRow) -> Result<Task, SqliteStoreError> {
    let completed = match completed {
        0 => false,
        1 => true,
        other => {
            return Err(SqliteStoreError::InvalidRow(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };
    let created_at =
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(created_at_ms) * 1_000_000).map_err(
            |_| {
                SqliteStoreError::InvalidRow(format!(
                    "invalid created_at value `{created_at_ms}` in tasks.created_at"
                ))
            },
        )?;

    Ok(Task {
        id: TaskId(id),
        title,
        completed,
        created_at,
    })
}
