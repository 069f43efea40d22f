//! Parameter definitions for MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for creating a new task.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    /// Human-readable title for the task; must not be empty.
    pub title: String,
}

/// Parameters for updating an existing task.
///
/// Both mutable fields are required on every update: callers re-send the
/// unchanged one (toggling completion re-sends the title and vice versa).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    /// Task id to update.
    pub id: i64,
    /// Replacement title; must not be empty.
    pub title: String,
    /// Replacement completion flag.
    pub completed: bool,
}

/// Parameters for deleting a task.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteTaskParams {
    /// Task id to delete.
    pub id: i64,
}
