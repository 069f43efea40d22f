use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::TaskId;

/// A single task record as held by the task store.
///
/// `id` and `created_at` are assigned by the store at insertion time and are
/// immutable thereafter; `title` and `completed` form the mutable field group
/// and are always written together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// User-visible label; never empty after a successful create or update.
    pub title: String,
    /// Completion flag; `false` on creation.
    pub completed: bool,
    /// Insertion timestamp, UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
