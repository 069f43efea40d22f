use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a task.
///
/// Assigned by the task store at insertion time (a monotonically increasing
/// integer primary key); never reused for the lifetime of the store.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Raw integer value as stored in the task table.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn task_id_roundtrip() {
        let parsed: TaskId = "42".parse().expect("must parse task id");
        assert_eq!(parsed, TaskId(42));
        assert_eq!(parsed.to_string(), "42");
    }

    #[test]
    fn task_id_rejects_garbage() {
        assert!("not-a-number".parse::<TaskId>().is_err());
    }

    #[test]
    fn task_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&TaskId(7)).expect("must serialize");
        assert_eq!(json, "7");
    }
}
