//! Shared helpers for MCP tool implementations.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use taskpad_app::TaskServiceError;

/// Map service failures onto distinguishable MCP error kinds.
pub fn map_service_error(err: TaskServiceError) -> McpError {
    match err {
        TaskServiceError::EmptyTitle => {
            McpError::invalid_params("title must not be empty".to_owned(), None)
        }
        TaskServiceError::NotFound(id) => {
            McpError::invalid_params(format!("Task not found: {id}"), None)
        }
        TaskServiceError::Store(error) => McpError::internal_error(error.to_string(), None),
    }
}

/// Render a serializable value as a successful JSON tool result.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use anyhow::anyhow;
    use rmcp::model::ErrorCode;
    use taskpad_core::TaskId;

    #[test]
    fn validation_and_not_found_map_to_invalid_params() {
        let err = map_service_error(TaskServiceError::EmptyTitle);
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = map_service_error(TaskServiceError::NotFound(TaskId(7)));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains('7'));
    }

    #[test]
    fn store_failures_map_to_internal_errors() {
        let err = map_service_error(TaskServiceError::Store(anyhow!("connection lost")));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
