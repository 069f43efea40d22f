//! Get latest task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;

use taskpad_app::AsyncTaskService;
use taskpad_store_sqlite::SqliteStore;

use super::common::{json_result, map_service_error};

/// Return the most recently created task, or JSON `null` when none exists.
pub async fn handle_get_latest(
    service: AsyncTaskService<SqliteStore>,
) -> Result<CallToolResult, McpError> {
    let latest = service.get_latest().await.map_err(map_service_error)?;
    json_result(&latest)
}
