//! List tasks tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;

use taskpad_app::AsyncTaskService;
use taskpad_store_sqlite::SqliteStore;

use super::common::{json_result, map_service_error};

/// Return every task in the store as a JSON array.
pub async fn handle_list_tasks(
    service: AsyncTaskService<SqliteStore>,
) -> Result<CallToolResult, McpError> {
    let tasks = service.list_all().await.map_err(map_service_error)?;
    json_result(&tasks)
}
