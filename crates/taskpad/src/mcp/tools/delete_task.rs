//! Delete task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;

use taskpad_app::AsyncTaskService;
use taskpad_core::TaskId;
use taskpad_store_sqlite::SqliteStore;

use crate::mcp::params::DeleteTaskParams;

use super::common::{json_result, map_service_error};

/// Delete a task permanently; not-found is reported, never silently ignored.
pub async fn handle_delete_task(
    service: AsyncTaskService<SqliteStore>,
    Parameters(params): Parameters<DeleteTaskParams>,
) -> Result<CallToolResult, McpError> {
    let DeleteTaskParams { id } = params;
    service
        .delete(TaskId(id))
        .await
        .map_err(map_service_error)?;
    json_result(&json!({ "deleted": id }))
}
