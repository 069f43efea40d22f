//! Update task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;

use taskpad_app::AsyncTaskService;
use taskpad_core::TaskId;
use taskpad_store_sqlite::SqliteStore;

use crate::mcp::params::UpdateTaskParams;

use super::common::{json_result, map_service_error};

/// Replace a task's mutable field group and return the updated record.
pub async fn handle_update_task(
    service: AsyncTaskService<SqliteStore>,
    Parameters(params): Parameters<UpdateTaskParams>,
) -> Result<CallToolResult, McpError> {
    let UpdateTaskParams {
        id,
        title,
        completed,
    } = params;
    let task = service
        .update(TaskId(id), title, completed)
        .await
        .map_err(map_service_error)?;
    json_result(&task)
}
