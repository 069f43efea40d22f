//! Create task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;

use taskpad_app::AsyncTaskService;
use taskpad_store_sqlite::SqliteStore;

use crate::mcp::params::CreateTaskParams;

use super::common::{json_result, map_service_error};

/// Create a new task and return the full created record.
pub async fn handle_create_task(
    service: AsyncTaskService<SqliteStore>,
    Parameters(params): Parameters<CreateTaskParams>,
) -> Result<CallToolResult, McpError> {
    let CreateTaskParams { title } = params;
    let task = service.create(title).await.map_err(map_service_error)?;
    json_result(&task)
}
