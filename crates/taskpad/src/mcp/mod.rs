//! MCP server exposing the remote-procedure surface.

mod params;
mod tools;

pub use params::*;

use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, InitializeResult, ListToolsResult,
    ProtocolVersion, ServerCapabilities,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, tool, tool_router};

use taskpad_app::{AsyncTaskService, TaskService};
use taskpad_store_sqlite::SqliteStore;

/// MCP server for taskpad.
#[derive(Clone)]
pub struct TaskpadServer {
    tool_router: ToolRouter<Self>,
    service: AsyncTaskService<SqliteStore>,
}

#[tool_router]
impl TaskpadServer {
    /// Create a new MCP server instance over the given store.
    pub fn new(store: SqliteStore) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service: AsyncTaskService::new(TaskService::new(store)),
        }
    }

    /// List every task in the store.
    #[tool(description = "List every task in the store, in insertion order")]
    async fn list_tasks(&self) -> Result<CallToolResult, McpError> {
        tools::list_tasks::handle_list_tasks(self.service.clone()).await
    }

    /// Fetch the most recently created task.
    #[tool(description = "Fetch the most recently created task, or null when the store is empty")]
    async fn get_latest(&self) -> Result<CallToolResult, McpError> {
        tools::get_latest::handle_get_latest(self.service.clone()).await
    }

    /// Create a new task.
    #[tool(description = "Create a new task with the given title; completion starts false")]
    async fn create_task(
        &self,
        params: Parameters<CreateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        tools::create_task::handle_create_task(self.service.clone(), params).await
    }

    /// Update an existing task.
    #[tool(
        description = "Replace a task's title and completion flag together; both fields are required"
    )]
    async fn update_task(
        &self,
        params: Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        tools::update_task::handle_update_task(self.service.clone(), params).await
    }

    /// Delete a task.
    #[tool(description = "Delete a task permanently")]
    async fn delete_task(
        &self,
        params: Parameters<DeleteTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        tools::delete_task::handle_delete_task(self.service.clone(), params).await
    }
}

impl ServerHandler for TaskpadServer {
    fn get_info(&self) -> InitializeResult {
        let capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_tool_list_changed()
            .build();

        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities,
            server_info: Implementation {
                name: "taskpad".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: None,
        }
    }

    async fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_context = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_context).await
    }
}
