//! Application layer logic for taskpad.
//!
//! This crate provides the validated task service, the client-side snapshot
//! reconciler, configuration, and the async adapter shared across CLI, TUI,
//! and MCP interfaces.

pub mod async_service;
pub mod config;
pub mod reconciler;
pub mod service;
pub mod snapshot;

// Re-exports for convenience
pub use async_service::AsyncTaskService;
pub use config::ProjectConfig;
pub use reconciler::Reconciler;
pub use service::{TaskService, TaskServiceError, TaskStore};
pub use snapshot::Snapshot;
