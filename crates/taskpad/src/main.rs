//! CLI entry point for taskpad.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rmcp::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use taskpad_app::{ProjectConfig, Reconciler, TaskService};
use taskpad_core::StatusFilter;
use taskpad_store_sqlite::SqliteStore;

mod commands;
mod mcp;
mod tui;

/// A minimal task list backed by a SQLite task table.
#[derive(Parser, Debug)]
#[command(
    name = "taskpad",
    version,
    about = "taskpad: a minimal task list backed by a SQLite task table"
)]
struct Cli {
    /// Project directory holding taskpad.toml and the database (defaults to current).
    #[arg(long)]
    dir: Option<String>,

    /// Database file override (takes precedence over taskpad.toml).
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
    },

    /// List tasks, optionally filtered by status.
    Ls {
        #[arg(long, value_enum, default_value = "all")]
        status: StatusArg,
        #[arg(long, value_enum, default_value = "table")]
        format: LsFormat,
    },

    /// Toggle a task's completion flag.
    Toggle {
        /// Task id as shown by `ls`.
        id: i64,
    },

    /// Replace a task's title.
    Edit {
        /// Task id as shown by `ls`.
        id: i64,
        #[arg(long)]
        title: String,
    },

    /// Delete a task permanently.
    Rm {
        /// Task id as shown by `ls`.
        id: i64,
    },

    /// Show the most recently created task.
    Latest,

    /// Launch interactive terminal UI.
    Tui,

    /// Start MCP server.
    Mcp,
}

/// Status filter accepted by `ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    All,
    Active,
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => Self::All,
            StatusArg::Active => Self::Active,
            StatusArg::Completed => Self::Completed,
        }
    }
}

/// Output format accepted by `ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { dir, db, cmd } = Cli::parse();

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    let dir = dir.unwrap_or_else(|| ".".to_owned());
    execute_command(Path::new(&dir), db, cmd)
}

fn execute_command(dir: &Path, db: Option<PathBuf>, command: Command) -> Result<()> {
    let config = ProjectConfig::load(dir)?;
    let db_path = db.unwrap_or_else(|| config.database_path(dir));
    let store = SqliteStore::open(&db_path)?;

    match command {
        Command::Tui => tui::run(store),

        Command::Mcp => {
            let server = mcp::TaskpadServer::new(store);
            tokio::runtime::Runtime::new()?
                .block_on(async move {
                    let transport = (tokio::io::stdin(), tokio::io::stdout());
                    let server = server
                        .serve(transport)
                        .await
                        .map_err(|e| anyhow::anyhow!("{e:?}"))?;
                    server.waiting().await.map_err(|e| anyhow::anyhow!("{e:?}"))
                })
                .map(|_| ())
        }

        other => {
            let mut reconciler = Reconciler::new(TaskService::new(store));
            commands::run(other, &mut reconciler)
        }
    }
}

const fn should_install_tracing(cmd: &Command) -> bool {
    // MCP speaks JSON-RPC over stdout; keep log output off that channel.
    !matches!(cmd, Command::Mcp)
}

fn install_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
