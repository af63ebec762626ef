//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add <text>` | Add a task |
//! | `list [completed\|pending]` | List all tasks or filter by status |
//! | `show <id>` | Task details |
//! | `complete <id>` / `uncomplete <id>` | Toggle completion |
//! | `delete <id>` | Remove a task |
//! | `priority <id> <level>` / `tag <id> <tag>` | Edit a task |
//! | `stats` | Task counts |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! Use `--verbose` (or `-v`) for debug output on stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;

pub use app::{Cli, Commands, run};
pub use output::Output;
pub use crate::storage::OutputFormat;
pub use task::StatusFilter;
