//! # Storage Layer
//!
//! Persistence for the task list and user configuration.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON document | `<data dir>/tasks.json` (or `--file`) |
//! | Config | TOML | `<config dir>/config.toml` |
//!
//! [`TaskStore`] serializes access on a sidecar lock file (`fs2`) and writes
//! atomically (unique temp file + rename).

mod json;
mod config;

pub use json::TaskStore;
pub use config::{Config, ConfigError, OutputFormat, DEFAULT_DATA_FILE};
