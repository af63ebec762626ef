//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::Output;
use super::task::{self, StatusFilter};
use crate::storage::{Config, OutputFormat, TaskStore};

#[derive(Parser)]
#[command(name = "todo")]
#[command(author, version, about = "A small task list for the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to use instead of the configured one
    #[arg(long, global = true, env = "TODO_FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file to read instead of the default
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    ///
    /// Examples:
    ///   todo add Buy milk
    ///   todo add "Write the quarterly report"
    Add {
        /// Task description (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// List tasks, optionally only completed or pending ones
    List {
        /// Which tasks to show
        status: Option<StatusFilter>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: u64,
    },

    /// Mark a task as completed
    Complete {
        /// Task ID
        id: u64,
    },

    /// Mark a completed task as pending again
    Uncomplete {
        /// Task ID
        id: u64,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
    },

    /// Set task priority (low, medium, high)
    Priority {
        /// Task ID
        id: u64,

        /// New priority
        level: String,
    },

    /// Add a tag to a task
    Tag {
        /// Task ID
        id: u64,

        /// Tag to add
        tag: String,
    },

    /// Show task counts
    Stats,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let output = Output::new(cli.format.unwrap_or(config.default_format), cli.verbose);
    output.verbose("todo starting");

    let store = TaskStore::new(config.resolve_data_file(cli.file.as_deref()));
    output.verbose_ctx("store", &format!("Using task file: {}", store.path().display()));

    match cli.command {
        Commands::Add { description } => task::add(&output, &store, &description.join(" "))?,
        Commands::List { status } => task::list(&output, &store, status)?,
        Commands::Show { id } => task::show(&output, &store, id)?,
        Commands::Complete { id } => task::complete(&output, &store, id)?,
        Commands::Uncomplete { id } => task::uncomplete(&output, &store, id)?,
        Commands::Delete { id } => task::delete(&output, &store, id)?,
        Commands::Priority { id, level } => task::set_priority(&output, &store, id, &level)?,
        Commands::Tag { id, tag } => task::add_tag(&output, &store, id, &tag)?,
        Commands::Stats => task::stats(&output, &store)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
