//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - task / folder: create, list, edit and delete records
//! - today / upcoming / day / progress / stats: derived views
//! - export / share: CSV, JSON backup and plain-text output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tasklet - a personal task and folder tracker
#[derive(Parser, Debug)]
#[command(name = "tasklet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute (default: today and upcoming)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the default folders if missing
    Init,

    /// Task operations
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Folder operations
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },

    /// Pending tasks due today
    Today,

    /// Pending tasks due later, soonest first
    Upcoming,

    /// All tasks due on a date (YYYY-MM-DD)
    Day {
        date: String,
    },

    /// Completion progress for this week and a month
    Progress {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Task and folder totals
    Stats,

    /// Export tasks to a file (folder/completed filters apply to CSV only;
    /// JSON is a full backup)
    Export {
        /// csv or json
        format: String,

        /// Only tasks in this folder (id or name)
        #[arg(short, long)]
        folder: Option<String>,

        /// Leave completed tasks out
        #[arg(long)]
        exclude_completed: bool,

        /// Output file (default: tasklet-export-<date>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a shareable task list
    Share {
        /// Only tasks in this folder (id or name)
        #[arg(short, long)]
        folder: Option<String>,

        /// Leave completed tasks out
        #[arg(long)]
        exclude_completed: bool,
    },

    /// Delete all tasks and folders
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommands {
    /// Add a task
    Add {
        title: String,

        /// Due date: YYYY-MM-DD, YYYY-MM-DDTHH:MM (local) or RFC 3339
        #[arg(long)]
        due: String,

        #[arg(long, default_value = "")]
        description: String,

        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Folder id or name
        #[arg(short, long)]
        folder: Option<String>,

        /// Reminder time, same formats as --due
        #[arg(short, long)]
        reminder: Option<String>,
    },

    /// List tasks
    List {
        /// Folder id or name
        #[arg(short, long)]
        folder: Option<String>,

        /// pending or completed
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one task
    Show {
        /// Task id or unique id prefix
        id: String,
    },

    /// Change fields of a task
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        /// Move to folder (id or name)
        #[arg(short, long, conflicts_with = "unfile")]
        folder: Option<String>,

        /// Remove from its folder
        #[arg(long)]
        unfile: bool,

        #[arg(short, long, conflicts_with = "clear_reminder")]
        reminder: Option<String>,

        #[arg(long)]
        clear_reminder: bool,
    },

    /// Mark a task completed
    Complete {
        id: String,
    },

    /// Mark a task pending again
    Reopen {
        id: String,
    },

    /// Delete a task
    Delete {
        id: String,
    },
}

/// Folder subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommands {
    /// Add a folder
    Add {
        name: String,
    },

    /// List folders with pending counts
    List,

    /// Show a folder's tasks
    Show {
        /// Folder id or name
        folder: String,
    },

    /// Delete a folder; its tasks become unfiled
    Delete {
        /// Folder id or name
        folder: String,
    },
}
