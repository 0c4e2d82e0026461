// ABOUTME: CLI argument parsing and command routing for mgb
//
// Provides command-line interface for:
// - Browsing the branch tree interactively (tui, default)
// - Printing which branches are merged into which (list)
// - Pruning stale remote-tracking branches (prune)
// - Deleting a remote branch (delete)

pub mod delete;
pub mod list;
pub mod prune;
pub mod util;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::AppConfig;

/// Shows which remote git branches are already merged into which
#[derive(Parser)]
#[command(name = "mgb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Repository to scan (repeatable); replaces configured workspaces
    #[arg(long = "workspace", short = 'w', global = true)]
    pub workspaces: Vec<PathBuf>,

    /// Expand remotes and merged branches by default
    #[arg(long, global = true)]
    pub expand: bool,

    /// Sort branches by commit date, newest first
    #[arg(long, global = true)]
    pub by_date: bool,

    /// Git executable to use
    #[arg(long, global = true)]
    pub git: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over every config file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if !self.workspaces.is_empty() {
            config.workspaces.clone_from(&self.workspaces);
        }
        if self.expand {
            config.merge_results_expanded = true;
        }
        if self.by_date {
            config.sort_by_date = true;
        }
        if let Some(git) = &self.git {
            config.git_binary.clone_from(git);
        }
    }
}

/// Output format for commands
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui,

    /// Print remotes, branches and what each branch is merged into
    List(ListArgs),

    /// Run `git remote update --prune` for every known remote
    Prune,

    /// Delete a branch on its remote
    Delete(DeleteArgs),
}

/// Arguments for the list command
#[derive(clap::Args)]
pub struct ListArgs {
    /// Show only branches already merged somewhere
    #[arg(long)]
    pub merged_only: bool,
}

/// Arguments for the delete command
#[derive(clap::Args)]
pub struct DeleteArgs {
    /// Fully qualified remote branch, e.g. origin/feature/login
    pub branch: String,

    /// Run the push without asking for confirmation
    #[arg(long, short)]
    pub yes: bool,
}
