// ABOUTME: Configuration management for merged-branches
// Layered TOML files (system, user, project) merged into one AppConfig

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tree::SortMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Git executable to run queries with
    #[serde(default = "default_git_binary")]
    pub git_binary: PathBuf,

    /// Workspaces to scan; the current directory when empty
    #[serde(default)]
    pub workspaces: Vec<PathBuf>,

    /// Expand remotes and merged branches by default
    #[serde(default)]
    pub merge_results_expanded: bool,

    /// Start with the by-date view instead of by-name
    #[serde(default)]
    pub sort_by_date: bool,

    /// UI preferences
    #[serde(default)]
    pub ui: UiPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Show date and committer next to each branch
    #[serde(default = "default_true")]
    pub show_details: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_details: default_true(),
        }
    }
}

/// Build-time options threaded into every tree build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOptions {
    pub merge_results_expanded: bool,
}

fn default_git_binary() -> PathBuf {
    PathBuf::from("git")
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in Self::get_config_paths() {
            if path.exists() {
                config.merge(Self::load_file(&path)?);
            }
        }

        Ok(config)
    }

    /// Load a single configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Configuration file paths, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/merged-branches/config.toml")];

        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".merged-branches").join("config.toml"));
        }

        paths
    }

    fn get_user_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".merged-branches"))
    }

    /// Merge a later (higher precedence) config into this one
    pub fn merge(&mut self, other: Self) {
        if other.git_binary != default_git_binary() {
            self.git_binary = other.git_binary;
        }
        if !other.workspaces.is_empty() {
            self.workspaces = other.workspaces;
        }
        // Files can only move flags away from their defaults
        self.merge_results_expanded |= other.merge_results_expanded;
        self.sort_by_date |= other.sort_by_date;
        self.ui.show_details &= other.ui.show_details;
    }

    /// Configured workspaces, falling back to the current directory
    pub fn resolve_workspaces(&self) -> Vec<PathBuf> {
        if !self.workspaces.is_empty() {
            return self.workspaces.clone();
        }
        std::env::current_dir().map(|cwd| vec![cwd]).unwrap_or_default()
    }

    pub const fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            merge_results_expanded: self.merge_results_expanded,
        }
    }

    pub const fn initial_sort_mode(&self) -> SortMode {
        if self.sort_by_date {
            SortMode::Date
        } else {
            SortMode::Name
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            workspaces: Vec::new(),
            merge_results_expanded: false,
            sort_by_date: false,
            ui: UiPreferences::default(),
        }
    }
}
