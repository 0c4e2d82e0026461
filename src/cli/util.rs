// ABOUTME: Shared CLI helpers - builds and refreshes the branch tree once for one-shot commands

use std::sync::Arc;

use crate::actions::{ActionSurface, InheritedShell, SystemClipboard};
use crate::config::AppConfig;
use crate::git::GitCli;
use crate::tree::BranchTree;

/// Builds the cache for the configured workspaces and runs one refresh.
pub async fn load_tree(config: &AppConfig) -> Arc<BranchTree<GitCli>> {
    let tree = Arc::new(BranchTree::new(
        GitCli::new(&config.git_binary),
        config.resolve_workspaces(),
        config.tree_options(),
    ));
    tree.refresh().await;
    tree
}

/// Actions wired to the caller's terminal.
pub fn terminal_actions(config: &AppConfig, run_unsubmitted: bool) -> ActionSurface {
    ActionSurface::new(
        Box::new(InheritedShell { run_unsubmitted }),
        Box::new(SystemClipboard::new()),
        &config.git_binary,
    )
}
