// ABOUTME: CLI prune command - runs `git remote update --prune` for every discovered remote

use anyhow::Result;

use super::util;
use crate::config::AppConfig;
use crate::tree::SortMode;

/// Execute the prune command
pub async fn execute(config: &AppConfig) -> Result<()> {
    let tree = util::load_tree(config).await;
    let actions = util::terminal_actions(config, false);

    let message = actions.prune(&tree.snapshot(SortMode::Name), tree.workspaces())?;
    println!("{message}");

    Ok(())
}
