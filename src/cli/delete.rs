// ABOUTME: CLI delete command - deletes one branch on its remote, confirming first unless --yes
//
// Without --yes the push command is only printed; the user runs it to confirm.

use anyhow::{anyhow, Result};

use super::{util, DeleteArgs};
use crate::config::AppConfig;
use crate::tree::{SortMode, Tree};

/// Execute the delete command
pub async fn execute(args: DeleteArgs, config: &AppConfig) -> Result<()> {
    let tree = util::load_tree(config).await;
    let snapshot = tree.snapshot(SortMode::Name);
    let node = snapshot
        .find_branch(&args.branch)
        .ok_or_else(|| no_such_branch(&args.branch, &snapshot))?;

    let actions = util::terminal_actions(config, args.yes);
    let message = actions.delete(node)?;
    if args.yes {
        println!("Deleted {}", args.branch);
    } else {
        println!("{message}");
    }

    Ok(())
}

fn no_such_branch(name: &str, tree: &Tree) -> anyhow::Error {
    if let Some(placeholder) = tree.placeholder_kind() {
        return anyhow!("No remote branch named '{name}': {}", placeholder.message());
    }

    let similar: Vec<&str> = tree
        .roots()
        .iter()
        .flat_map(|remote| remote.children.iter())
        .filter_map(|node| node.branch_info())
        .filter(|info| info.label.contains(name) || name.contains(&info.label))
        .map(|info| info.name.as_str())
        .collect();

    if similar.is_empty() {
        anyhow!("No remote branch named '{name}'. Use the <remote>/<branch> form.")
    } else {
        anyhow!(
            "No remote branch named '{name}'. Did you mean:\n  {}",
            similar.join("\n  ")
        )
    }
}
