// ABOUTME: Remote resolution - lists the remotes of one workspace together with their addresses

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::executor::{first_line, CommandExecutor, GitError};

/// A named remote and its address. The address is opaque and doubles as the
/// deduplication key across workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub address: String,
}

impl Remote {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Prefix every branch owned by this remote starts with.
    pub fn branch_prefix(&self) -> String {
        format!("{}/", self.name)
    }
}

/// Runs `git remote`, then `git remote get-url <name>` for each name.
///
/// Any failure aborts the whole workspace; the caller decides how to degrade.
pub async fn list_remotes<E: CommandExecutor>(
    executor: &E,
    workspace: &Path,
) -> Result<Vec<Remote>, GitError> {
    let names = executor.run(&["remote"], Some(workspace)).await?;
    let mut remotes = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim().to_string();
        let address = first_line(
            executor
                .run(&["remote", "get-url", name.as_str()], Some(workspace))
                .await?,
            &format!("git remote get-url {name}"),
        )?;
        debug!("Found remote {} -> {} in {}", name, address, workspace.display());
        remotes.push(Remote { name, address });
    }

    Ok(remotes)
}
