// ABOUTME: User actions on tree nodes - prune, delete remote branch, copy names and addresses
//
// Mutating git commands are never run by the core; they are typed into a
// user-visible shell so their outcome is seen (and confirmed) there.

pub mod clipboard;
pub mod shell;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::tree::{Node, NodeKind, Tree};

pub use clipboard::SystemClipboard;
pub use shell::{InheritedShell, TmuxShell};

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("No interactive shell available: {0}")]
    ShellUnavailable(String),
    #[error("Shell command failed: {0}")]
    Shell(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("'{0}' is not a branch")]
    NotABranch(String),
    #[error("No remote found for '{0}'")]
    NoRemote(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A shell opened for the user, identified by whatever the runner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellTarget {
    pub id: String,
    /// Human readable location, shown in confirmations
    pub title: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait ShellRunner {
    fn open(&self, title: &str, cwd: &Path) -> Result<ShellTarget, ActionError>;

    /// Types `text` into the shell; presses Enter only when `submit` is set.
    fn send(&self, target: &ShellTarget, text: &str, submit: bool) -> Result<(), ActionError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ClipboardWriter {
    fn set_text(&mut self, text: &str) -> Result<(), ActionError>;
}

pub fn prune_command(git: &str, remote: &str) -> String {
    format!("{git} remote update --prune {}", shell_escape::escape(Cow::from(remote)))
}

pub fn delete_command(git: &str, remote: &str, branch: &str) -> String {
    format!(
        "{git} push {} --delete {}",
        shell_escape::escape(Cow::from(remote)),
        shell_escape::escape(Cow::from(branch))
    )
}

pub struct ActionSurface {
    shell: Box<dyn ShellRunner>,
    clipboard: Box<dyn ClipboardWriter>,
    git_binary: String,
}

impl ActionSurface {
    pub fn new(
        shell: Box<dyn ShellRunner>,
        clipboard: Box<dyn ClipboardWriter>,
        git_binary: &Path,
    ) -> Self {
        Self {
            shell,
            clipboard,
            git_binary: git_binary.display().to_string(),
        }
    }

    /// Opens one shell per workspace and submits a prune for every remote.
    pub fn prune(&self, tree: &Tree, workspaces: &[PathBuf]) -> Result<String, ActionError> {
        let mut remotes: Vec<&str> = Vec::new();
        for remote in tree.remotes() {
            if !remotes.contains(&remote.name.as_str()) {
                remotes.push(remote.name.as_str());
            }
        }
        if remotes.is_empty() {
            return Ok("No remotes to prune".to_string());
        }

        for workspace in workspaces {
            let target = self.shell.open("Prune remote branches", workspace)?;
            for remote in &remotes {
                self.shell
                    .send(&target, &prune_command(&self.git_binary, remote), true)?;
            }
            info!("Submitted prune of {:?} in {}", remotes, target.title);
        }

        Ok(format!(
            "Pruning {} remote(s) in {} workspace(s)",
            remotes.len(),
            workspaces.len()
        ))
    }

    /// Types the delete command for a branch without submitting it.
    pub fn delete(&self, node: &Node) -> Result<String, ActionError> {
        let info = node
            .branch_info()
            .ok_or_else(|| ActionError::NotABranch(node.label.clone()))?;

        let title = format!("Delete remote branch {}/{}", info.remote, info.label);
        let target = self.shell.open(&title, &info.workspace)?;
        self.shell.send(
            &target,
            &delete_command(&self.git_binary, &info.remote, &info.label),
            false,
        )?;

        info!("Prepared delete of {} in {}", info.name, target.title);
        Ok(format!("Confirm the delete of {} in {}", info.name, target.title))
    }

    pub fn copy_branch_name(&mut self, node: &Node) -> Result<String, ActionError> {
        let name = match &node.kind {
            NodeKind::Branch(info) | NodeKind::MergedBranch(info) => info.label.clone(),
            NodeKind::MergedInto { .. } => node.label.clone(),
            _ => return Err(ActionError::NotABranch(node.label.clone())),
        };

        self.clipboard.set_text(&name)?;
        Ok(format!("Copied branch name: {name}"))
    }

    /// Copies the address of the remote `node` belongs to (or is).
    pub fn copy_remote_address(&mut self, tree: &Tree, node: &Node) -> Result<String, ActionError> {
        let remote = tree
            .owning_remote(node)
            .ok_or_else(|| ActionError::NoRemote(node.label.clone()))?;

        self.clipboard.set_text(&remote.address)?;
        Ok(format!("Copied address of {}: {}", remote.name, remote.address))
    }
}
