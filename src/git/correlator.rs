// ABOUTME: Branch correlation - resolves each remote branch's owner, commit metadata and merge targets
//
// Produces a WorkingTree for one refresh cycle. Nodes are built from it later by
// the tree cache, so nothing here knows about ids, sorting or expansion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::executor::{first_line, strip_marker, CommandExecutor, GitError};
use super::remotes::{list_remotes, Remote};

/// Namespace `git branch -a` puts remote-tracking branches under.
pub const REMOTES_NAMESPACE: &str = "remotes/";

/// Everything known about one remote branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Fully qualified name, e.g. `origin/feature/login`
    pub name: String,
    /// Name with the owning remote's prefix removed, e.g. `feature/login`
    pub label: String,
    /// Owning remote's name
    pub remote: String,
    pub hash: String,
    /// Commit date as `YYYY-MM-DD HH:MM:SS`, timezone dropped
    pub date: String,
    pub committer: String,
    /// Workspace the branch was discovered in
    pub workspace: PathBuf,
}

impl BranchInfo {
    /// Display detail; sorts chronologically under plain string ordering.
    pub fn detail(&self) -> String {
        format!("{} {}", self.date, self.committer)
    }
}

/// A remote branch that already contains another branch's commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeTarget {
    /// Fully qualified name, e.g. `upstream/main`
    pub name: String,
    /// Name relative to the remote that owns it
    pub label: String,
}

impl MergeTarget {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    pub info: BranchInfo,
    pub merged_into: Vec<MergeTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub remote: Remote,
    pub workspace: PathBuf,
    pub branches: Vec<BranchEntry>,
}

/// Accumulates discoveries across all workspaces of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTree {
    pub remotes: Vec<RemoteEntry>,
}

impl WorkingTree {
    pub fn knows_address(&self, address: &str) -> bool {
        self.remotes.iter().any(|entry| entry.remote.address == address)
    }

    pub fn branch_count(&self) -> usize {
        self.remotes.iter().map(|entry| entry.branches.len()).sum()
    }

    /// True when no branch was found anywhere, even if remotes were.
    pub fn is_empty(&self) -> bool {
        self.branch_count() == 0
    }

    fn entry_for_address(&mut self, address: &str) -> Option<&mut RemoteEntry> {
        self.remotes
            .iter_mut()
            .find(|entry| entry.remote.address == address)
    }
}

/// Picks the remote owning `branch`: the longest remote name that, followed by
/// `/`, prefixes the branch name.
///
/// Two distinct matching names can never have equal length, so a tie only
/// happens for duplicate names; the first one listed wins.
pub fn owner_of<'a>(remotes: &'a [Remote], branch: &str) -> Option<&'a Remote> {
    let mut owner: Option<&Remote> = None;
    for remote in remotes {
        let matches = branch
            .strip_prefix(remote.name.as_str())
            .is_some_and(|rest| rest.starts_with('/'));
        if matches && owner.map_or(true, |best| remote.name.len() > best.name.len()) {
            owner = Some(remote);
        }
    }
    owner
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMetadata {
    pub date: String,
    pub committer: String,
}

/// Parses a `%ci %ce` line (`2024-03-01 12:30:00 +0100 dev@example.com`),
/// keeping date, time and committer and dropping the timezone offset.
pub fn parse_commit_metadata(line: &str) -> Option<CommitMetadata> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [date, time, _offset, committer] => Some(CommitMetadata {
            date: format!("{date} {time}"),
            committer: (*committer).to_string(),
        }),
        // Commits made without an email leave the last field empty
        [date, time, _offset] => Some(CommitMetadata {
            date: format!("{date} {time}"),
            committer: String::new(),
        }),
        _ => None,
    }
}

/// Filters `git branch -a --contains` output down to remote branches other than `branch`.
pub fn merged_into_targets(lines: &[String], branch: &str) -> Vec<String> {
    lines
        .iter()
        .map(|line| strip_marker(line))
        .filter_map(|entry| entry.strip_prefix(REMOTES_NAMESPACE))
        .filter(|target| *target != branch)
        .map(ToString::to_string)
        .collect()
}

/// Label for a merge target, relative to the remote that owns it.
///
/// When the target's own remote is unknown (e.g. it was deduplicated away),
/// falls back to stripping as many characters as the source branch's remote
/// prefix has.
pub fn target_label(target: &str, source_owner: &Remote, remotes: &[Remote]) -> String {
    if let Some(owner) = owner_of(remotes, target) {
        return target[owner.name.len() + 1..].to_string();
    }
    target
        .get(source_owner.name.len() + 1..)
        .unwrap_or_default()
        .to_string()
}

/// Discovers remotes and branches of one workspace into `working`.
///
/// Remotes whose address is already in `working` are skipped, and so are the
/// branches they own. Returns the number of branches added. An error means
/// the workspace contributed nothing; per-branch failures are logged and the
/// branch is left out.
pub async fn correlate_workspace<E: CommandExecutor>(
    executor: &E,
    workspace: &Path,
    working: &mut WorkingTree,
) -> Result<usize, GitError> {
    let all_remotes = list_remotes(executor, workspace).await?;
    let new_remotes: Vec<Remote> = all_remotes
        .iter()
        .filter(|remote| {
            let known = working.knows_address(&remote.address);
            if known {
                debug!(
                    "Remote {} ({}) already listed, skipping it for {}",
                    remote.name,
                    remote.address,
                    workspace.display()
                );
            }
            !known
        })
        .cloned()
        .collect();

    let branches: Vec<String> = executor
        .run(&["branch", "-r"], Some(workspace))
        .await?
        .iter()
        .map(|line| strip_marker(line).to_string())
        .collect();

    for remote in &new_remotes {
        working.remotes.push(RemoteEntry {
            remote: remote.clone(),
            workspace: workspace.to_path_buf(),
            branches: Vec::new(),
        });
    }

    let mut added = 0;
    for branch in &branches {
        let Some(owner) = owner_of(&new_remotes, branch) else {
            debug!("No remote owns branch {}, skipping", branch);
            continue;
        };

        match correlate_branch(executor, workspace, owner, &all_remotes, branch).await {
            Ok(entry) => {
                if let Some(remote_entry) = working.entry_for_address(&owner.address) {
                    remote_entry.branches.push(entry);
                    added += 1;
                }
            }
            Err(e) => warn!("Skipping branch {} in {}: {}", branch, workspace.display(), e),
        }
    }

    info!(
        "Correlated {} branches across {} new remotes in {}",
        added,
        new_remotes.len(),
        workspace.display()
    );
    Ok(added)
}

async fn correlate_branch<E: CommandExecutor>(
    executor: &E,
    workspace: &Path,
    owner: &Remote,
    remotes: &[Remote],
    branch: &str,
) -> Result<BranchEntry, GitError> {
    let hash = first_line(
        executor.run(&["rev-parse", branch], Some(workspace)).await?,
        &format!("git rev-parse {branch}"),
    )?;

    let show_command = format!("git show -s --format=\"%ci %ce\" {hash}");
    let metadata_line = first_line(
        executor
            .run(&["show", "-s", "--format=%ci %ce", hash.as_str()], Some(workspace))
            .await?,
        &show_command,
    )?;
    let metadata =
        parse_commit_metadata(&metadata_line).ok_or_else(|| GitError::MalformedOutput {
            command: show_command,
            line: metadata_line.clone(),
        })?;

    let containing = executor
        .run(&["branch", "-a", "--contains", hash.as_str()], Some(workspace))
        .await?;
    let merged_into = merged_into_targets(&containing, branch)
        .iter()
        .into_iter()
        .map(|target| {
            let label = target_label(&target, owner, remotes);
            MergeTarget::new(target, label)
        })
        .collect();

    Ok(BranchEntry {
        info: BranchInfo {
            name: branch.to_string(),
            label: branch
                .strip_prefix(owner.branch_prefix().as_str())
                .unwrap_or(branch)
                .to_string(),
            remote: owner.name.clone(),
            hash,
            date: metadata.date,
            committer: metadata.committer,
            workspace: workspace.to_path_buf(),
        },
        merged_into,
    })
}
