// ABOUTME: Behavioral tests against real temporary repositories using the installed git binary

use anyhow::Result;

use merged_branches::config::TreeOptions;
use merged_branches::git::{list_remotes, CommandExecutor, GitCli, GitError};
use merged_branches::tree::{BranchTree, NodeKind, Placeholder, SortMode};

use super::fixtures::TestRemotes;
use crate::require_git;

#[tokio::test]
async fn test_remotes_resolve_to_their_addresses() -> Result<()> {
    require_git!();
    let repo = TestRemotes::new()?;

    let remotes = list_remotes(&GitCli::default(), &repo.clone).await?;
    let names: Vec<&str> = remotes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["origin", "upstream"]);
    assert_eq!(remotes[0].address, repo.origin.display().to_string());
    assert_eq!(remotes[1].address, repo.upstream.display().to_string());
    Ok(())
}

#[tokio::test]
async fn test_real_repository_tree() -> Result<()> {
    require_git!();
    let repo = TestRemotes::new()?;
    assert!(repo.remote_branches()?.contains(&"origin/wip".to_string()));

    let tree = BranchTree::new(GitCli::default(), vec![repo.clone.clone()], TreeOptions::default());
    tree.refresh().await;
    let snapshot = tree.snapshot(SortMode::Name);
    assert_eq!(snapshot.placeholder_kind(), None);

    let origin: Vec<&str> = snapshot.roots()[0]
        .children
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(origin, vec!["feature", "main", "wip"]);

    // wip is ahead of everything else, so nothing contains its commit
    let wip = snapshot.find_branch("origin/wip").unwrap();
    assert!(matches!(wip.kind, NodeKind::Branch(_)));

    let feature = snapshot.find_branch("origin/feature").unwrap();
    assert!(matches!(feature.kind, NodeKind::MergedBranch(_)));
    let targets: Vec<&str> = feature.children.iter().map(|c| c.label.as_str()).collect();
    assert!(targets.contains(&"main"));
    assert!(targets.contains(&"wip"));
    assert!(!targets.contains(&"feature"));

    let info = feature.branch_info().unwrap();
    assert_eq!(info.committer, "test@test.com");
    assert_eq!(info.date.len(), "2024-01-01 00:00:00".len());
    Ok(())
}

#[tokio::test]
async fn test_missing_binary_yields_tool_missing() -> Result<()> {
    let tree = BranchTree::new(
        GitCli::new("/nonexistent/bin/git"),
        vec![std::env::current_dir()?],
        TreeOptions::default(),
    );
    tree.refresh().await;
    assert_eq!(
        tree.snapshot(SortMode::Name).placeholder_kind(),
        Some(Placeholder::ToolMissing)
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_query_reports_exit_status() -> Result<()> {
    require_git!();
    let dir = tempfile::TempDir::new()?;

    let err = GitCli::default()
        .run(&["rev-parse", "origin/nothing"], Some(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, GitError::NonZeroExit { .. }));
    Ok(())
}
