// ABOUTME: Behavioral tests for the refresh cycle - correlation, placeholders, degradation and staleness

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use merged_branches::config::TreeOptions;
use merged_branches::tree::{BranchTree, NodeKind, Placeholder, SortMode, TreeEvent};

use super::fixtures::{two_remote_script, workspace, ScriptedGit};

fn tree_for(git: ScriptedGit, workspaces: Vec<PathBuf>) -> Arc<BranchTree<ScriptedGit>> {
    Arc::new(BranchTree::new(git, workspaces, TreeOptions::default()))
}

#[tokio::test]
async fn test_cross_remote_merge_is_detected() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    let labels: Vec<&str> = snapshot.roots().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["origin", "upstream"]);
    assert_eq!(snapshot.roots()[0].children.len(), 3);
    assert_eq!(snapshot.roots()[1].children.len(), 1);

    let feat = snapshot.find_branch("origin/feat").expect("origin/feat listed");
    assert!(matches!(feat.kind, NodeKind::MergedBranch(_)));
    let targets: Vec<&str> = feat.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(targets, vec!["main"]);
    assert!(matches!(
        &feat.children[0].kind,
        NodeKind::MergedInto { target } if target == "upstream/main"
    ));

    let main = snapshot.find_branch("origin/main").unwrap();
    assert!(matches!(main.kind, NodeKind::Branch(_)));
    assert!(main.children.is_empty());
    assert_eq!(main.detail.as_deref(), Some("2024-05-01 08:00:00 lead@example.com"));
}

#[tokio::test]
async fn test_symbolic_refs_never_become_branches() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    assert!(snapshot.find_branch("origin/HEAD").is_none());
    assert_eq!(snapshot.find_branch("origin/feat").unwrap().label, "feat");
}

#[tokio::test]
async fn test_branch_never_lists_itself() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    tree.refresh().await;

    for remote in tree.snapshot(SortMode::Name).roots() {
        for branch in &remote.children {
            let info = branch.branch_info().unwrap();
            for target in &branch.children {
                if let NodeKind::MergedInto { target } = &target.kind {
                    assert_ne!(target, &info.name);
                }
            }
        }
    }
}

#[tokio::test]
async fn test_both_views_are_sorted() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    tree.refresh().await;

    let by_name = tree.snapshot(SortMode::Name);
    for remote in by_name.roots() {
        let labels: Vec<&String> = remote.children.iter().map(|c| &c.label).collect();
        assert!(labels.windows(2).all(|w| w[0] <= w[1]), "{labels:?}");
    }

    let by_date = tree.snapshot(SortMode::Date);
    for remote in by_date.roots() {
        let details: Vec<&Option<String>> = remote.children.iter().map(|c| &c.detail).collect();
        assert!(details.windows(2).all(|w| w[0] >= w[1]), "{details:?}");
    }
    let origin: Vec<&str> = by_date.roots()[0]
        .children
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(origin, vec!["main", "release", "feat"]);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    tree.refresh().await;
    let first = tree.snapshot(SortMode::Name);
    tree.refresh().await;
    let second = tree.snapshot(SortMode::Name);

    assert_eq!(first.outline(), second.outline());
    assert_ne!(first.roots()[0].id, second.roots()[0].id);
}

#[tokio::test]
async fn test_no_workspaces_means_tool_missing() {
    let git = two_remote_script();
    let tree = tree_for(git, vec![]);
    tree.refresh().await;

    for mode in [SortMode::Name, SortMode::Date] {
        let snapshot = tree.snapshot(mode);
        assert_eq!(snapshot.placeholder_kind(), Some(Placeholder::ToolMissing));
        assert_eq!(snapshot.roots().len(), 1);
        assert!(snapshot.roots()[0].children.is_empty());
    }
}

#[tokio::test]
async fn test_failed_probe_means_tool_missing() {
    let git = ScriptedGit::new().fail("--version", "git: command not found");
    let tree = tree_for(git, vec![workspace()]);
    tree.refresh().await;

    assert_eq!(
        tree.snapshot(SortMode::Name).placeholder_kind(),
        Some(Placeholder::ToolMissing)
    );
}

#[tokio::test]
async fn test_remotes_without_branches_mean_empty_result() {
    let git = ScriptedGit::new()
        .reply("--version", "git version 2.43.0\n")
        .reply("remote", "origin\n")
        .reply("remote get-url origin", "git@example.com:team/repo.git\n")
        .reply("branch -r", "");
    let tree = tree_for(git, vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Date);
    assert_eq!(snapshot.placeholder_kind(), Some(Placeholder::NoBranchesFound));
    assert_eq!(snapshot.roots()[0].label, "No branches were found");
}

#[tokio::test]
async fn test_failing_branch_is_omitted() {
    let git = two_remote_script().fail("rev-parse origin/release", "fatal: bad revision");
    let tree = tree_for(git, vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    let labels: Vec<&str> = snapshot.roots()[0]
        .children
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["feat", "main"]);
    assert_eq!(snapshot.roots()[1].children.len(), 1);
}

#[tokio::test]
async fn test_malformed_metadata_omits_branch() {
    let git = two_remote_script().reply_first("show -s --format=%ci %ce m1", "yesterday\n");
    let tree = tree_for(git, vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    assert!(snapshot.find_branch("origin/main").is_none());
    assert!(snapshot.find_branch("origin/feat").is_some());
}

#[tokio::test]
async fn test_commit_without_committer_email_is_kept() {
    let git = two_remote_script()
        .reply_first("show -s --format=%ci %ce r1", "2024-04-01 10:00:00 +0000 \n");
    let tree = tree_for(git, vec![workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    let release = snapshot.find_branch("origin/release").expect("origin/release listed");
    let info = release.branch_info().unwrap();
    assert_eq!(info.date, "2024-04-01 10:00:00");
    assert_eq!(info.committer, "");
}

#[tokio::test]
async fn test_failing_workspace_does_not_block_others() {
    let broken = PathBuf::from("/work/broken");
    let git = two_remote_script().fail("/work/broken|remote", "fatal: not a git repository");
    let tree = tree_for(git, vec![broken, workspace()]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    assert_eq!(snapshot.placeholder_kind(), None);
    assert_eq!(snapshot.remotes().count(), 2);
}

#[tokio::test]
async fn test_remotes_are_deduplicated_by_address() {
    let second = PathBuf::from("/work/second-clone");
    let git = two_remote_script()
        .reply("/work/second-clone|remote", "mirror\n")
        .reply(
            "/work/second-clone|remote get-url mirror",
            "git@example.com:team/repo.git\n",
        )
        .reply("/work/second-clone|branch -r", "  mirror/main\n");
    let tree = tree_for(git, vec![workspace(), second]);
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    let names: Vec<&str> = snapshot.remotes().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["origin", "upstream"]);
    assert!(snapshot.find_branch("mirror/main").is_none());
}

#[tokio::test]
async fn test_expansion_follows_options() {
    let tree = Arc::new(BranchTree::new(
        two_remote_script(),
        vec![workspace()],
        TreeOptions {
            merge_results_expanded: true,
        },
    ));
    tree.refresh().await;

    let snapshot = tree.snapshot(SortMode::Name);
    assert!(snapshot.roots().iter().all(|r| r.expanded));
    assert!(snapshot.find_branch("origin/feat").unwrap().expanded);
    assert!(!snapshot.find_branch("origin/main").unwrap().expanded);
}

#[tokio::test]
async fn test_refresh_notifies_subscribers() {
    let tree = tree_for(two_remote_script(), vec![workspace()]);
    let mut events = tree.subscribe();
    let generation = tree.refresh().await;

    // Refreshing placeholder, then the result
    assert_eq!(events.recv().await.unwrap(), TreeEvent::Changed { generation });
    assert_eq!(events.recv().await.unwrap(), TreeEvent::Changed { generation });
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_stale_refresh_is_discarded() {
    // The first `branch -r` is slow and only sees origin/main
    let git = two_remote_script()
        .reply_first("branch -r", "  origin/main\n")
        .delay_first("branch -r", Duration::from_millis(300));
    let tree = tree_for(git, vec![workspace()]);

    let slow = tokio::spawn({
        let tree = Arc::clone(&tree);
        async move { tree.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fresh = tree.refresh().await;
    let stale = slow.await.unwrap();

    assert!(fresh > stale);
    assert_eq!(tree.generation(), fresh);
    let snapshot = tree.snapshot(SortMode::Name);
    assert!(snapshot.find_branch("origin/feat").is_some());
    assert_eq!(snapshot.remotes().count(), 2);
}
