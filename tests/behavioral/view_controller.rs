// ABOUTME: Behavioral tests for the view controller - sort switching and hierarchy navigation

use pretty_assertions::assert_eq;
use std::sync::Arc;

use merged_branches::config::TreeOptions;
use merged_branches::tree::{BranchTree, NodeKind, SortMode, TreeEvent, ViewController};

use super::fixtures::{two_remote_script, workspace, ScriptedGit};

async fn loaded_view() -> ViewController<ScriptedGit> {
    let tree = Arc::new(BranchTree::new(
        two_remote_script(),
        vec![workspace()],
        TreeOptions::default(),
    ));
    tree.refresh().await;
    ViewController::new(tree, SortMode::Name)
}

fn origin_labels(view: &ViewController<ScriptedGit>) -> Vec<String> {
    view.roots().roots()[0]
        .children
        .iter()
        .map(|c| c.label.clone())
        .collect()
}

#[tokio::test]
async fn test_switching_sort_mode_runs_no_queries() {
    let mut view = loaded_view().await;
    let queries = view.tree().executor().call_count();
    assert!(queries > 0);

    assert_eq!(origin_labels(&view), vec!["feat", "main", "release"]);
    view.set_sort_mode(SortMode::Date);
    assert!(view.sorted_by_date());
    assert_eq!(origin_labels(&view), vec!["main", "release", "feat"]);
    view.toggle_sort_mode();
    assert_eq!(view.sort_mode(), SortMode::Name);

    assert_eq!(view.tree().executor().call_count(), queries);
}

#[tokio::test]
async fn test_sort_switch_notifies() {
    let mut view = loaded_view().await;
    let mut events = view.tree().subscribe();

    view.toggle_sort_mode();
    assert_eq!(
        events.recv().await.unwrap(),
        TreeEvent::SortModeChanged(SortMode::Date)
    );
}

#[tokio::test]
async fn test_children_and_parent_navigation() {
    let view = loaded_view().await;
    let snapshot = view.roots();

    let origin = &snapshot.roots()[0];
    let feat = view
        .children(origin)
        .iter()
        .find(|c| c.label == "feat")
        .unwrap();
    let target = &view.children(feat)[0];
    assert!(matches!(target.kind, NodeKind::MergedInto { .. }));

    assert_eq!(view.parent(target).map(|p| p.id), Some(feat.id));
    assert_eq!(view.parent(feat).map(|p| p.id), Some(origin.id));
    assert!(view.parent(origin).is_none());

    let remote = snapshot.owning_remote(target).unwrap();
    assert_eq!(remote.address, "git@example.com:team/repo.git");
}

#[tokio::test]
async fn test_snapshot_survives_refresh() {
    let view = loaded_view().await;
    let held = view.roots();
    view.tree().refresh().await;

    // The held snapshot is unchanged; the view now serves a new one
    assert_eq!(held.outline(), view.roots().outline());
    assert_ne!(held.roots()[0].id, view.roots().roots()[0].id);
    assert!(held.get(held.roots()[0].children[0].id).is_some());
}
