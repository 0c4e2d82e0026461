// ABOUTME: Tree cache - drives discovery for every workspace and serves two sorted snapshots
//
// A refresh rebuilds everything from scratch. Results are published by swapping
// whole Arc<Tree> values; refreshes that were overtaken by a newer one are
// discarded so the cache never regresses to older output.

use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::node::{Node, Placeholder, Tree};
use super::view::SortMode;
use crate::config::TreeOptions;
use crate::git::{correlate_workspace, CommandExecutor, WorkingTree};

/// Notifications fired after the cache (or the selected view) changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    Changed { generation: u64 },
    SortModeChanged(SortMode),
}

#[derive(Debug)]
struct Views {
    by_name: Arc<Tree>,
    by_date: Arc<Tree>,
}

impl Views {
    fn placeholder(placeholder: Placeholder) -> Self {
        Self {
            by_name: Arc::new(Tree::placeholder(placeholder)),
            by_date: Arc::new(Tree::placeholder(placeholder)),
        }
    }
}

pub struct BranchTree<E> {
    executor: E,
    workspaces: Vec<PathBuf>,
    options: TreeOptions,
    generation: AtomicU64,
    views: RwLock<Views>,
    events: broadcast::Sender<TreeEvent>,
}

impl<E: CommandExecutor> BranchTree<E> {
    pub fn new(executor: E, workspaces: Vec<PathBuf>, options: TreeOptions) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            executor,
            workspaces,
            options,
            generation: AtomicU64::new(0),
            views: RwLock::new(Views::placeholder(Placeholder::Refreshing)),
            events,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn workspaces(&self) -> &[PathBuf] {
        &self.workspaces
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.events.subscribe()
    }

    /// Generation of the most recently started refresh.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Current snapshot for one sort order.
    pub fn snapshot(&self, mode: SortMode) -> Arc<Tree> {
        let views = self.views.read();
        match mode {
            SortMode::Name => Arc::clone(&views.by_name),
            SortMode::Date => Arc::clone(&views.by_date),
        }
    }

    pub(crate) fn notify(&self, event: TreeEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Re-runs every query and replaces both snapshots. Returns this refresh's
    /// generation. Never fails: problems end up as placeholders and log lines.
    pub async fn refresh(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Starting refresh generation {}", generation);

        if self.workspaces.is_empty() || !self.tool_available().await {
            warn!("git is not usable or no workspace is configured");
            self.publish(generation, Views::placeholder(Placeholder::ToolMissing));
            return generation;
        }

        self.publish(generation, Views::placeholder(Placeholder::Refreshing));

        let mut working = WorkingTree::default();
        for workspace in &self.workspaces {
            if let Err(e) = correlate_workspace(&self.executor, workspace, &mut working).await {
                warn!("Skipping workspace {}: {}", workspace.display(), e);
            }
        }

        let views = if working.is_empty() {
            Views::placeholder(Placeholder::NoBranchesFound)
        } else {
            Views {
                by_name: Arc::new(build_snapshot(&working, SortMode::Name, &self.options)),
                by_date: Arc::new(build_snapshot(&working, SortMode::Date, &self.options)),
            }
        };

        if self.publish(generation, views) {
            info!(
                "Refresh generation {} found {} branches on {} remotes",
                generation,
                working.branch_count(),
                working.remotes.len()
            );
        }
        generation
    }

    async fn tool_available(&self) -> bool {
        match self.executor.run(&["--version"], None).await {
            Ok(lines) => !lines.is_empty(),
            Err(e) => {
                warn!("git version probe failed: {}", e);
                false
            }
        }
    }

    /// Installs `views` unless a newer refresh has started meanwhile.
    fn publish(&self, generation: u64, views: Views) -> bool {
        {
            let mut current = self.views.write();
            if generation != self.generation.load(Ordering::SeqCst) {
                debug!("Discarding stale results of refresh generation {}", generation);
                return false;
            }
            *current = views;
        }
        self.notify(TreeEvent::Changed { generation });
        true
    }
}

/// Builds an independent tree from `working` with each remote's branches
/// sorted for `mode`. Merge targets keep discovery order.
pub fn build_snapshot(working: &WorkingTree, mode: SortMode, options: &TreeOptions) -> Tree {
    let mut roots: Vec<Node> = working
        .remotes
        .iter()
        .map(|entry| Node::remote(entry, options))
        .collect();

    for root in &mut roots {
        match mode {
            SortMode::Name => root.children.sort_by(|a, b| a.label.cmp(&b.label)),
            SortMode::Date => root.children.sort_by(|a, b| b.detail.cmp(&a.detail)),
        }
    }

    Tree::new(roots)
}
