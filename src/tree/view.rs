// ABOUTME: View controller - selects which sorted snapshot is shown and answers hierarchy queries

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::cache::{BranchTree, TreeEvent};
use super::node::{Node, Tree};
use crate::git::CommandExecutor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Name,
    Date,
}

impl SortMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Name => Self::Date,
            Self::Date => Self::Name,
        }
    }
}

pub struct ViewController<E> {
    tree: Arc<BranchTree<E>>,
    sort_mode: SortMode,
}

impl<E: CommandExecutor> ViewController<E> {
    pub fn new(tree: Arc<BranchTree<E>>, sort_mode: SortMode) -> Self {
        Self { tree, sort_mode }
    }

    pub fn tree(&self) -> &Arc<BranchTree<E>> {
        &self.tree
    }

    pub const fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub const fn sorted_by_date(&self) -> bool {
        matches!(self.sort_mode, SortMode::Date)
    }

    /// Swaps the visible snapshot. Never re-runs any query.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        debug!("Switching sort mode to {:?}", mode);
        self.sort_mode = mode;
        self.tree.notify(TreeEvent::SortModeChanged(mode));
    }

    pub fn toggle_sort_mode(&mut self) {
        self.set_sort_mode(self.sort_mode.toggled());
    }

    /// The snapshot for the current sort mode. Holding it keeps it alive
    /// across later refreshes.
    pub fn roots(&self) -> Arc<Tree> {
        self.tree.snapshot(self.sort_mode)
    }

    pub fn children<'a>(&self, node: &'a Node) -> &'a [Node] {
        &node.children
    }

    /// Parent of `node` in the current snapshot, if it belongs to it.
    pub fn parent(&self, node: &Node) -> Option<Node> {
        self.roots().parent_of(node).cloned()
    }
}
