// ABOUTME: TUI state - current snapshot, visible rows, selection, expansion overrides and dialogs

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::actions::ActionSurface;
use crate::git::CommandExecutor;
use crate::tree::{Node, NodeId, NodeKind, Placeholder, SortMode, Tree, TreeEvent, ViewController};

/// One line of the flattened, expansion-aware tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: NodeId,
    pub depth: usize,
    /// Stable across refreshes and sort modes, unlike the node id
    pub key: String,
    pub expandable: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    Refresh,
    SetSortMode(SortMode),
    Prune,
    DeleteBranch(NodeId),
    CopyBranchName(NodeId),
    CopyRemoteAddress(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteBranch(NodeId),
    Prune,
}

#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub warning: Option<String>,
    pub confirm_action: ConfirmAction,
    pub selected_option: bool, // true = Yes, false = No
}

#[derive(Debug)]
pub struct AppState {
    pub tree: Arc<Tree>,
    pub sort_mode: SortMode,
    pub rows: Vec<VisibleRow>,
    pub selected: usize,
    expansion: HashMap<String, bool>,
    pub show_details: bool,
    pub help_visible: bool,
    pub confirmation_dialog: Option<ConfirmationDialog>,
    pub status_message: Option<String>,
    pub pending_async_action: Option<AsyncAction>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(sort_mode: SortMode, show_details: bool) -> Self {
        let mut state = Self {
            tree: Arc::new(Tree::placeholder(Placeholder::Refreshing)),
            sort_mode,
            rows: Vec::new(),
            selected: 0,
            expansion: HashMap::new(),
            show_details,
            help_visible: false,
            confirmation_dialog: None,
            status_message: None,
            pending_async_action: None,
            should_quit: false,
        };
        state.rebuild_rows();
        state
    }

    /// Installs a new snapshot, keeping the selection on the same logical row.
    pub fn set_tree(&mut self, tree: Arc<Tree>, sort_mode: SortMode) {
        let selected_key = self.rows.get(self.selected).map(|row| row.key.clone());
        self.tree = tree;
        self.sort_mode = sort_mode;
        self.rebuild_rows();

        self.selected = selected_key
            .and_then(|key| self.rows.iter().position(|row| row.key == key))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));
    }

    fn rebuild_rows(&mut self) {
        let tree = Arc::clone(&self.tree);
        let mut rows = Vec::new();
        for root in tree.roots() {
            self.push_rows(root, 0, row_key(None, root), &mut rows);
        }
        self.rows = rows;
    }

    fn push_rows(&self, node: &Node, depth: usize, key: String, rows: &mut Vec<VisibleRow>) {
        let expandable = !node.children.is_empty();
        let expanded = expandable && self.expansion.get(&key).copied().unwrap_or(node.expanded);
        rows.push(VisibleRow {
            node: node.id,
            depth,
            key: key.clone(),
            expandable,
            expanded,
        });
        if expanded {
            for child in &node.children {
                self.push_rows(child, depth + 1, row_key(Some(&key), child), rows);
            }
        }
    }

    pub fn selected_row(&self) -> Option<&VisibleRow> {
        self.rows.get(self.selected)
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_row().and_then(|row| self.tree.get(row.node))
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    fn set_expanded(&mut self, expanded: bool) {
        if let Some(row) = self.selected_row() {
            if row.expandable {
                self.expansion.insert(row.key.clone(), expanded);
                self.rebuild_rows();
            }
        }
    }

    pub fn toggle_expanded(&mut self) {
        if let Some(row) = self.selected_row() {
            let expanded = row.expanded;
            self.set_expanded(!expanded);
        }
    }

    pub fn expand(&mut self) {
        self.set_expanded(true);
    }

    /// Collapses the selected row, or jumps to its parent when already collapsed.
    pub fn collapse(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.expanded {
            self.set_expanded(false);
            return;
        }

        let parent = self
            .tree
            .get(row.node)
            .and_then(|node| self.tree.parent_of(node))
            .map(|parent| parent.id);
        if let Some(parent) = parent {
            if let Some(position) = self.rows.iter().position(|r| r.node == parent) {
                self.selected = position;
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Queues an action against the selected node, if there is one.
    pub fn request_for_selected(&mut self, action: fn(NodeId) -> AsyncAction) {
        let target = self
            .selected_node()
            .filter(|node| node.kind.context_value().is_some())
            .map(|node| node.id);
        match target {
            Some(id) => self.pending_async_action = Some(action(id)),
            None => self.set_status("Nothing selected"),
        }
    }

    pub fn request_delete(&mut self) {
        let Some(node) = self.selected_node() else {
            return;
        };
        let dialog = node.branch_info().map(|info| {
            debug!("Asking to delete {}", info.name);
            let warning = matches!(node.kind, NodeKind::Branch(_))
                .then(|| "This branch is not merged into any other remote branch!".to_string());
            ConfirmationDialog {
                title: "Delete Remote Branch".to_string(),
                message: format!(
                    "Open a shell with `git push {} --delete {}` ready to run?",
                    info.remote, info.label
                ),
                warning,
                confirm_action: ConfirmAction::DeleteBranch(node.id),
                selected_option: false,
            }
        });

        match dialog {
            Some(dialog) => self.confirmation_dialog = Some(dialog),
            None => self.set_status("Only branches can be deleted"),
        }
    }

    pub fn request_prune(&mut self) {
        let remotes = self.tree.remotes().count();
        if remotes == 0 {
            self.set_status("No remotes to prune");
            return;
        }
        self.confirmation_dialog = Some(ConfirmationDialog {
            title: "Prune Remotes".to_string(),
            message: format!("Run `git remote update --prune` for {remotes} remote(s)?"),
            warning: None,
            confirm_action: ConfirmAction::Prune,
            selected_option: true,
        });
    }

    pub fn confirm_dialog(&mut self) {
        let Some(dialog) = self.confirmation_dialog.take() else {
            return;
        };
        if !dialog.selected_option {
            return;
        }
        self.pending_async_action = Some(match dialog.confirm_action {
            ConfirmAction::DeleteBranch(id) => AsyncAction::DeleteBranch(id),
            ConfirmAction::Prune => AsyncAction::Prune,
        });
    }
}

pub struct App<E> {
    pub state: AppState,
    view: ViewController<E>,
    actions: ActionSurface,
    events: broadcast::Receiver<TreeEvent>,
}

impl<E: CommandExecutor + 'static> App<E> {
    pub fn new(view: ViewController<E>, actions: ActionSurface, show_details: bool) -> Self {
        let events = view.tree().subscribe();
        let mut state = AppState::new(view.sort_mode(), show_details);
        state.set_tree(view.roots(), view.sort_mode());
        Self {
            state,
            view,
            actions,
            events,
        }
    }

    pub fn init(&mut self) {
        info!(
            "Starting with {} workspace(s), sorted by {:?}",
            self.view.tree().workspaces().len(),
            self.view.sort_mode()
        );
        self.spawn_refresh();
    }

    fn spawn_refresh(&self) {
        let tree = Arc::clone(self.view.tree());
        tokio::spawn(async move {
            tree.refresh().await;
        });
    }

    /// Pulls pending cache notifications and installs the newest snapshot.
    fn drain_tree_events(&mut self) {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(_) => changed = true,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!("Missed {} tree events", skipped);
                    changed = true;
                }
                Err(_) => break,
            }
        }
        if changed {
            self.sync_tree();
        }
    }

    fn sync_tree(&mut self) {
        self.state.set_tree(self.view.roots(), self.view.sort_mode());
    }

    pub async fn tick(&mut self) -> anyhow::Result<()> {
        self.drain_tree_events();
        self.process_async_action().await
    }

    pub async fn process_async_action(&mut self) -> anyhow::Result<()> {
        let Some(action) = self.state.pending_async_action.take() else {
            return Ok(());
        };
        debug!("Processing {:?}", action);

        let outcome = match action {
            AsyncAction::Refresh => {
                self.spawn_refresh();
                Ok("Refreshing".to_string())
            }
            AsyncAction::SetSortMode(mode) => {
                self.view.set_sort_mode(mode);
                self.sync_tree();
                Ok(if self.view.sorted_by_date() {
                    "Sorted by date".to_string()
                } else {
                    "Sorted by name".to_string()
                })
            }
            AsyncAction::Prune => {
                // Prune completes in its own shell; refreshing is left to the user
                let tree = self.view.roots();
                self.actions
                    .prune(&tree, self.view.tree().workspaces())
                    .map(|message| format!("{message}, press r once the shell finishes"))
            }
            AsyncAction::DeleteBranch(id) => match self.state.tree.get(id) {
                Some(node) => self.actions.delete(node),
                None => Ok("Branch no longer listed".to_string()),
            },
            AsyncAction::CopyBranchName(id) => match self.state.tree.get(id) {
                Some(node) => self.actions.copy_branch_name(node),
                None => Ok("Branch no longer listed".to_string()),
            },
            AsyncAction::CopyRemoteAddress(id) => {
                let tree = Arc::clone(&self.state.tree);
                match tree.get(id) {
                    Some(node) => self.actions.copy_remote_address(&tree, node),
                    None => Ok("Remote no longer listed".to_string()),
                }
            }
        };

        match outcome {
            Ok(message) => self.state.set_status(message),
            Err(e) => {
                warn!("Action failed: {}", e);
                self.state.set_status(format!("Error: {e}"));
            }
        }
        Ok(())
    }
}

fn row_key(parent: Option<&str>, node: &Node) -> String {
    match (parent, &node.kind) {
        (None, NodeKind::Remote(remote)) => format!("{}\u{1f}{}", remote.name, remote.address),
        (None, _) => node.label.clone(),
        (Some(parent), NodeKind::MergedInto { target }) => format!("{parent}\u{1f}{target}"),
        (Some(parent), _) => format!("{parent}\u{1f}{}", node.label),
    }
}
