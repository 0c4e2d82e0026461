// ABOUTME: Tree nodes for the remote -> branch -> merged-into hierarchy and the immutable Tree snapshot

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::config::TreeOptions;
use crate::git::correlator::{BranchEntry, BranchInfo, MergeTarget, RemoteEntry};
use crate::git::Remote;

/// Identity of a node within one snapshot. Regenerated for every build, so
/// two snapshots of the same data never share ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal, non-interactive stand-ins for a real tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placeholder {
    ToolMissing,
    NoBranchesFound,
    Refreshing,
}

impl Placeholder {
    pub const fn message(self) -> &'static str {
        match self {
            Self::ToolMissing => "The command git was not found.",
            Self::NoBranchesFound => "No branches were found",
            Self::Refreshing => "Refreshing...",
        }
    }

    pub const fn icon(self) -> Icon {
        match self {
            Self::ToolMissing | Self::NoBranchesFound => Icon::Alert,
            Self::Refreshing => Icon::Refresh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Alert,
    Database,
    GitBranch,
    GitMerge,
    Refresh,
}

impl Icon {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Alert => "⚠",
            Self::Database => "⛁",
            Self::GitBranch => "⎇",
            Self::GitMerge => "↳",
            Self::Refresh => "↻",
        }
    }
}

/// What a node represents. Decided once when the node is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum NodeKind {
    Remote(Remote),
    Branch(BranchInfo),
    /// A branch with at least one merge target below it
    MergedBranch(BranchInfo),
    MergedInto { target: String },
    Status(Placeholder),
}

impl NodeKind {
    pub const fn icon(&self) -> Icon {
        match self {
            Self::Remote(_) => Icon::Database,
            Self::Branch(_) | Self::MergedBranch(_) => Icon::GitBranch,
            Self::MergedInto { .. } => Icon::GitMerge,
            Self::Status(placeholder) => placeholder.icon(),
        }
    }

    /// Tag used to decide which actions apply to a node.
    pub const fn context_value(&self) -> Option<&'static str> {
        match self {
            Self::Remote(_) => Some("remote"),
            Self::Branch(_) => Some("branch"),
            Self::MergedBranch(_) => Some("mergedBranch"),
            Self::MergedInto { .. } => Some("mergedInBranch"),
            Self::Status(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
    pub expanded: bool,
    /// Navigation only; resolve through [`Tree::parent_of`].
    #[serde(skip)]
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn placeholder(placeholder: Placeholder) -> Self {
        Self {
            id: NodeId::new(),
            kind: NodeKind::Status(placeholder),
            label: placeholder.message().to_string(),
            detail: None,
            children: Vec::new(),
            expanded: false,
            parent: None,
        }
    }

    /// Deep-builds a remote with its branches and their merge targets, all
    /// with fresh ids.
    pub fn remote(entry: &RemoteEntry, options: &TreeOptions) -> Self {
        let id = NodeId::new();
        let children: Vec<Self> = entry
            .branches
            .iter()
            .map(|branch| Self::branch(branch, id, options))
            .collect();

        Self {
            id,
            kind: NodeKind::Remote(entry.remote.clone()),
            label: entry.remote.name.clone(),
            detail: Some(entry.remote.address.clone()),
            expanded: options.merge_results_expanded && !children.is_empty(),
            children,
            parent: None,
        }
    }

    fn branch(entry: &BranchEntry, parent: NodeId, options: &TreeOptions) -> Self {
        let id = NodeId::new();
        let children: Vec<Self> = entry
            .merged_into
            .iter()
            .map(|target| Self::merged_into(target, id))
            .collect();

        let merged = !children.is_empty();
        let kind = if merged {
            NodeKind::MergedBranch(entry.info.clone())
        } else {
            NodeKind::Branch(entry.info.clone())
        };

        Self {
            id,
            kind,
            label: entry.info.label.clone(),
            detail: Some(entry.info.detail()),
            children,
            expanded: merged && options.merge_results_expanded,
            parent: Some(parent),
        }
    }

    fn merged_into(target: &MergeTarget, parent: NodeId) -> Self {
        Self {
            id: NodeId::new(),
            kind: NodeKind::MergedInto {
                target: target.name.clone(),
            },
            label: target.label.clone(),
            detail: None,
            children: Vec::new(),
            expanded: false,
            parent: Some(parent),
        }
    }

    pub const fn branch_info(&self) -> Option<&BranchInfo> {
        match &self.kind {
            NodeKind::Branch(info) | NodeKind::MergedBranch(info) => Some(info),
            _ => None,
        }
    }

    pub const fn remote_info(&self) -> Option<&Remote> {
        match &self.kind {
            NodeKind::Remote(remote) => Some(remote),
            _ => None,
        }
    }

    pub const fn icon(&self) -> Icon {
        self.kind.icon()
    }

    pub fn tooltip(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.label)
    }
}

/// One immutable view of the hierarchy: ordered top-level nodes plus an
/// id index used to answer parent lookups.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Node>,
    #[serde(skip)]
    index: HashMap<NodeId, Vec<usize>>,
}

impl Tree {
    pub fn new(roots: Vec<Node>) -> Self {
        let mut index = HashMap::new();
        for (position, root) in roots.iter().enumerate() {
            index_node(root, vec![position], &mut index);
        }
        Self { roots, index }
    }

    pub fn placeholder(placeholder: Placeholder) -> Self {
        Self::new(vec![Node::placeholder(placeholder)])
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// The placeholder this tree consists of, if it is one.
    pub fn placeholder_kind(&self) -> Option<Placeholder> {
        match self.roots.as_slice() {
            [Node {
                kind: NodeKind::Status(placeholder),
                ..
            }] => Some(*placeholder),
            _ => None,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let path = self.index.get(&id)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for position in rest {
            node = node.children.get(*position)?;
        }
        Some(node)
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent.and_then(|parent| self.get(parent))
    }

    /// Walks up from `node` to the remote it sits under (or is).
    pub fn owning_remote<'a>(&'a self, node: &'a Node) -> Option<&'a Remote> {
        let mut current = node;
        loop {
            if let Some(remote) = current.remote_info() {
                return Some(remote);
            }
            current = self.parent_of(current)?;
        }
    }

    /// Finds a branch node by its fully qualified name (`origin/feat`).
    pub fn find_branch(&self, name: &str) -> Option<&Node> {
        self.roots
            .iter()
            .flat_map(|root| root.children.iter())
            .find(|node| node.branch_info().is_some_and(|info| info.name == name))
    }

    pub fn remotes(&self) -> impl Iterator<Item = &Remote> {
        self.roots.iter().filter_map(Node::remote_info)
    }

    /// Depth-first `(depth, label)` listing, ignoring ids.
    pub fn outline(&self) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        for root in &self.roots {
            outline_node(root, 0, &mut lines);
        }
        lines
    }
}

fn index_node(node: &Node, path: Vec<usize>, index: &mut HashMap<NodeId, Vec<usize>>) {
    for (position, child) in node.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(position);
        index_node(child, child_path, index);
    }
    index.insert(node.id, path);
}

fn outline_node(node: &Node, depth: usize, lines: &mut Vec<(usize, String)>) {
    lines.push((depth, node.label.clone()));
    for child in &node.children {
        outline_node(child, depth + 1, lines);
    }
}
