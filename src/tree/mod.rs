// ABOUTME: In-memory branch tree - node model, the refresh-driven cache and the sort-aware view

pub mod cache;
pub mod node;
pub mod view;

pub use cache::{build_snapshot, BranchTree, TreeEvent};
pub use node::{Icon, Node, NodeId, NodeKind, Placeholder, Tree};
pub use view::{SortMode, ViewController};
