// ABOUTME: UI components for the TUI interface - branch tree, help overlay and confirmations

pub mod confirmation_dialog;
pub mod help;
pub mod layout;
pub mod tree_view;

pub use confirmation_dialog::ConfirmationDialogComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use tree_view::BranchTreeComponent;
