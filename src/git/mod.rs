// ABOUTME: Git query layer - command execution, remote resolution and branch correlation

pub mod correlator;
pub mod executor;
pub mod remotes;

pub use correlator::{correlate_workspace, BranchEntry, RemoteEntry, WorkingTree};
pub use executor::{CommandExecutor, GitCli, GitError};
pub use remotes::{list_remotes, Remote};
