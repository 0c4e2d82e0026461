// ABOUTME: User-visible shells for prune/delete - tmux windows for the TUI, the caller's terminal for the CLI

use std::path::Path;
use std::process::Command;
use tracing::debug;
use uuid::Uuid;

use super::{ActionError, ShellRunner, ShellTarget};

/// Opens a tmux window (inside tmux) or a detached tmux session and types
/// commands into it.
#[derive(Debug, Default)]
pub struct TmuxShell;

impl TmuxShell {
    pub fn new() -> Self {
        Self
    }

    pub fn is_available() -> bool {
        which::which("tmux").is_ok()
    }

    fn inside_tmux() -> bool {
        std::env::var_os("TMUX").is_some()
    }

    /// tmux names may not contain `.` or `:`; keep them readable and unique.
    fn sanitize_name(title: &str) -> String {
        let cleaned: String = title
            .chars()
            .map(|c| match c {
                ' ' | '.' | '/' | ':' => '_',
                c => c,
            })
            .collect();
        let suffix = Uuid::new_v4().simple().to_string();
        format!("mgb_{}_{}", cleaned, &suffix[..8])
    }

    fn tmux(args: &[&str]) -> Result<String, ActionError> {
        debug!("Running tmux {:?}", args);
        let output = Command::new("tmux").args(args).output()?;
        if !output.status.success() {
            return Err(ActionError::Shell(format!(
                "tmux {} failed: {}",
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl ShellRunner for TmuxShell {
    fn open(&self, title: &str, cwd: &Path) -> Result<ShellTarget, ActionError> {
        if !Self::is_available() {
            return Err(ActionError::ShellUnavailable("tmux is not installed".to_string()));
        }

        let cwd = cwd.to_str().ok_or_else(|| {
            ActionError::Shell(format!("Invalid working directory {}", cwd.display()))
        })?;
        let name = Self::sanitize_name(title);

        if Self::inside_tmux() {
            let pane = Self::tmux(&["new-window", "-P", "-F", "#{pane_id}", "-n", &name, "-c", cwd])?;
            Ok(ShellTarget {
                id: pane,
                title: format!("tmux window '{name}'"),
            })
        } else {
            let pane =
                Self::tmux(&["new-session", "-d", "-P", "-F", "#{pane_id}", "-s", &name, "-c", cwd])?;
            Ok(ShellTarget {
                id: pane,
                title: format!("tmux session '{name}' (tmux attach -t {name})"),
            })
        }
    }

    fn send(&self, target: &ShellTarget, text: &str, submit: bool) -> Result<(), ActionError> {
        Self::tmux(&["send-keys", "-t", &target.id, "-l", text])?;
        if submit {
            Self::tmux(&["send-keys", "-t", &target.id, "Enter"])?;
        }
        Ok(())
    }
}

/// Runs submitted commands in the caller's terminal with inherited stdio.
/// Unsubmitted commands are printed for the user to run, unless
/// `run_unsubmitted` was granted up front (e.g. `--yes`).
#[derive(Debug, Default)]
pub struct InheritedShell {
    pub run_unsubmitted: bool,
}

impl ShellRunner for InheritedShell {
    fn open(&self, title: &str, cwd: &Path) -> Result<ShellTarget, ActionError> {
        println!("== {} ({})", title, cwd.display());
        Ok(ShellTarget {
            id: cwd.display().to_string(),
            title: cwd.display().to_string(),
        })
    }

    fn send(&self, target: &ShellTarget, text: &str, submit: bool) -> Result<(), ActionError> {
        if !submit && !self.run_unsubmitted {
            println!("Run this to confirm:\n  {text}");
            return Ok(());
        }

        println!("$ {text}");
        let status = Command::new("sh")
            .arg("-c")
            .arg(text)
            .current_dir(&target.id)
            .status()?;
        if !status.success() {
            return Err(ActionError::Shell(format!("`{text}` exited with {status}")));
        }
        Ok(())
    }
}
