// ABOUTME: Runs git queries as external processes and returns their output as clean lines
//
// Every query goes through the CommandExecutor trait so the discovery pipeline
// can be driven by a scripted executor in tests.

use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with status {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// Any text on stderr counts as failure, even with a zero exit status.
    #[error("`{command}` wrote to stderr: {stderr}")]
    Stderr { command: String, stderr: String },
    #[error("`{command}` produced no output")]
    EmptyOutput { command: String },
    #[error("Unexpected output from `{command}`: {line}")]
    MalformedOutput { command: String, line: String },
}

/// Executes one version-control query and yields its output lines.
///
/// `args` excludes the tool itself (`["branch", "-r"]`, not `["git", "branch", "-r"]`).
/// Implementations must return lines already filtered by [`split_output_lines`].
pub trait CommandExecutor: Send + Sync {
    fn run(
        &self,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> impl Future<Output = Result<Vec<String>, GitError>> + Send;
}

/// Splits raw stdout into lines, dropping blank lines and symbolic-ref aliases
/// such as `origin/HEAD -> origin/main`.
///
/// Only trailing whitespace is trimmed: callers rely on git's two-character
/// marker column still being in place.
pub fn split_output_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.contains("->"))
        .map(ToString::to_string)
        .collect()
}

/// Drops the two-character marker column git prints before branch names (`* `, `  `, `+ `).
pub fn strip_marker(line: &str) -> &str {
    line.get(2..).unwrap_or("")
}

/// First line of a query's output, or an error naming the query.
pub fn first_line(lines: Vec<String>, command: &str) -> Result<String, GitError> {
    lines.into_iter().next().ok_or_else(|| GitError::EmptyOutput {
        command: command.to_string(),
    })
}

/// The real executor: spawns the configured git binary via tokio.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
}

impl GitCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary.display(), args.join(" "))
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CommandExecutor for GitCli {
    async fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<Vec<String>, GitError> {
        let command = self.describe(args);
        debug!("Running `{}` in {:?}", command, cwd);

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(GitError::NonZeroExit {
                command,
                code: output.status.code(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            return Err(GitError::Stderr { command, stderr });
        }

        Ok(split_output_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}
