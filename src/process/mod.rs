//! Process execution seam.
//!
//! Every backend invocation goes through [`ProcessRunner`], so adapters and the
//! progress controller can be exercised against a scripted runner in tests.

mod system;

pub use system::SystemRunner;

use std::path::PathBuf;

use crate::error::Result;

/// Extra execution settings for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory for the child process.
    pub cwd: Option<PathBuf>,
    /// Environment variables added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit status; `-1` when the process was killed by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ExecOutput {
    /// Builds an output from a bare exit status and stdout.
    pub fn new(status: i32, stdout: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: String::new(),
            success: status == 0,
        }
    }

    /// Stdout with trailing newlines removed, the way every dialog reports values.
    pub fn value(&self) -> &str {
        self.stdout.trim_end_matches(['\n', '\r'])
    }
}

/// Runs external commands on behalf of the dialog layer.
pub trait ProcessRunner: Send + Sync {
    /// Runs a command to completion and captures its output.
    fn exec(&self, command: &str, args: &[String], options: &ExecOptions) -> Result<ExecOutput>;

    /// Starts a command without waiting for it and returns its pid.
    fn spawn(&self, command: &str, args: &[String], options: &ExecOptions) -> Result<u32>;

    /// Asks a previously spawned process to terminate. Failures are ignored.
    fn terminate(&self, pid: u32);
}

/// Renders a command line for logs.
pub(crate) fn display_command(command: &str, args: &[String]) -> String {
    let words = std::iter::once(command).chain(args.iter().map(String::as_str));
    shlex::try_join(words).unwrap_or_else(|_| format!("{command} {}", args.join(" ")))
}
