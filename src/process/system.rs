use std::process::{Command, Stdio};

use super::{ExecOptions, ExecOutput, ProcessRunner, display_command};
use crate::error::{DialogError, Result};

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(command: &str, args: &[String], options: &ExecOptions) -> Command {
        let mut cmd = Command::new(command);
        cmd.args(args);
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn exec(&self, command: &str, args: &[String], options: &ExecOptions) -> Result<ExecOutput> {
        tracing::debug!(command = %display_command(command, args), "exec");

        let output = Self::command(command, args, options)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DialogError::Launch {
                command: command.to_string(),
                source,
            })?;

        Ok(ExecOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }

    fn spawn(&self, command: &str, args: &[String], options: &ExecOptions) -> Result<u32> {
        tracing::debug!(command = %display_command(command, args), "spawn");

        let mut child = Self::command(command, args, options)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| DialogError::Launch {
                command: command.to_string(),
                source,
            })?;

        let pid = child.id();
        // Reap the detached child.
        std::thread::spawn(move || {
            let _ = child.wait();
        });

        Ok(pid)
    }

    fn terminate(&self, pid: u32) {
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            return;
        };
        if pid <= 0 {
            return;
        }
        // SAFETY: kill(2) has no memory-safety preconditions; a stale pid only yields ESRCH.
        unsafe {
            libc::kill(pid, libc::SIGTERM);
        }
    }
}
