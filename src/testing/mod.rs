//! Test doubles shared by unit tests.
//!
//! # Example
//! ```ignore
//! let runner = MockRunner::with_binaries(&["zenity"]);
//! runner.push(0, "hello\n");
//!
//! let zenity = Zenity::new(runner.clone());
//! assert_eq!(zenity.entry("Name?", "", &DialogOptions::new()).unwrap(), Some("hello".into()));
//! assert_eq!(runner.last_call().command, "zenity");
//! ```

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::process::{ExecOptions, ExecOutput, ProcessRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Exec,
    Spawn,
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub command: String,
    pub args: Vec<String>,
}

/// Scripted [`ProcessRunner`].
///
/// `which` probes are answered from the configured binary set; every other
/// `exec` pops the next queued output, defaulting to a silent success.
#[derive(Debug, Default)]
pub struct MockRunner {
    binaries: BTreeSet<String>,
    responses: Mutex<VecDeque<ExecOutput>>,
    calls: Mutex<Vec<Call>>,
    terminated: Mutex<Vec<u32>>,
    next_pid: AtomicU32,
}

impl MockRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_pid: AtomicU32::new(4242),
            ..Default::default()
        })
    }

    pub fn with_binaries(binaries: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            binaries: binaries.iter().map(|b| b.to_string()).collect(),
            next_pid: AtomicU32::new(4242),
            ..Default::default()
        })
    }

    /// Queues the output for the next non-probe `exec`.
    pub fn push(&self, status: i32, stdout: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ExecOutput::new(status, stdout));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls excluding `which` probes.
    pub fn dialog_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.command != "which")
            .collect()
    }

    pub fn last_call(&self) -> Call {
        self.dialog_calls().pop().unwrap()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, command: &str, args: &[String]) {
        self.calls.lock().unwrap().push(Call {
            kind,
            command: command.to_string(),
            args: args.to_vec(),
        });
    }
}

impl ProcessRunner for MockRunner {
    fn exec(&self, command: &str, args: &[String], _options: &ExecOptions) -> Result<ExecOutput> {
        self.record(CallKind::Exec, command, args);

        if command == "which" {
            let name = args.first().map(String::as_str).unwrap_or_default();
            return Ok(if self.binaries.contains(name) {
                ExecOutput::new(0, format!("/usr/bin/{name}\n"))
            } else {
                ExecOutput::new(1, "")
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ExecOutput::new(0, "")))
    }

    fn spawn(&self, command: &str, args: &[String], _options: &ExecOptions) -> Result<u32> {
        self.record(CallKind::Spawn, command, args);
        Ok(self.next_pid.fetch_add(1, Ordering::SeqCst))
    }

    fn terminate(&self, pid: u32) {
        self.terminated.lock().unwrap().push(pid);
    }
}

/// Converts string slices into owned args for assertions.
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
