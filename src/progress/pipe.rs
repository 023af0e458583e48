use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use indoc::indoc;
use uuid::Uuid;

use super::{ProgressBar, fifo, require_size};
use crate::backend::{DialogOptions, ListStyle, zenity};
use crate::error::Result;
use crate::process::{ExecOptions, ProcessRunner};

const RELAY_SHELL: &str = "sh";

/// Feeds the progress FIFO into the dialog's stdin and reports its exit on the
/// sentinel FIFO. `$1` is the progress FIFO, `$2` the sentinel, the rest is the
/// dialog command line.
///
/// Both FIFOs are opened read-write up front, so the relay never blocks
/// waiting for a peer and the final write still lands after the waiter has
/// unlinked the sentinel.
const RELAY_SCRIPT: &str = indoc! {r#"
    in="$1"; sentinel="$2"; shift 2
    exec 3<>"$in" 4<>"$sentinel"
    "$@" <&3 3<&- 4>&- &
    ui=$!
    trap 'kill "$ui" 2>/dev/null' TERM
    wait "$ui"
    printf 'done\n' >&4
"#};

const SENTINEL: &str = "done\n";

/// zenity progress dialog fed through a FIFO relay.
///
/// Values are rescaled onto zenity's 0..=100 percentage. A background thread
/// watches the sentinel FIFO and clears the liveness flag when the dialog
/// exits, whether the user dismissed it or [`ProgressBar::close`] ended it.
pub struct PipeProgress {
    runner: Arc<dyn ProcessRunner>,
    relay_pid: u32,
    input: PathBuf,
    sentinel: PathBuf,
    writer: Option<File>,
    size: u64,
    value: u64,
    auto_close: bool,
    closed: bool,
    alive: Arc<AtomicBool>,
}

impl PipeProgress {
    pub(crate) fn start(
        runner: Arc<dyn ProcessRunner>,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<Self> {
        Self::start_in(runner, &std::env::temp_dir(), text, size, auto_close, options)
    }

    /// Like [`PipeProgress::start`], placing the FIFOs in `dir`.
    pub(crate) fn start_in(
        runner: Arc<dyn ProcessRunner>,
        dir: &Path,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<Self> {
        require_size(size)?;

        let id = Uuid::new_v4();
        let input = dir.join(format!("dialogbridge-{id}.progress"));
        let sentinel = dir.join(format!("dialogbridge-{id}.done"));
        fifo::create(&input)?;
        if let Err(e) = fifo::create(&sentinel) {
            fifo::remove(&input);
            return Err(e);
        }

        let mut args = vec![
            "-c".to_string(),
            RELAY_SCRIPT.to_string(),
            "dialogbridge-relay".to_string(),
            input.display().to_string(),
            sentinel.display().to_string(),
            zenity::BINARY.to_string(),
            "--progress".to_string(),
            "--text".to_string(),
            text.to_string(),
            "--percentage".to_string(),
            "0".to_string(),
        ];
        args.extend(options.to_args(ListStyle::Repeated));
        if auto_close {
            args.push("--auto-close".to_string());
        }

        let relay_pid = match runner.spawn(RELAY_SHELL, &args, &ExecOptions::default()) {
            Ok(pid) => pid,
            Err(e) => {
                fifo::remove(&input);
                fifo::remove(&sentinel);
                return Err(e);
            }
        };

        let alive = Arc::new(AtomicBool::new(true));
        if let Err(e) = spawn_waiter(input.clone(), sentinel.clone(), alive.clone()) {
            runner.terminate(relay_pid);
            fifo::remove(&input);
            fifo::remove(&sentinel);
            return Err(e.into());
        }
        tracing::debug!(pid = relay_pid, fifo = %input.display(), "progress relay started");

        Ok(Self {
            runner,
            relay_pid,
            input,
            sentinel,
            writer: None,
            size,
            value: 0,
            auto_close,
            closed: false,
            alive,
        })
    }

    /// Writes one protocol line to the relay.
    fn send(&mut self, line: &str) -> Result<()> {
        if self.writer.is_none() {
            let Some(writer) = fifo::open_writer(&self.input)? else {
                tracing::debug!("progress relay is not reading, treating dialog as closed");
                self.mark_closed();
                return Ok(());
            };
            self.writer = Some(writer);
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        match writer.write_all(line.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                self.mark_closed();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn mark_closed(&mut self) {
        self.closed = true;
        self.writer = None;
    }
}

/// Blocks on the sentinel FIFO, then clears `alive` and removes both FIFOs.
fn spawn_waiter(input: PathBuf, sentinel: PathBuf, alive: Arc<AtomicBool>) -> io::Result<()> {
    thread::Builder::new()
        .name("progress-waiter".to_string())
        .spawn(move || {
            if let Err(e) = fifo::wait_for_signal(&sentinel) {
                tracing::debug!("progress sentinel read failed: {e}");
            }
            alive.store(false, Ordering::Release);
            fifo::remove(&input);
            fifo::remove(&sentinel);
            tracing::debug!("progress relay finished");
        })
        .map(|_| ())
}

impl ProgressBar for PipeProgress {
    fn set_label_text(&mut self, text: &str) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        self.send(&format!("#{}\n", text.replace('\n', " ")))
    }

    fn set_progress(&mut self, value: u64) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        self.value = value.min(self.size);
        let percent = u128::from(self.value) * 100 / u128::from(self.size);
        self.send(&format!("{percent}\n"))?;

        if self.auto_close && self.value >= self.size {
            tracing::debug!(pid = self.relay_pid, "progress complete, dialog closes itself");
            self.mark_closed();
        }
        Ok(())
    }

    fn progress(&self) -> u64 {
        self.value
    }

    fn is_active(&self) -> bool {
        !self.closed && self.alive.load(Ordering::Acquire)
    }

    fn close(&mut self) -> Result<()> {
        if !self.is_active() {
            self.mark_closed();
            return Ok(());
        }
        self.mark_closed();
        fifo::signal(&self.sentinel, SENTINEL);
        self.runner.terminate(self.relay_pid);
        tracing::debug!(pid = self.relay_pid, "progress relay terminated");
        Ok(())
    }
}

impl Drop for PipeProgress {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::debug!("failed to close progress dialog: {e}");
        }
    }
}
