//! Named pipe helpers for the progress relay.

use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::{DialogError, Result};

/// How long [`open_writer`] waits for a reader to show up.
const OPEN_ATTEMPTS: u32 = 40;
const OPEN_INTERVAL: Duration = Duration::from_millis(50);

/// Creates a FIFO readable and writable by the current user only.
pub(crate) fn create(path: &Path) -> Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| DialogError::precondition(format!("FIFO path {path:?} contains NUL")))?;

    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if rc != 0 {
        return Err(io::Error::last_os_error().into());
    }
    Ok(())
}

/// Removes a FIFO, ignoring one that is already gone.
pub(crate) fn remove(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != io::ErrorKind::NotFound
    {
        tracing::debug!("failed to remove {}: {e}", path.display());
    }
}

/// Opens the write end without blocking.
///
/// Retries while nobody has the FIFO open for reading yet. Returns `None` when
/// no reader appears or the FIFO no longer exists. Writes through the returned
/// file block while the pipe is full.
pub(crate) fn open_writer(path: &Path) -> io::Result<Option<File>> {
    for _ in 0..OPEN_ATTEMPTS {
        match try_open_writer(path) {
            Ok(file) => {
                set_blocking(&file)?;
                return Ok(Some(file));
            }
            Err(e) if e.raw_os_error() == Some(libc::ENXIO) => thread::sleep(OPEN_INTERVAL),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

fn try_open_writer(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
}

fn set_blocking(file: &File) -> io::Result<()> {
    let fd = file.as_raw_fd();
    // SAFETY: fd is owned by `file`, which stays open for both calls.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Writes `message` once someone is listening. Gives up silently when nobody
/// shows up or the FIFO is gone.
pub(crate) fn signal(path: &Path, message: &str) {
    let result = open_writer(path).and_then(|writer| match writer {
        Some(mut file) => file.write_all(message.as_bytes()),
        None => Ok(()),
    });
    if let Err(e) = result {
        tracing::debug!("failed to signal {}: {e}", path.display());
    }
}

/// Blocks until a writer opens the FIFO, then reads until it closes.
pub(crate) fn wait_for_signal(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut message = String::new();
    file.read_to_string(&mut message)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::FileTypeExt;
    use tempfile::TempDir;

    #[test]
    fn create_makes_a_fifo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");

        create(&path).unwrap();

        assert!(fs::metadata(&path).unwrap().file_type().is_fifo());
    }

    #[test]
    fn create_fails_when_path_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");
        create(&path).unwrap();

        assert!(matches!(create(&path), Err(DialogError::Io(_))));
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");
        create(&path).unwrap();

        remove(&path);
        remove(&path);

        assert!(!path.exists());
    }

    #[test]
    fn open_writer_returns_none_for_missing_fifo() {
        let dir = TempDir::new().unwrap();
        assert!(open_writer(&dir.path().join("missing")).unwrap().is_none());
    }

    #[test]
    fn signal_without_reader_gives_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");
        create(&path).unwrap();

        signal(&path, "done\n");
    }

    #[test]
    fn signal_reaches_waiting_reader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");
        create(&path).unwrap();

        let reader_path = path.clone();
        let reader = thread::spawn(move || wait_for_signal(&reader_path).unwrap());

        // Retries until the reader thread has the FIFO open.
        let mut writer = open_writer(&path).unwrap().unwrap();
        writer.write_all(b"done\n").unwrap();
        drop(writer);

        assert_eq!(reader.join().unwrap(), "done\n");
    }

    #[test]
    fn writer_blocks_instead_of_failing_when_pipe_is_full() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe");
        create(&path).unwrap();

        let reader_path = path.clone();
        let reader = thread::spawn(move || {
            let mut file = File::open(&reader_path).unwrap();
            // Let the writer fill the pipe before draining it.
            thread::sleep(Duration::from_millis(200));
            let mut received = Vec::new();
            file.read_to_end(&mut received).unwrap();
            received
        });

        let payload = vec![b'7'; 256 * 1024];
        let mut writer = open_writer(&path).unwrap().unwrap();
        writer.write_all(&payload).unwrap();
        drop(writer);

        assert_eq!(reader.join().unwrap().len(), payload.len());
    }
}
