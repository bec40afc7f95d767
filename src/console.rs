// SPDX-License-Identifier: Apache-2.0 OR MIT
// OS handle capability layer and the process-wide console lock

use nix::unistd;
use std::fs::OpenOptions;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Output handle for a sink.
///
/// Owned handles are closed when the handle is dropped (sink destruction
/// or a later redirection); borrowed handles never are. Exactly one sink
/// holds the close-on-destruction bit for a given descriptor at a time.
pub enum Handle {
    Owned(OwnedFd),
    Borrowed(RawFd),
}

impl Handle {
    /// Borrow the underlying descriptor for a write/query
    pub fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            Handle::Owned(fd) => fd.as_fd(),
            // SAFETY: borrowed handles are supplied by the caller, who
            // keeps them open for the lifetime of the sink (the
            // redirect-to-handle contract).
            Handle::Borrowed(raw) => unsafe { BorrowedFd::borrow_raw(*raw) },
        }
    }

    /// True when the sink must close this handle
    pub fn is_owned(&self) -> bool {
        matches!(self, Handle::Owned(_))
    }

    /// Raw descriptor value
    pub fn raw(&self) -> RawFd {
        match self {
            Handle::Owned(fd) => fd.as_raw_fd(),
            Handle::Borrowed(raw) => *raw,
        }
    }
}

/// Open `path` for append-only writing, creating it if missing.
///
/// Append mode positions every write at end-of-file, so pre-existing
/// content is preserved.
pub fn open_append(path: &Path) -> std::io::Result<OwnedFd> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file.into())
}

/// Write the whole buffer, retrying on short writes and EINTR
pub fn write_all(fd: BorrowedFd<'_>, mut buf: &[u8]) -> nix::Result<()> {
    while !buf.is_empty() {
        match unistd::write(fd, buf) {
            Ok(0) => return Err(nix::errno::Errno::EIO),
            Ok(n) => buf = &buf[n..],
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Whether the descriptor refers to an interactive terminal
pub fn is_terminal(fd: BorrowedFd<'_>) -> bool {
    unistd::isatty(fd).unwrap_or(false)
}

/// Whether the descriptor refers to a regular file
pub fn is_regular_file(fd: BorrowedFd<'_>) -> bool {
    nix::sys::stat::fstat(fd)
        .map(|st| (st.st_mode & libc::S_IFMT) == libc::S_IFREG)
        .unwrap_or(false)
}

/// Whether the descriptor is a real, open OS handle
pub fn handle_valid(fd: BorrowedFd<'_>) -> bool {
    nix::sys::stat::fstat(fd).is_ok()
}

/// Move the file position to end-of-file (ignored for non-seekable fds)
pub fn seek_end(fd: BorrowedFd<'_>) {
    let _ = unistd::lseek(fd, 0, unistd::Whence::SeekEnd);
}

// The terminal's current color attribute is global to the console, not
// per-handle, so every colored set/write/restore sequence from any sink
// must serialize through this one lock.
static CONSOLE_MUTEX: Mutex<()> = Mutex::new(());

/// Acquire the process-wide console lock.
///
/// A panic while holding the lock must not disable logging for the rest
/// of the process, so poisoning is ignored.
pub fn console_lock() -> MutexGuard<'static, ()> {
    CONSOLE_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
