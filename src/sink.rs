// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output sink: owns one handle, multiplexes per-thread line buffers

use crate::color::{Color, ANSI_RESET};
use crate::console::{self, Handle};
use crate::encoding::Transcoder;
use crate::line_buffer::{LineBuffer, LINE_TERMINATOR};
use std::borrow::Cow;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use thread_local::ThreadLocal;

/// Errors reported by the flush and redirection paths
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open log file {path}: {source}")]
    Redirect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write failed: {0}")]
    Write(#[from] nix::Error),
}

struct HandleState {
    handle: Handle,
}

/// One output channel's sink.
///
/// Each calling thread gets its own lazily-created [`LineBuffer`], so
/// `write` touches no shared state until a full line flushes. The handle
/// and its ownership bit sit behind a short-lived state lock; color and
/// formatting flags are plain atomics, so a `redirect` racing a `write`
/// resolves at line granularity (a line buffered before the redirect
/// flushes to the new handle) rather than tearing mid-line.
pub struct Sink {
    state: Mutex<HandleState>,
    custom_color: AtomicU16,
    use_color: AtomicBool,
    prepend_time: AtomicBool,
    convert: Option<Transcoder>,
    buffers: ThreadLocal<RefCell<LineBuffer>>,
}

impl Sink {
    /// Create a sink over `handle` with the given custom color.
    ///
    /// Color output is enabled only when the handle is an interactive
    /// terminal.
    pub fn new(handle: Handle, color: Color) -> Self {
        let use_color = console::is_terminal(handle.as_fd());
        Self {
            state: Mutex::new(HandleState { handle }),
            custom_color: AtomicU16::new(color.bits()),
            use_color: AtomicBool::new(use_color),
            prepend_time: AtomicBool::new(true),
            convert: Transcoder::from_locale(),
            buffers: ThreadLocal::new(),
        }
    }

    /// Current custom color
    pub fn color(&self) -> Color {
        Color::from_bits(self.custom_color.load(Ordering::Relaxed))
    }

    /// Change the custom color. Takes effect on the next flush; text
    /// already buffered keeps whatever color applies when it flushes.
    pub fn set_color(&self, color: Color) {
        self.custom_color.store(color.bits(), Ordering::Relaxed);
    }

    /// Enable or disable the timestamp prefix
    pub fn set_timestamps(&self, enabled: bool) {
        self.prepend_time.store(enabled, Ordering::Relaxed);
    }

    /// Whether lines currently go out colorized
    pub fn color_enabled(&self) -> bool {
        self.use_color.load(Ordering::Relaxed)
    }

    /// Append `message` to the calling thread's line buffer.
    ///
    /// Every embedded newline flushes exactly one line; a trailing
    /// fragment without a newline stays buffered for the next call.
    /// Write errors are swallowed; use [`Sink::write_checked`] to
    /// observe them.
    pub fn write(&self, message: &str) {
        let _ = self.write_checked(message);
    }

    /// Like [`Sink::write`], reporting the last flush failure if any.
    /// Failed lines are still consumed: the next line starts clean.
    pub fn write_checked(&self, message: &str) -> Result<(), SinkError> {
        let timestamps = self.prepend_time.load(Ordering::Relaxed);
        let cell = self.buffer();
        let mut buffer = cell.borrow_mut();

        let mut last_err = None;
        {
            let mut emit = |line: &mut String| {
                if let Err(e) = self.emit_line(line) {
                    last_err = Some(e);
                }
            };
            let mut rest = message;
            while let Some(pos) = rest.find('\n') {
                buffer.append(&rest[..pos], timestamps, &mut emit);
                buffer.flush(&mut emit);
                rest = &rest[pos + 1..];
            }
            buffer.append(rest, timestamps, &mut emit);
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Flush the calling thread's buffered line.
    ///
    /// An empty buffer still writes a bare terminator: an explicit flush
    /// of nothing is a genuine zero-length log line.
    pub fn flush(&self) -> Result<(), SinkError> {
        let cell = self.buffer();
        let mut buffer = cell.borrow_mut();
        let mut result = Ok(());
        buffer.flush(&mut |line| result = self.emit_line(line));
        result
    }

    /// Flush only if the calling thread has a partial line pending
    fn flush_pending(&self) -> Result<(), SinkError> {
        let cell = self.buffer();
        let mut buffer = cell.borrow_mut();
        if buffer.is_empty() {
            return Ok(());
        }
        let mut result = Ok(());
        buffer.flush(&mut |line| result = self.emit_line(line));
        result
    }

    /// Redirect output to a file, opened append-only with shared access.
    ///
    /// On success the calling thread's pending line is flushed to the
    /// old handle, the old handle is closed if this sink owned it, and
    /// color is disabled (file targets are never colorized). On failure
    /// the sink is left fully untouched.
    pub fn redirect_path(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        let path = path.as_ref();
        let fd = console::open_append(path).map_err(|source| SinkError::Redirect {
            path: path.to_path_buf(),
            source,
        })?;
        let _ = self.flush_pending();
        {
            let mut state = self.lock_state();
            state.handle = Handle::Owned(fd);
        }
        self.use_color.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Redirect output to an externally owned handle.
    ///
    /// The handle is never closed by this sink. Terminal detection runs
    /// again to decide whether color is re-enabled, and regular files
    /// are positioned at end-of-file.
    pub fn redirect_handle(&self, handle: Handle) {
        let _ = self.flush_pending();
        let is_tty = console::is_terminal(handle.as_fd());
        if console::is_regular_file(handle.as_fd()) {
            console::seek_end(handle.as_fd());
        }
        {
            let mut state = self.lock_state();
            state.handle = handle;
        }
        self.use_color.store(is_tty, Ordering::Relaxed);
    }

    /// Raw descriptor currently written to
    pub fn raw_handle(&self) -> std::os::fd::RawFd {
        self.lock_state().handle.raw()
    }

    fn buffer(&self) -> &RefCell<LineBuffer> {
        self.buffers.get_or(|| RefCell::new(LineBuffer::new()))
    }

    fn lock_state(&self) -> MutexGuard<'_, HandleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write one completed line to the handle.
    ///
    /// Colorized: the whole set-color / write / restore / terminator
    /// sequence runs under the process-wide console lock so no other
    /// thread's coloring can interleave, and the terminator lands before
    /// the lock is released. Uncolored: the terminator is appended to
    /// the line and everything goes out in one unlocked write.
    fn emit_line(&self, line: &mut String) -> Result<(), SinkError> {
        if self.use_color.load(Ordering::Relaxed) {
            let _console = console::console_lock();
            let state = self.lock_state();
            let fd = state.handle.as_fd();
            // an empty line gets the bare terminator, no color wrapper
            let sequence = if line.is_empty() {
                None
            } else {
                self.color().ansi_sequence()
            };
            if let Some(sequence) = &sequence {
                console::write_all(fd, sequence.as_bytes())?;
            }
            console::write_all(fd, &self.convert_line(line))?;
            if sequence.is_some() {
                console::write_all(fd, ANSI_RESET.as_bytes())?;
            }
            console::write_all(fd, LINE_TERMINATOR.as_bytes())?;
        } else {
            line.push_str(LINE_TERMINATOR);
            let state = self.lock_state();
            console::write_all(state.handle.as_fd(), line.as_bytes())?;
        }
        Ok(())
    }

    fn convert_line<'a>(&self, line: &'a str) -> Cow<'a, [u8]> {
        match &self.convert {
            Some(transcoder) => transcoder.transcode(line),
            None => Cow::Borrowed(line.as_bytes()),
        }
    }

    #[cfg(test)]
    pub(crate) fn force_color_enabled(&self, enabled: bool) {
        self.use_color.store(enabled, Ordering::Relaxed);
    }
}
