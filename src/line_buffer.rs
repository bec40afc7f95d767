// SPDX-License-Identifier: Apache-2.0 OR MIT
// Per-thread line assembly with a bounded length cap

use chrono::Timelike;
use std::fmt::Write;

/// Maximum line content per flush, excluding the timestamp prefix.
/// Appends beyond this split into multiple flushed lines, bounding both
/// memory and the size of a single write syscall.
pub(crate) const LINE_LIMIT: usize = 1000;

/// Line terminator appended on flush
pub(crate) const LINE_TERMINATOR: &str = "\n";

/// Accumulator assembling one logical log line for one thread.
///
/// Owned exclusively by the calling thread, so `append` never takes a
/// lock. The emit callback receives each completed line; the buffer is
/// reset and reused afterwards.
pub(crate) struct LineBuffer {
    text: String,
    prefix_len: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            prefix_len: 0,
        }
    }

    /// True when no line is being assembled
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Accumulate `input`, emitting full lines whenever the content cap
    /// is reached. Each emitted chunk gets its own timestamp prefix when
    /// `timestamps` is set.
    pub fn append(&mut self, input: &str, timestamps: bool, emit: &mut dyn FnMut(&mut String)) {
        if input.is_empty() {
            return;
        }
        if timestamps && self.text.is_empty() {
            self.stamp();
        }
        let mut rest = input;
        while self.content_len() + rest.len() > LINE_LIMIT {
            let room = LINE_LIMIT - self.content_len();
            // never split inside a multi-byte character
            let cut = floor_char_boundary(rest, room);
            self.text.push_str(&rest[..cut]);
            rest = &rest[cut..];
            self.emit_and_reset(emit);
            if timestamps && !rest.is_empty() {
                self.stamp();
            }
        }
        self.text.push_str(rest);
    }

    /// Emit the accumulated line and reset.
    ///
    /// An empty buffer still emits: a standalone newline is a genuine
    /// zero-length log line and must reach the output.
    pub fn flush(&mut self, emit: &mut dyn FnMut(&mut String)) {
        self.emit_and_reset(emit);
    }

    fn emit_and_reset(&mut self, emit: &mut dyn FnMut(&mut String)) {
        emit(&mut self.text);
        self.text.clear();
        self.prefix_len = 0;
    }

    /// Accumulated bytes excluding the timestamp prefix
    fn content_len(&self) -> usize {
        self.text.len() - self.prefix_len
    }

    /// Prepend `HH:MM:SS.mmm [thread-id] ` to the line being assembled
    fn stamp(&mut self) {
        let now = chrono::Local::now();
        let _ = write!(
            self.text,
            "{:02}:{:02}:{:02}.{:03} [{:08x}] ",
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            thread_id()
        );
        self.prefix_len = self.text.len();
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Current thread identity for the line prefix (truncated to u32)
pub(crate) fn thread_id() -> u32 {
    #[cfg(target_os = "linux")]
    {
        unsafe { libc::gettid() as u32 }
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "HH:MM:SS.mmm [xxxxxxxx] "
    const PREFIX_LEN: usize = 24;

    fn strip_prefix(line: &str) -> &str {
        assert!(line.len() >= PREFIX_LEN, "line too short for prefix: {line:?}");
        let (prefix, content) = line.split_at(PREFIX_LEN);
        assert_eq!(&prefix[2..3], ":");
        assert_eq!(&prefix[5..6], ":");
        assert_eq!(&prefix[8..9], ".");
        assert_eq!(&prefix[12..14], " [");
        assert_eq!(&prefix[22..24], "] ");
        content
    }

    #[test]
    fn test_single_line_with_prefix() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();

        buffer.append("hello", true, &mut |text| lines.push(text.clone()));
        assert!(lines.is_empty());
        buffer.flush(&mut |text| lines.push(text.clone()));

        assert_eq!(lines.len(), 1);
        assert_eq!(strip_prefix(&lines[0]), "hello");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_append_pieces_form_one_line() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        buffer.append("ab", true, &mut emit);
        buffer.append("c", true, &mut emit);
        buffer.flush(&mut emit);

        assert_eq!(lines.len(), 1);
        assert_eq!(strip_prefix(&lines[0]), "abc");
    }

    #[test]
    fn test_no_prefix_when_timestamps_disabled() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        buffer.append("plain", false, &mut emit);
        buffer.flush(&mut emit);
        assert_eq!(lines, vec!["plain".to_string()]);
    }

    #[test]
    fn test_overflow_splits_at_cap() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        let input = "a".repeat(2500);
        buffer.append(&input, true, &mut emit);
        buffer.flush(&mut emit);

        assert_eq!(lines.len(), 3);
        let contents: Vec<&str> = lines.iter().map(|l| strip_prefix(l)).collect();
        assert_eq!(contents[0].len(), LINE_LIMIT);
        assert_eq!(contents[1].len(), LINE_LIMIT);
        assert_eq!(contents[2].len(), 500);
        assert_eq!(contents.concat(), input);
    }

    #[test]
    fn test_overflow_reconstruction_without_timestamps() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        let input = "x".repeat(3001);
        buffer.append(&input, false, &mut emit);
        buffer.flush(&mut emit);

        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(line.len() <= LINE_LIMIT);
        }
        assert_eq!(lines.concat(), input);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        // 999 bytes of ASCII followed by a 2-byte character straddling
        // the cap boundary
        let input = format!("{}é and the rest", "a".repeat(999));
        buffer.append(&input, false, &mut emit);
        buffer.flush(&mut emit);

        assert!(lines.iter().all(|l| std::str::from_utf8(l.as_bytes()).is_ok()));
        assert_eq!(lines.concat(), input);
    }

    #[test]
    fn test_empty_flush_emits_empty_line() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        buffer.flush(&mut emit);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_buffer_reuse_after_flush() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        let mut emit = |text: &mut String| lines.push(text.clone());

        buffer.append("first", false, &mut emit);
        buffer.flush(&mut emit);
        buffer.append("second", false, &mut emit);
        buffer.flush(&mut emit);

        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_thread_id_stable_within_thread() {
        assert_eq!(thread_id(), thread_id());
    }
}
