// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Process-wide, thread-safe console logging sink.
//!
//! Log statements route to one of two severity channels (low: trace,
//! debug, info; high: warn, error, crit), each backed by a [`Sink`]
//! over an OS handle. Every calling thread assembles its lines in a
//! private buffer, so appends never contend; completed lines are
//! written atomically, with terminal color applied per channel and a
//! process-wide console lock keeping one thread's coloring from
//! bleeding into another's text. Either channel can be redirected at
//! runtime to a file or an externally supplied handle.
//!
//! ```no_run
//! use conlog::{linfo, lwarn, Registry};
//!
//! let registry = Registry::new();
//! linfo!(registry, "starting up");
//! lwarn!(registry, "disk at {}%", 93);
//! ```

mod color;
mod config;
mod console;
mod encoding;
mod line_buffer;
mod macros;
mod registry;
mod severity;
mod sink;

pub use color::{Color, ANSI_RESET};
pub use config::{ConfigError, LogConfig, DEFAULT_HIGH_COLOR, DEFAULT_LOW_COLOR};
pub use console::Handle;
pub use encoding::Transcoder;
pub use registry::{install, installed, InstallGuard, Registry};
pub use severity::{Channel, Severity};
pub use sink::{Sink, SinkError};
