// SPDX-License-Identifier: Apache-2.0 OR MIT
// Process-wide registry for the two severity-channel sinks

use crate::color::Color;
use crate::config::LogConfig;
use crate::console::{self, Handle};
use crate::severity::{Channel, Severity};
use crate::sink::Sink;
use std::os::fd::AsRawFd;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

// Declared high-before-low so teardown drops the sinks in reverse order
// of construction.
struct Channels {
    high: Arc<Sink>,
    low: Arc<Sink>,
}

/// Holds the two installed sinks and the severity threshold.
///
/// Construct once at process start, before user code logs; drop once at
/// process end. When the process's error-output handle is not a real OS
/// file or console, the registry comes up inert: every operation is a
/// no-op and nothing crashes.
pub struct Registry {
    channels: Option<Channels>,
    threshold: AtomicU8,
}

impl Registry {
    /// Build a registry against the process's stderr with defaults
    pub fn new() -> Registry {
        Self::with_config(LogConfig::default())
    }

    /// Build a registry against the process's stderr.
    ///
    /// The handle is validated first; an invalid or unreal handle (e.g.
    /// stderr redirected to a closed descriptor) yields an inert
    /// registry. Each sink gets its own duplicate of the descriptor so
    /// the original remains untouched for restoration.
    pub fn with_config(config: LogConfig) -> Registry {
        let stderr = std::io::stderr();
        let probe = Handle::Borrowed(stderr.as_raw_fd());
        if !console::handle_valid(probe.as_fd()) {
            return Self::inert(config.threshold);
        }
        let low_fd = nix::unistd::dup(probe.as_fd());
        let high_fd = nix::unistd::dup(probe.as_fd());
        match (low_fd, high_fd) {
            (Ok(low_fd), Ok(high_fd)) => {
                let registry = Registry {
                    channels: Some(Channels {
                        high: Arc::new(Sink::new(Handle::Owned(high_fd), config.high_color)),
                        low: Arc::new(Sink::new(Handle::Owned(low_fd), config.low_color)),
                    }),
                    threshold: AtomicU8::new(config.threshold.as_u8()),
                };
                registry.set_timestamps(config.timestamps);
                registry
            }
            _ => Self::inert(config.threshold),
        }
    }

    fn inert(threshold: Severity) -> Registry {
        Registry {
            channels: None,
            threshold: AtomicU8::new(threshold.as_u8()),
        }
    }

    /// Cheap activity check, consulted before any formatting or
    /// buffering work
    #[inline]
    pub fn is_active(&self, level: Severity) -> bool {
        self.channels.is_some() && level.as_u8() >= self.threshold.load(Ordering::Relaxed)
    }

    /// Current severity threshold
    pub fn threshold(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Relaxed)).unwrap_or(Severity::Info)
    }

    /// Change the severity threshold at runtime
    pub fn set_threshold(&self, level: Severity) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Emit one formatted line on the channel for `level`.
    /// Filtered levels and inert registries produce nothing.
    pub fn log(&self, level: Severity, args: std::fmt::Arguments<'_>) {
        if !self.is_active(level) {
            return;
        }
        if let Some(sink) = self.channel_sink(Channel::for_severity(level)) {
            sink.write(&format!("{}\n", args));
        }
    }

    /// Sink for a channel, None when the registry is inert
    pub fn sink(&self, channel: Channel) -> Option<Arc<Sink>> {
        self.channel_sink(channel).cloned()
    }

    /// Set a channel's custom color
    pub fn set_color(&self, channel: Channel, color: Color) {
        if let Some(sink) = self.channel_sink(channel) {
            sink.set_color(color);
        }
    }

    /// Get a channel's custom color (sentinel when inert)
    pub fn color(&self, channel: Channel) -> Color {
        self.channel_sink(channel)
            .map(|sink| sink.color())
            .unwrap_or(Color::NONE)
    }

    /// Enable or disable timestamp prefixes on both channels
    pub fn set_timestamps(&self, enabled: bool) {
        if let Some(channels) = &self.channels {
            channels.low.set_timestamps(enabled);
            channels.high.set_timestamps(enabled);
        }
    }

    fn channel_sink(&self, channel: Channel) -> Option<&Arc<Sink>> {
        self.channels.as_ref().map(|channels| match channel {
            Channel::Low => &channels.low,
            Channel::High => &channels.high,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// Installed process-global registry, consulted by code that cannot carry
// an explicit handle. Install-at-startup, restore-at-shutdown.
static INSTALLED: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

/// Guard for an installed registry.
///
/// Dropping it restores whatever registry was installed before, so
/// behavior after shutdown matches behavior before installation.
pub struct InstallGuard {
    previous: Option<Arc<Registry>>,
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        let mut installed = INSTALLED.write().unwrap_or_else(|p| p.into_inner());
        *installed = self.previous.take();
    }
}

/// Install `registry` as the process-global logging target, retaining
/// the previously installed one for restoration.
pub fn install(registry: Registry) -> InstallGuard {
    let registry = Arc::new(registry);
    let mut installed = INSTALLED.write().unwrap_or_else(|p| p.into_inner());
    let previous = installed.replace(registry);
    InstallGuard { previous }
}

/// The currently installed registry, if any
pub fn installed() -> Option<Arc<Registry>> {
    INSTALLED
        .read()
        .unwrap_or_else(|p| p.into_inner())
        .clone()
}
