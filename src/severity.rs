// SPDX-License-Identifier: Apache-2.0 OR MIT
// Severity levels and output channel selection

use serde::{Deserialize, Serialize};

/// Log severity levels (0-5, higher is more severe)
///
/// Threshold filtering is based solely on this ordering: a message is
/// active when `level >= threshold`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Verbose execution traces
    Trace = 0,
    /// Debug-level messages
    Debug = 1,
    /// Informational messages (default threshold)
    Info = 2,
    /// Warning conditions
    Warn = 3,
    /// Error conditions
    Error = 4,
    /// Critical conditions
    Crit = 5,
}

impl Severity {
    /// Get severity level as u8 (0-5)
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get severity name as static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Crit => "CRIT",
        }
    }

    /// Create from u8 value (returns None if invalid)
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::Trace),
            1 => Some(Severity::Debug),
            2 => Some(Severity::Info),
            3 => Some(Severity::Warn),
            4 => Some(Severity::Error),
            5 => Some(Severity::Crit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output channel - one of the two independently redirectable paths
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Low-severity channel (trace, debug, info)
    Low = 0,
    /// High-severity channel (warn, error, crit)
    High = 1,
}

impl Channel {
    /// Channel a given severity routes to
    pub const fn for_severity(severity: Severity) -> Channel {
        match severity {
            Severity::Trace | Severity::Debug | Severity::Info => Channel::Low,
            Severity::Warn | Severity::Error | Severity::Crit => Channel::High,
        }
    }

    /// Get channel name as static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Low => "low",
            Channel::High => "high",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
