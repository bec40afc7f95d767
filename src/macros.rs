// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros for convenient logging
//
// Every macro checks the threshold before touching the format arguments,
// so disabled levels cost one atomic load and a branch.

/// Log a message with trace severity
///
/// # Examples
/// ```ignore
/// ltrace!(registry, "entering state {:?}", state);
/// ```
#[macro_export]
macro_rules! ltrace {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Trace) {
            registry.log($crate::Severity::Trace, ::core::format_args!($($arg)*));
        }
    }};
}

/// Log a message with debug severity
///
/// # Examples
/// ```ignore
/// ldebug!(registry, "parsed {} records", count);
/// ```
#[macro_export]
macro_rules! ldebug {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Debug) {
            registry.log($crate::Severity::Debug, ::core::format_args!($($arg)*));
        }
    }};
}

/// Log a message with info severity
///
/// # Examples
/// ```ignore
/// linfo!(registry, "listening on {}", addr);
/// ```
#[macro_export]
macro_rules! linfo {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Info) {
            registry.log($crate::Severity::Info, ::core::format_args!($($arg)*));
        }
    }};
}

/// Log a message with warn severity (high-severity channel)
///
/// # Examples
/// ```ignore
/// lwarn!(registry, "buffer at {}% capacity", pct);
/// ```
#[macro_export]
macro_rules! lwarn {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Warn) {
            registry.log($crate::Severity::Warn, ::core::format_args!($($arg)*));
        }
    }};
}

/// Log a message with error severity (high-severity channel)
///
/// # Examples
/// ```ignore
/// lerror!(registry, "failed to open {}: {}", path, err);
/// ```
#[macro_export]
macro_rules! lerror {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Error) {
            registry.log($crate::Severity::Error, ::core::format_args!($($arg)*));
        }
    }};
}

/// Log a message with critical severity (high-severity channel)
///
/// # Examples
/// ```ignore
/// lcrit!(registry, "unrecoverable: {}", err);
/// ```
#[macro_export]
macro_rules! lcrit {
    ($registry:expr, $($arg:tt)*) => {{
        let registry = &$registry;
        if registry.is_active($crate::Severity::Crit) {
            registry.log($crate::Severity::Crit, ::core::format_args!($($arg)*));
        }
    }};
}
