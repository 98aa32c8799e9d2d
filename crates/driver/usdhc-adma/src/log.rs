//! Leveled logging for descriptor table construction.
//!
//! The crate has no output device of its own. The embedding driver registers
//! a sink with [`set_log_fn`]; until then every message is silently
//! discarded. Messages more verbose than [`MAX_LOG_LEVEL`] are dropped before
//! the sink is called.
//!
//! [`MAX_LOG_LEVEL`]: crate::config::MAX_LOG_LEVEL

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::config::MAX_LOG_LEVEL;

// ---------------------------------------------------------------------------
// Log levels — lower = more severe
// ---------------------------------------------------------------------------

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Error: an operation failed.
    Error = 1,
    /// Warning: a request was rejected or looks suspicious.
    Warn = 2,
    /// Informational: high-level progress messages.
    Info = 3,
    /// Debug: one line per built or parsed table.
    Debug = 4,
    /// Trace: one line per descriptor.
    Trace = 5,
}

impl LogLevel {
    /// Returns the human-readable name (fixed-width for aligned output).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// Parses a lowercase level name (`"error"`, `"warn"`, ...).
    #[must_use]
    pub const fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"error" => Some(Self::Error),
            b"warn" => Some(Self::Warn),
            b"info" => Some(Self::Info),
            b"debug" => Some(Self::Debug),
            b"trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sink registration
// ---------------------------------------------------------------------------

/// The signature of the registered log sink.
pub type LogFn = fn(LogLevel, fmt::Arguments<'_>);

fn null_log(_level: LogLevel, _args: fmt::Arguments<'_>) {}

static LOG_FN: AtomicPtr<()> = AtomicPtr::new(null_log as *mut ());

/// Registers the log sink.
///
/// # Safety
///
/// The provided function must be safe to call from any context the
/// builder runs in, including concurrently from several threads. May be
/// called more than once; later registrations replace earlier ones.
pub unsafe fn set_log_fn(f: LogFn) {
    LOG_FN.store(f as *mut (), Ordering::Release);
}

/// Loads the current sink from the atomic pointer.
#[inline]
fn load_log_fn() -> LogFn {
    let ptr = LOG_FN.load(Ordering::Acquire);
    // SAFETY: Only valid `LogFn` pointers (or the initial `null_log`) are
    // ever stored into LOG_FN.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

/// Implementation detail for [`adma_log!`]. Not public API.
#[doc(hidden)]
pub fn _log(level: LogLevel, args: fmt::Arguments<'_>) {
    if level <= MAX_LOG_LEVEL {
        load_log_fn()(level, args);
    }
}

/// Logs a message at the given level.
#[macro_export]
macro_rules! adma_log {
    ($level:expr, $($arg:tt)*) => {
        $crate::log::_log($level, format_args!($($arg)*))
    };
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! adma_warn {
    ($($arg:tt)*) => { $crate::adma_log!($crate::log::LogLevel::Warn, $($arg)*) };
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! adma_debug {
    ($($arg:tt)*) => { $crate::adma_log!($crate::log::LogLevel::Debug, $($arg)*) };
}

/// Logs a trace-level message.
#[macro_export]
macro_rules! adma_trace {
    ($($arg:tt)*) => { $crate::adma_log!($crate::log::LogLevel::Trace, $($arg)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static CAPTURED: Mutex<Vec<(LogLevel, String)>> = Mutex::new(Vec::new());

    fn capture(level: LogLevel, args: fmt::Arguments<'_>) {
        CAPTURED.lock().unwrap().push((level, args.to_string()));
    }

    #[test]
    fn level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn level_names_are_fixed_width() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(level.name().len(), 5);
        }
    }

    #[test]
    fn from_name_parses_known_levels() {
        assert_eq!(LogLevel::from_name(b"warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name(b"trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name(b"loud"), None);
    }

    fn captured(level: LogLevel, msg: &str) -> bool {
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m == msg)
    }

    #[test]
    fn registered_sink_receives_messages() {
        // SAFETY: `capture` only locks a std mutex.
        unsafe { set_log_fn(capture) };
        crate::adma_warn!("sink check {}", 7);
        assert_eq!(
            captured(LogLevel::Warn, "sink check 7"),
            LogLevel::Warn <= MAX_LOG_LEVEL
        );
    }

    #[test]
    fn trace_reaches_sink_unless_capped() {
        // SAFETY: `capture` only locks a std mutex.
        unsafe { set_log_fn(capture) };
        crate::adma_trace!("trace check {}", 9);
        assert_eq!(
            captured(LogLevel::Trace, "trace check 9"),
            LogLevel::Trace <= MAX_LOG_LEVEL
        );
    }
}
