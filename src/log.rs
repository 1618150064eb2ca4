//! Leveled kernel logging.
//!
//! Records carry a level and a subsystem origin. Kernel builds write them
//! to COM1 (the VGA screen belongs to the terminal); host tests write them
//! to stderr.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

pub fn set_level(level: LogLevel) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

#[doc(hidden)]
pub fn _log(level: LogLevel, origin: &str, args: fmt::Arguments) {
    if level < self::level() {
        return;
    }

    #[cfg(not(test))]
    crate::serial::_print(format_args!("[{}] {}: {}\n", level.as_str(), origin, args));

    #[cfg(test)]
    std::eprintln!("[{}] {}: {}", level.as_str(), origin, args);
}

#[macro_export]
macro_rules! log_debug {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log($crate::log::LogLevel::Debug, $origin, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log($crate::log::LogLevel::Info, $origin, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log($crate::log::LogLevel::Warn, $origin, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($origin:expr, $($arg:tt)*) => {
        $crate::log::_log($crate::log::LogLevel::Error, $origin, format_args!($($arg)*))
    };
}
