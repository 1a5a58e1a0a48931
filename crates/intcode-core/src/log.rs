//! Leveled stderr logging with macros.
//!
//! Messages are written to stderr with optional timestamp and level tag,
//! coloured when the terminal supports it. All macros are silent under
//! `cfg(test)`.

use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Log level for filtering messages.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

impl Level {
    fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            _ => Level::Error,
        }
    }
}

pub static SHOW_TIMESTAMP: AtomicBool = AtomicBool::new(true);
pub static SHOW_TYPE: AtomicBool = AtomicBool::new(true);
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

/// Set the lowest level that is still printed.
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn min_level() -> Level {
    Level::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

pub fn enabled(level: Level) -> bool {
    level >= min_level()
}

/// Splits seconds since the Unix epoch into (hours, minutes, seconds) of the day.
fn time_of_day(secs: u64) -> (u64, u64, u64) {
    ((secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

/// Internal logging function. Use the `debug!`, `info!`, `warn!`, or `error!` macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let (hours, mins, s) = time_of_day(now.as_secs());
    let millis = now.subsec_millis();

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let mut spec = ColorSpec::new();
    match level {
        Level::Debug => {
            spec.set_fg(Some(Color::Cyan));
        }
        Level::Warn => {
            spec.set_fg(Some(Color::Yellow)).set_bold(true);
        }
        Level::Error => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
        Level::Info => {
            spec.clear();
        }
    }
    let _ = stderr.set_color(&spec);

    if SHOW_TIMESTAMP.load(Ordering::Relaxed) {
        let _ = write!(stderr, "{:02}:{:02}:{:02}.{:03} ", hours, mins, s, millis);
    }
    if SHOW_TYPE.load(Ordering::Relaxed) {
        let _ = write!(stderr, "[{:5}] ", level);
    }
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) && $crate::log::enabled($crate::log::Level::Debug) {
            $crate::log::log($crate::log::Level::Debug, &format!($($arg)*))
        }
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Info, &format!($($arg)*))
        }
    }};
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Warn, &format!($($arg)*))
        }
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Error, &format!($($arg)*))
        }
    }};
}
