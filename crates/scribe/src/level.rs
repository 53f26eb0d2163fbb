//! Severity levels and the severity gate.
//!
//! Six ordered levels (`trace < debug < info < warning < error < fatal`) plus
//! [`LevelFilter::Off`], which disables all logging. The build-time minimum
//! is selected with the `min-level-*` cargo features and exposed as
//! [`STATIC_MIN_LEVEL`]; a runtime threshold can narrow it further.

use crate::error::ScribeError;
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Very fine-grained tracing.
    Trace = 0,
    /// Debugging information.
    Debug = 1,
    /// Normal operational messages.
    Info = 2,
    /// Something unexpected that the program recovered from.
    Warning = 3,
    /// An operation failed.
    Error = 4,
    /// The program cannot continue.
    Fatal = 5,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Fatal,
    ];

    /// Fixed 5-byte token written into the record, space padded.
    #[inline]
    pub const fn token(self) -> &'static [u8; 5] {
        match self {
            Level::Trace => b"trace",
            Level::Debug => b"debug",
            Level::Info => b"info ",
            Level::Warning => b"warn ",
            Level::Error => b"error",
            Level::Fatal => b"fatal",
        }
    }

    /// Returns true if this level passes the build-time gate.
    ///
    /// This is a `const fn` over a constant, so a disabled call site folds
    /// away entirely.
    #[inline(always)]
    pub const fn is_enabled_static(self) -> bool {
        STATIC_MIN_LEVEL.allows(self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Minimum severity threshold, including the `Off` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LevelFilter {
    /// Everything is logged.
    #[default]
    Trace = 0,
    /// Debug and above.
    Debug = 1,
    /// Info and above.
    Info = 2,
    /// Warning and above.
    Warning = 3,
    /// Error and above.
    Error = 4,
    /// Fatal only.
    Fatal = 5,
    /// Nothing is logged.
    Off = 6,
}

impl LevelFilter {
    /// Returns true if records at `level` pass this threshold.
    #[inline(always)]
    pub const fn allows(self, level: Level) -> bool {
        level as u8 >= self as u8
    }

    /// Returns the stricter of two thresholds.
    #[inline]
    pub const fn max(self, other: LevelFilter) -> LevelFilter {
        if (self as u8) >= (other as u8) {
            self
        } else {
            other
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warning => LevelFilter::Warning,
            Level::Error => LevelFilter::Error,
            Level::Fatal => LevelFilter::Fatal,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LevelFilter::Trace),
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" | "warning" => Ok(LevelFilter::Warning),
            "error" => Ok(LevelFilter::Error),
            "fatal" => Ok(LevelFilter::Fatal),
            "none" | "off" => Ok(LevelFilter::Off),
            _ => Err(ScribeError::ParseLevel(s.to_string())),
        }
    }
}

impl FromStr for Level {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<LevelFilter>()? {
            LevelFilter::Trace => Ok(Level::Trace),
            LevelFilter::Debug => Ok(Level::Debug),
            LevelFilter::Info => Ok(Level::Info),
            LevelFilter::Warning => Ok(Level::Warning),
            LevelFilter::Error => Ok(Level::Error),
            LevelFilter::Fatal => Ok(Level::Fatal),
            LevelFilter::Off => Err(ScribeError::ParseLevel(s.to_string())),
        }
    }
}

/// Build-time minimum level, chosen by the `min-level-*` cargo features.
///
/// When several features are enabled the most restrictive one wins. With no
/// feature enabled every level is compiled in.
pub const STATIC_MIN_LEVEL: LevelFilter = if cfg!(feature = "min-level-off") {
    LevelFilter::Off
} else if cfg!(feature = "min-level-fatal") {
    LevelFilter::Fatal
} else if cfg!(feature = "min-level-error") {
    LevelFilter::Error
} else if cfg!(feature = "min-level-warn") {
    LevelFilter::Warning
} else if cfg!(feature = "min-level-info") {
    LevelFilter::Info
} else if cfg!(feature = "min-level-debug") {
    LevelFilter::Debug
} else {
    LevelFilter::Trace
};
