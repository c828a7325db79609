//! Severity levels and thresholds.
//!
//! Ordinals follow the conventional numbering where a larger number is more
//! severe: `CRITICAL=50`, `ERROR=40`, `WARNING=30`, `INFO=20`, `DEBUG=10`.

use crate::error::{Result, UnknownLevelSnafu};
use std::fmt;
use tracing::Metadata;

/// Target carried by `CRITICAL` records, which `tracing` has no level for.
/// They are emitted at `ERROR` under this target.
pub const CRITICAL_TARGET: &str = "quicklogs::critical";

/// Severity of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    pub fn ordinal(self) -> u32 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
        }
    }

    /// Upper-case name as it appears in the `[LEVEL]` field.
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Level> {
        Level::ALL.into_iter().find(|l| l.ordinal() == ordinal)
    }

    /// Level of a `tracing` event or span, honouring [`CRITICAL_TARGET`].
    pub fn of(metadata: &Metadata<'_>) -> Level {
        if metadata.target() == CRITICAL_TARGET {
            return Level::Critical;
        }
        Level::from(*metadata.level())
    }
}

/// TRACE has no counterpart and is folded into DEBUG.
impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum ordinal a record needs to be emitted by a logger.
///
/// Not restricted to the named levels: any ordinal is accepted, `0` lets
/// every record through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(pub u32);

impl Threshold {
    pub fn allows(self, level: Level) -> bool {
        level.ordinal() >= self.0
    }

    /// Parse a level name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Threshold> {
        let ordinal = match name.trim().to_uppercase().as_str() {
            "CRITICAL" | "FATAL" => 50,
            "ERROR" => 40,
            "WARNING" | "WARN" => 30,
            "INFO" => 20,
            "DEBUG" => 10,
            "NOTSET" => 0,
            _ => return UnknownLevelSnafu { name }.fail(),
        };
        Ok(Threshold(ordinal))
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(Level::Info.ordinal())
    }
}

impl From<Level> for Threshold {
    fn from(level: Level) -> Self {
        Threshold(level.ordinal())
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Level::from_ordinal(self.0) {
            Some(level) => f.write_str(level.name()),
            None if self.0 == 0 => f.write_str("NOTSET"),
            None => write!(f, "Level {}", self.0),
        }
    }
}

/// An explicitly supplied level.
///
/// Ordinals are taken as-is; names go through [`Threshold::from_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelArg {
    Ordinal(u32),
    Name(String),
}

impl LevelArg {
    pub fn to_threshold(&self) -> Result<Threshold> {
        match self {
            LevelArg::Ordinal(n) => Ok(Threshold(*n)),
            LevelArg::Name(name) => Threshold::from_name(name),
        }
    }
}

impl From<Level> for LevelArg {
    fn from(level: Level) -> Self {
        LevelArg::Ordinal(level.ordinal())
    }
}

impl From<u32> for LevelArg {
    fn from(ordinal: u32) -> Self {
        LevelArg::Ordinal(ordinal)
    }
}

impl From<&str> for LevelArg {
    fn from(name: &str) -> Self {
        LevelArg::Name(name.to_string())
    }
}

impl From<String> for LevelArg {
    fn from(name: String) -> Self {
        LevelArg::Name(name)
    }
}
