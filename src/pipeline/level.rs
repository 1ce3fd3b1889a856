use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical log level. Every input spelling maps onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Map a free-form level string onto a canonical level.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognized input falls back to `Info`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ERROR" | "ERR" | "E" | "FATAL" | "CRITICAL" => Level::Error,
            "WARN" | "WARNING" | "W" => Level::Warn,
            "INFO" | "I" | "INFORMATION" => Level::Info,
            "DEBUG" | "D" | "TRACE" => Level::Debug,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
