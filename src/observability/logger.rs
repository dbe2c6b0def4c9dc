//! Structured JSON-line logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, unbuffered, always to stderr (stdout carries responses)
//! - Lines below the `SHELFDB_LOG` threshold are dropped

use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

use serde_json::Value;

/// Environment variable holding the minimum severity (`trace`..`fatal`)
pub const LOG_LEVEL_ENV: &str = "SHELFDB_LOG";

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Case-insensitive parse of a level name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Severity::Trace),
            "info" => Some(Severity::Info),
            "warn" | "warning" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static THRESHOLD: OnceLock<Severity> = OnceLock::new();

fn threshold() -> Severity {
    *THRESHOLD.get_or_init(|| {
        std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| Severity::parse(&v))
            .unwrap_or(Severity::Info)
    })
}

/// Structured logger
pub struct Logger;

impl Logger {
    /// Logs an event with the given severity and fields.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < threshold() {
            return;
        }
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = Self::format_line(severity, event, fields);
        // Logging failures never fail the operation being logged
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":");
        output.push_str(&json_string(event));
        output.push_str(",\"severity\":");
        output.push_str(&json_string(severity.as_str()));

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        for (key, value) in sorted {
            output.push(',');
            output.push_str(&json_string(key));
            output.push(':');
            output.push_str(&json_string(value));
        }

        output.push_str("}\n");
        output
    }
}

fn json_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
