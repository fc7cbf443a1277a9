//! Audit logger implementation.
//!
//! Thread-safe, append-only logging with:
//! - Buffered file I/O
//! - Severity-based filtering
//! - Two output formats (structured text, JSON Lines)
//!
//! Program output owns stdout, so the console echo goes to stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::entry::{AuditEntry, Severity};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the audit logger.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Audit log file; `None` for console-only logging.
    pub log_path: Option<PathBuf>,
    /// Minimum severity to log.
    pub min_severity: Severity,
    /// Also print every entry to stderr.
    pub echo_stderr: bool,
    pub format: AuditFormat,
}

/// Output format for audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFormat {
    /// Structured text lines.
    #[default]
    Text,
    /// JSON Lines format.
    JsonLines,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            min_severity: Severity::Info,
            echo_stderr: false,
            format: AuditFormat::Text,
        }
    }
}

// =============================================================================
// Audit Logger
// =============================================================================

/// Thread-safe audit logger with optional file persistence.
#[derive(Debug)]
pub struct AuditLogger {
    config: AuditConfig,
    writer: Mutex<Option<BufWriter<File>>>,
    sequence: AtomicU64,
}

impl AuditLogger {
    /// Create a logger, opening the log file in append mode when one is
    /// configured.
    pub fn new(config: AuditConfig) -> io::Result<Self> {
        let writer = match &config.log_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        Ok(Self {
            config,
            writer: Mutex::new(writer),
            sequence: AtomicU64::new(0),
        })
    }

    /// Render `entry` as one line in the configured format, newline included.
    fn render(&self, seq: u64, entry: &AuditEntry) -> io::Result<String> {
        match self.config.format {
            AuditFormat::Text => Ok(format!("{:08} | {}\n", seq, entry.format_line())),
            AuditFormat::JsonLines => {
                let json = entry.to_json().map_err(io::Error::from)?;
                Ok(format!("{}\n", json))
            }
        }
    }

    /// Log an audit entry.
    pub fn log(&self, entry: AuditEntry) -> io::Result<()> {
        if entry.severity < self.config.min_severity {
            return Ok(());
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let line = self.render(seq, &entry)?;

        if let Ok(mut guard) = self.writer.lock() {
            if let Some(ref mut w) = *guard {
                w.write_all(line.as_bytes())?;
                w.flush()?;
            }
        }

        if self.config.echo_stderr {
            eprint!("{}", line);
        }

        Ok(())
    }

    /// Flush the log buffer.
    pub fn flush(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.writer.lock() {
            if let Some(ref mut w) = *guard {
                w.flush()?;
            }
        }
        Ok(())
    }

    /// Number of entries written so far.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}
