//! Audit entry types and structures.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Serializer};

use crate::core::{BoundingBox, InterpreterConfig, ShoalError};

// =============================================================================
// Core Types
// =============================================================================

/// Severity level for audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Informational message (normal operation).
    Info = 0,
    /// Warning (potential issue, operation continued).
    Warning = 1,
    /// Error (operation failed).
    Error = 2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INFO" | "INFORMATION" => Some(Severity::Info),
            "WARN" | "WARNING" => Some(Severity::Warning),
            "ERROR" | "ERR" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
    /// Still in progress (a run that has started but not finished).
    Pending,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Failure => "FAILURE",
            Outcome::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Category of audited action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    /// Loading program text.
    Load,
    /// Program execution.
    Execute,
    /// Configuration changes.
    Config,
    /// System-level events.
    System,
    Custom(String),
}

impl ActionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ActionCategory::Load => "LOAD",
            ActionCategory::Execute => "EXECUTE",
            ActionCategory::Config => "CONFIG",
            ActionCategory::System => "SYSTEM",
            ActionCategory::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Audit Entry
// =============================================================================

/// An immutable audit log entry.
///
/// Captures WHO did WHAT to WHICH entity, WHEN, and with what OUTCOME.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: u64,
    /// UTC timestamp (milliseconds since epoch).
    #[serde(rename = "timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp_ms: u64,
    pub severity: Severity,
    pub category: ActionCategory,
    /// Action performed (e.g. "RUN_START", "HALT").
    pub action: String,
    /// Type of entity involved (e.g. "Program").
    pub entity_type: String,
    pub entity_id: String,
    pub outcome: Outcome,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

fn serialize_timestamp<S: Serializer>(timestamp_ms: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_8601(*timestamp_ms))
}

impl AuditEntry {
    /// Create a new audit entry with required fields.
    pub fn new(
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            id: COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst),
            timestamp_ms,
            severity: Severity::Info,
            category: ActionCategory::System,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            outcome: Outcome::Success,
            description: description.into(),
            correlation_id: None,
            duration_us: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Tie related entries (one run) together.
    pub fn with_correlation(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_duration_us(mut self, us: u64) -> Self {
        self.duration_us = Some(us);
        self
    }

    /// Add metadata key-value pair.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    // =========================================================================
    // Run lifecycle events
    // =========================================================================

    /// A program was loaded and its run state initialized.
    pub fn run_started(program: &str, bounds: BoundingBox, config: &InterpreterConfig) -> Self {
        let (width, height) = (bounds.wrap_width(), bounds.wrap_height());
        Self::new("RUN_START", "Program", program, format!("Initialized {}x{} codebox", width, height))
            .with_category(ActionCategory::Execute)
            .with_outcome(Outcome::Pending)
            .with_meta("round_values", config.round_values)
            .with_meta("arbitrary_jump", config.arbitrary_jump)
            .with_meta("exact_fractions", config.exact_fractions)
            .with_meta("max_steps", config.max_steps.map_or_else(|| "none".to_string(), |n| n.to_string()))
    }

    /// The program reached `;`.
    pub fn run_halted(program: &str, steps: u64, output_len: usize) -> Self {
        Self::new("HALT", "Program", program, format!("Halted after {} steps", steps))
            .with_category(ActionCategory::Execute)
            .with_meta("steps", steps)
            .with_meta("output_chars", output_len)
    }

    /// The run was aborted by an error.
    pub fn run_failed(program: &str, steps: u64, error: &ShoalError) -> Self {
        let mut entry = Self::new("FAIL", "Program", program, error.to_string().replace('\n', " "))
            .with_category(ActionCategory::Execute)
            .with_severity(Severity::Error)
            .with_outcome(Outcome::Failure)
            .with_meta("steps", steps)
            .with_meta("code", error.code())
            .with_meta("error_category", error.category());
        if let Some(position) = error.location().and_then(|loc| loc.position) {
            entry = entry.with_meta("position", position);
        }
        entry
    }

    /// Format timestamp as ISO 8601.
    pub fn timestamp_iso(&self) -> String {
        iso_8601(self.timestamp_ms)
    }

    /// Format as a single structured log line.
    ///
    /// Format: `TIMESTAMP | SEVERITY | CATEGORY | ACTION | ENTITY | OUTCOME | DESCRIPTION [metadata]`
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "{} | {:5} | {:7} | {:9} | {}:{} | {:7} | {}",
            self.timestamp_iso(),
            self.severity.as_str(),
            self.category.as_str(),
            self.action,
            self.entity_type,
            self.entity_id,
            self.outcome.as_str(),
            self.description,
        );

        if let Some(us) = self.duration_us {
            if us >= 1_000_000 {
                line.push_str(&format!(" [{:.2}s]", us as f64 / 1_000_000.0));
            } else if us >= 1_000 {
                line.push_str(&format!(" [{:.2}ms]", us as f64 / 1_000.0));
            } else {
                line.push_str(&format!(" [{}us]", us));
            }
        }

        if let Some(ref cid) = self.correlation_id {
            line.push_str(&format!(" [cid:{}]", cid));
        }

        if !self.metadata.is_empty() {
            let meta: Vec<String> = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            line.push_str(&format!(" {{{}}}", meta.join(", ")));
        }

        line
    }

    /// Serialize to a single JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ` for a millisecond Unix timestamp.
fn iso_8601(timestamp_ms: u64) -> String {
    let secs = timestamp_ms / 1000;
    let ms = timestamp_ms % 1000;
    let (hours, minutes, seconds) = ((secs % 86400) / 3600, (secs % 3600) / 60, secs % 60);

    let is_leap = |year: u64| year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
    let mut year = 1970u64;
    let mut days = secs / 86400;
    loop {
        let in_year = if is_leap(year) { 366 } else { 365 };
        if days < in_year {
            break;
        }
        days -= in_year;
        year += 1;
    }

    let february = if is_leap(year) { 29 } else { 28 };
    let mut month = 1;
    for length in [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31] {
        if days < length {
            break;
        }
        days -= length;
        month += 1;
    }

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year, month, days + 1, hours, minutes, seconds, ms
    )
}

// =============================================================================
// Tests
// =============================================================================
