//! Structured audit logging.
//!
//! Append-only records of what the interpreter did: programs loaded, runs
//! started, halted or failed. Entries follow a WHO/WHAT/WHEN/OUTCOME shape
//! and are written as structured text or JSON Lines.
//!
//! Per-cycle tracing is deliberately absent; single-step hosts observe the
//! engine directly instead.
//!
//! # Modules
//!
//! - `entry`: audit entry types (AuditEntry, Severity, Outcome, ActionCategory)
//! - `logger`: thread-safe file/console logger
//! - `global`: process-wide logger used by the engine
//!
//! # Example
//!
//! ```no_run
//! use shoal::audit::{init_global_logger, AuditConfig, AuditFormat};
//!
//! init_global_logger(AuditConfig {
//!     log_path: Some("shoal-audit.jsonl".into()),
//!     format: AuditFormat::JsonLines,
//!     ..Default::default()
//! })?;
//! # Ok::<(), std::io::Error>(())
//! ```

mod entry;
mod logger;
mod global;

pub use entry::{AuditEntry, Severity, Outcome, ActionCategory};

pub use logger::{AuditLogger, AuditConfig, AuditFormat};

pub use global::{
    init_global_logger, global_logger,
    audit, audit_error,
};

// =============================================================================
// Macros for Convenient Logging
// =============================================================================

/// Log an audit entry with structured fields.
///
/// # Example
///
/// ```ignore
/// audit_log!(
///     action = "LOAD",
///     entity = ("Program", "hello.fish"),
///     description = "Loaded 2 rows",
///     category = Load,
///     meta = { rows = 2 },
/// );
/// ```
#[macro_export]
macro_rules! audit_log {
    (
        action = $action:expr,
        entity = ($etype:expr, $eid:expr),
        description = $desc:expr
        $(, category = $cat:ident)?
        $(, severity = $sev:ident)?
        $(, outcome = $out:ident)?
        $(, duration_us = $dur:expr)?
        $(, meta = { $($key:ident = $val:expr),* $(,)? })?
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut entry = $crate::audit::AuditEntry::new($action, $etype, $eid, $desc);
        $(entry = entry.with_category($crate::audit::ActionCategory::$cat);)?
        $(entry = entry.with_severity($crate::audit::Severity::$sev);)?
        $(entry = entry.with_outcome($crate::audit::Outcome::$out);)?
        $(entry = entry.with_duration_us($dur);)?
        $($(entry = entry.with_meta(stringify!($key), $val);)*)?
        $crate::audit::audit(entry);
    }};
}
