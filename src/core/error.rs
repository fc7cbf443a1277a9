//! Error types for the interpreter.
//!
//! # Error Categories
//!
//! - **Runtime**: raised by an instruction (stack depth, division by zero,
//!   invalid instruction, malformed cell value, out-of-bounds jump)
//! - **Limit**: a host-imposed cycle bound was reached
//! - **Usage**: the host drove the engine incorrectly (stepping before
//!   initialization)
//!
//! Halting is not an error and never appears here.

use std::fmt;

use thiserror::Error;

use super::position::{BoundingBox, Position};

/// Where an error was raised: the instruction pointer and the instruction
/// under it. Host calls (e.g. writing a cell directly) carry no location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub position: Option<Position>,
    pub instruction: Option<char>,
}

impl SourceLocation {
    pub fn new(position: Position, instruction: char) -> Self {
        Self { position: Some(position), instruction: Some(instruction) }
    }

    pub fn at(position: Position) -> Self {
        Self { position: Some(position), instruction: None }
    }

    pub fn is_known(&self) -> bool {
        self.position.is_some()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.position, self.instruction) {
            (Some(pos), Some(c)) => write!(f, "{} '{}'", pos, c),
            (Some(pos), None) => write!(f, "{}", pos),
            _ => write!(f, "host"),
        }
    }
}

/// Why a value was refused as codebox content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValueIssue {
    /// Text that is not exactly one character long.
    NotOneChar(String),
    /// A number with no integer approximation (NaN or infinite).
    NotReal(String),
}

impl fmt::Display for CellValueIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValueIssue::NotOneChar(text) => {
                write!(f, "Codebox values must be one char only, got {:?}.", text)
            }
            CellValueIssue::NotReal(text) => {
                write!(f, "Codebox values must be a char or a real number, got {}.", text)
            }
        }
    }
}

/// Comprehensive error type for the interpreter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShoalError {
    #[error("something smells fishy...\n[{location}] Not enough values to pop: {available} values on the stack, tried to pop {required}.")]
    StackUnderflow {
        required: usize,
        available: usize,
        location: SourceLocation,
    },

    #[error("something smells fishy...\n[{location}] Division by zero is not allowed: {dividend} {operator} 0.")]
    DivisionByZero {
        dividend: String,
        operator: char,
        location: SourceLocation,
    },

    #[error("something smells fishy...\n[{location}] Invalid command: {}, ord={code_point}.", printable(.code_point))]
    InvalidInstruction {
        code_point: u32,
        location: SourceLocation,
    },

    #[error("something smells fishy...\n[{location}] {issue}")]
    InvalidCellValue {
        issue: CellValueIssue,
        location: SourceLocation,
    },

    #[error("something smells fishy...\n[{location}] Jump target {target} lies outside the codebox ({bounds}).")]
    JumpOutOfBounds {
        target: Position,
        bounds: BoundingBox,
        location: SourceLocation,
    },

    #[error("Step limit exceeded: program still running after {limit} cycles")]
    StepLimitExceeded { limit: u64 },

    #[error("Interpreter must be initialized before stepping")]
    NotInitialized,
}

fn printable(code_point: &u32) -> String {
    match char::from_u32(*code_point) {
        Some(c) if !c.is_control() => c.to_string(),
        _ => format!("\\u{{{:x}}}", code_point),
    }
}

/// Error category for routing by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Runtime,
    Limit,
    Usage,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Runtime => write!(f, "runtime"),
            ErrorCategory::Limit => write!(f, "limit"),
            ErrorCategory::Usage => write!(f, "usage"),
        }
    }
}

impl ShoalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShoalError::StackUnderflow { .. } |
            ShoalError::DivisionByZero { .. } |
            ShoalError::InvalidInstruction { .. } |
            ShoalError::InvalidCellValue { .. } |
            ShoalError::JumpOutOfBounds { .. } => ErrorCategory::Runtime,

            ShoalError::StepLimitExceeded { .. } => ErrorCategory::Limit,

            ShoalError::NotInitialized => ErrorCategory::Usage,
        }
    }

    /// Stable numeric code for programmatic handling.
    pub fn code(&self) -> u32 {
        match self {
            // Runtime: 1000-1999
            ShoalError::StackUnderflow { .. } => 1001,
            ShoalError::DivisionByZero { .. } => 1002,
            ShoalError::InvalidInstruction { .. } => 1003,
            ShoalError::InvalidCellValue { .. } => 1004,
            ShoalError::JumpOutOfBounds { .. } => 1005,

            // Limit: 2000-2999
            ShoalError::StepLimitExceeded { .. } => 2001,

            // Usage: 3000-3999
            ShoalError::NotInitialized => 3001,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ShoalError::StackUnderflow { location, .. } |
            ShoalError::DivisionByZero { location, .. } |
            ShoalError::InvalidInstruction { location, .. } |
            ShoalError::InvalidCellValue { location, .. } |
            ShoalError::JumpOutOfBounds { location, .. } => Some(location),

            ShoalError::StepLimitExceeded { .. } | ShoalError::NotInitialized => None,
        }
    }

    /// Attach `at` to an error raised below the engine, unless it already
    /// knows where it happened.
    pub fn located(mut self, at: SourceLocation) -> Self {
        match &mut self {
            ShoalError::StackUnderflow { location, .. } |
            ShoalError::DivisionByZero { location, .. } |
            ShoalError::InvalidInstruction { location, .. } |
            ShoalError::InvalidCellValue { location, .. } |
            ShoalError::JumpOutOfBounds { location, .. } => {
                if !location.is_known() {
                    *location = at;
                }
            }
            ShoalError::StepLimitExceeded { .. } | ShoalError::NotInitialized => {}
        }
        self
    }
}

/// Result type alias for interpreter operations.
pub type ShoalResult<T> = Result<T, ShoalError>;
