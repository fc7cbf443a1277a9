//! Core types for the interpreter.
//!
//! - **Position / BoundingBox**: unbounded grid addressing
//! - **Value**: integer / real / exact-ratio numeric domain
//! - **Codebox**: the sparse, self-modifiable program grid
//! - **StackMachine**: stack of stacks with a register per frame
//! - **InterpreterConfig**: explicit run options
//! - **Error**: error hierarchy shared by every layer
//!
//! # Layer 0 - No Internal Dependencies

pub mod position;
pub mod value;
pub mod config;
pub mod error;
pub mod codebox;
pub mod stack;

pub use position::{Position, BoundingBox};
pub use value::Value;
pub use config::InterpreterConfig;
pub use error::{ShoalError, ShoalResult, ErrorCategory, SourceLocation, CellValueIssue};
pub use codebox::{Codebox, CellInput, CHAR_MODULUS, char_of, wrap_code_point, trim_blank_lines};
pub use stack::{StackMachine, Frame};
