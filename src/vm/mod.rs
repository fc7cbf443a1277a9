//! Execution layer.
//!
//! - **instruction**: the instruction set, headings and mirror tables
//! - **random**: pluggable heading sources for `x`
//! - **engine**: the interpreter state machine
//!
//! # Layer 1 - Depends on core

pub mod instruction;
pub mod random;
pub mod engine;

pub use instruction::{Instruction, Heading, Mirror, ArithOp};
pub use random::{DirectionSource, RngDirections, ScriptedDirections};
pub use engine::{Interpreter, RunState, RunStatus, StepOutcome, Input, run_program};
