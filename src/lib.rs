//! Interpreter for ><> (fish), a two-dimensional, self-modifying stack language.
//!
//! A program is laid out on an unbounded grid of cells, the codebox. An
//! instruction pointer walks the grid, wrapping toroidally at the edges of
//! the occupied region, and each cell it visits is executed against a stack
//! of stacks.
//!
//! ```
//! use shoal::run_program;
//!
//! let out = run_program("\"!dlrow ,olleh\"v\n               >l?!;o", "")?;
//! assert_eq!(out, "hello, world!");
//! # Ok::<(), shoal::ShoalError>(())
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (No internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: VM (depends on core)
// ═══════════════════════════════════════════════════════════════════════════
pub mod vm;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: Tooling (depends on core, vm)
// ═══════════════════════════════════════════════════════════════════════════
pub mod tooling;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-cutting
// ═══════════════════════════════════════════════════════════════════════════
pub mod audit;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use core::{
    Value, Position, BoundingBox, InterpreterConfig,
    ShoalError, ShoalResult, ErrorCategory, SourceLocation, CellValueIssue,
    Codebox, CellInput, trim_blank_lines,
    StackMachine, Frame,
};
pub use vm::{
    Interpreter, Input, RunState, RunStatus, StepOutcome, run_program,
    Heading, Instruction, DirectionSource, RngDirections, ScriptedDirections,
};
pub use tooling::{Debugger, DebugEvent};
