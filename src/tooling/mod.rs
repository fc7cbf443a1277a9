//! Tooling layer.
//!
//! - **Debugger**: single-step execution with breakpoints, watchpoints and
//!   snapshot history
//!
//! # Layer 2 - Depends on core and vm

pub mod debugger;

pub use debugger::{
    Debugger, DebugEvent, Snapshot, Breakpoint, Watchpoint, BreakCondition,
};
