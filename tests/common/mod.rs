//! Shared test utilities for Shoal integration tests.
//!
//! This module provides:
//! - Demo program loading
//! - Interpreter builders with reproducible randomness
//! - Assertion helpers for run outcomes
//!
//! ## AAA Pattern
//!
//! All tests follow the Arrange-Act-Assert pattern:
//! - Arrange: Load the program and build the interpreter
//! - Act: Run or step it
//! - Assert: Verify output, state or error

#![allow(dead_code)]

use std::path::PathBuf;

use shoal::*;

// =============================================================================
// Program Loading
// =============================================================================

/// Read `demos/<name>.fish` with surrounding blank lines removed.
///
/// # Panics
/// Panics if the file is missing, which is appropriate for test code.
pub fn load_demo(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(format!("{}.fish", name));
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    trim_blank_lines(&text)
}

// =============================================================================
// Interpreter Builders
// =============================================================================

/// Interpreter with default options and a fixed seed for `x`.
pub fn interpreter(code: &str) -> Interpreter {
    interpreter_with(code, InterpreterConfig::default())
}

/// Interpreter with `config` and a fixed seed for `x`.
pub fn interpreter_with(code: &str, config: InterpreterConfig) -> Interpreter {
    Interpreter::new(code, config).with_directions(RngDirections::seeded(0))
}

/// Run `code` to completion.
///
/// # Panics
/// Panics if the program does not halt cleanly.
pub fn run(code: &str, input: impl Into<Input>, stack: impl Into<Input>) -> String {
    interpreter(code)
        .run(input, stack)
        .unwrap_or_else(|e| panic!("program failed: {}", e))
}

/// Run `code` and return the error that aborted it.
///
/// # Panics
/// Panics if the program halts.
pub fn run_err(code: &str, input: impl Into<Input>, stack: impl Into<Input>) -> ShoalError {
    match interpreter(code).run(input, stack) {
        Ok(out) => panic!("expected failure, program printed {:?}", out),
        Err(e) => e,
    }
}

/// Run a demo program to completion.
pub fn run_demo(name: &str, input: impl Into<Input>, stack: impl Into<Input>) -> String {
    run(&load_demo(name), input, stack)
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert the active frame holds exactly `expected`, bottom first.
pub fn assert_stack(interpreter: &Interpreter, expected: &[i64]) {
    let state = interpreter.state().expect("interpreter not initialized");
    let expected: Vec<Value> = expected.iter().map(|&v| Value::Int(v)).collect();
    assert_eq!(state.stacks().values(), &expected[..]);
}

/// Step `n` cycles, asserting each one continues.
pub fn step_n(interpreter: &mut Interpreter, n: usize) {
    for i in 0..n {
        let outcome = interpreter.step();
        assert_eq!(outcome, StepOutcome::Continue, "cycle {} ended the run", i + 1);
    }
}
