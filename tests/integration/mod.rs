//! Integration tests for Shoal.
//!
//! This module organises integration tests by component.

pub mod programs;
pub mod engine;
pub mod debugger;
