//! Integration tests for the interpreter engine.
//!
//! Component: Interpreter (single-step control)
//!
//! These tests verify:
//! - Run lifecycle (initialize, step, halt, fail, reset)
//! - Stack-of-stacks, register and input behaviour through programs
//! - Configuration options (rounding, jumps, fractions, step limit)
//! - Audit entries emitted for a run

#![cfg(test)]

use crate::common::*;

use shoal::audit::{self, AuditConfig, AuditFormat};
use shoal::*;

// =============================================================================
// Lifecycle Tests
// =============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn leading_spaces_execute_as_no_ops() {
        // Arrange
        let mut fish = interpreter("  1");
        fish.initialize("", Input::empty());

        // Act
        step_n(&mut fish, 3);

        // Assert
        assert_stack(&fish, &[1]);
        let state = fish.state().unwrap();
        assert_eq!(state.position(), Position::ORIGIN);
        assert_eq!(state.steps(), 3);
    }

    #[test]
    fn step_before_initialize_is_usage_error() {
        let mut fish = interpreter(";");
        assert_eq!(fish.status(), RunStatus::Idle);
        match fish.step() {
            StepOutcome::Failed(err) => {
                assert_eq!(err, ShoalError::NotInitialized);
                assert_eq!(err.category(), ErrorCategory::Usage);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reset_discards_run_state() {
        let mut fish = interpreter("1n;");
        assert_eq!(fish.run("", Input::empty()).unwrap(), "1");
        fish.reset();
        assert!(fish.state().is_none());
        assert_eq!(fish.output(), "");
        assert!(matches!(fish.step(), StepOutcome::Failed(ShoalError::NotInitialized)));
    }

    #[test]
    fn halt_is_sticky() {
        let mut fish = interpreter("1;");
        fish.initialize("", Input::empty());
        step_n(&mut fish, 1);
        assert_eq!(fish.step(), StepOutcome::Halted);
        assert_eq!(fish.step(), StepOutcome::Halted);
        assert_eq!(fish.steps(), 2);
        assert_eq!(fish.status(), RunStatus::Halted);
    }

    #[test]
    fn failure_is_sticky() {
        let mut fish = interpreter("~");
        fish.initialize("", Input::empty());
        let first = fish.step();
        assert!(matches!(first, StepOutcome::Failed(ShoalError::StackUnderflow { .. })));
        assert_eq!(fish.step(), first);
        assert_eq!(fish.steps(), 1);
        assert!(fish.state().unwrap().failure().is_some());
    }

    #[test]
    fn resume_continues_stepped_run() {
        let mut fish = interpreter("12+n;");
        fish.initialize("", Input::empty());
        step_n(&mut fish, 2);
        assert_stack(&fish, &[1, 2]);
        assert_eq!(fish.resume().unwrap(), "3");
    }
}

// =============================================================================
// Program Behaviour Tests
// =============================================================================

mod behaviour {
    use super::*;

    #[test]
    fn input_is_read_in_order_then_minus_one() {
        assert_eq!(run("iiinnn;", "ab", Input::empty()), "-19897");
    }

    #[test]
    fn input_values_are_read_verbatim() {
        let values = Input::Values(vec![Value::from(2.5), Value::Int(7)]);
        assert_eq!(run("iin n;", values, Input::empty()), "72.5");
    }

    #[test]
    fn frames_move_values_in_and_out() {
        assert_eq!(run("123 2[ln]ln;", "", Input::empty()), "23");
    }

    #[test]
    fn register_is_per_frame() {
        // Store 5 in the outer register, move 7 into a new frame and store
        // it there, close the frame, then recover the outer value.
        assert_eq!(run("5&71[&]&n;", "", Input::empty()), "5");
    }

    #[test]
    fn output_wraps_large_code_points() {
        let out = run("'A'88*:*:*+o;", "", Input::empty());
        assert_eq!(out, "A");
    }

    #[test]
    fn overflowed_column_saturates_and_run_continues() {
        // 15^32 overflows into a real, which clamps to the last column.
        let mut fish = interpreter("1f:*:*:*:*:*0p;");
        assert_eq!(fish.run("", Input::empty()).unwrap(), "");
        let codebox = fish.state().unwrap().codebox();
        assert_eq!(codebox.get(Position::new(i64::MAX, 0)), 1);
        assert_eq!(codebox.bounds().wrap_width(), i128::from(i64::MAX) + 1);
    }

    #[test]
    fn errors_carry_position() {
        let err = run_err("v\n1\n,", "", Input::empty());
        assert!(matches!(err, ShoalError::StackUnderflow { required: 2, available: 1, .. }));
        assert_eq!(
            err.location().and_then(|l| l.position),
            Some(Position::new(0, 2))
        );
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn rounding_and_truncation_of_stored_values() {
        let code = "72,11p11gn;";
        let rounded = interpreter_with(code, InterpreterConfig::default())
            .run("", Input::empty())
            .unwrap();
        let truncated = interpreter_with(code, InterpreterConfig::default().with_round_values(false))
            .run("", Input::empty())
            .unwrap();
        assert_eq!(rounded, "4");
        assert_eq!(truncated, "3");
    }

    #[test]
    fn jump_outside_codebox_rejected_by_default() {
        let err = run_err("99.", "", Input::empty());
        assert!(matches!(err, ShoalError::JumpOutOfBounds { .. }));
        assert_eq!(err.code(), 1005);
    }

    #[test]
    fn arbitrary_jump_lands_anywhere() {
        let config = InterpreterConfig::default().with_arbitrary_jump(true);
        let mut fish = interpreter_with("99.", config);
        fish.initialize("", Input::empty());
        step_n(&mut fish, 3);
        assert_eq!(fish.state().unwrap().position(), Position::new(9, 9));
    }

    #[test]
    fn exact_fractions_print_as_ratio() {
        let config = InterpreterConfig::default().with_exact_fractions(true);
        let out = interpreter_with("23,n;", config).run("", Input::empty()).unwrap();
        assert_eq!(out, "2/3");
    }

    #[test]
    fn step_limit_aborts_run() {
        let config = InterpreterConfig::default().with_max_steps(50);
        let err = interpreter_with("x", config).run("", Input::empty()).unwrap_err();
        assert_eq!(err, ShoalError::StepLimitExceeded { limit: 50 });
        assert_eq!(err.category(), ErrorCategory::Limit);
    }
}

// =============================================================================
// Audit Tests
// =============================================================================

#[test]
fn audit_log_records_run_lifecycle() {
    let path = std::env::temp_dir().join(format!("shoal-audit-{}.jsonl", std::process::id()));
    audit::init_global_logger(AuditConfig {
        log_path: Some(path.clone()),
        format: AuditFormat::JsonLines,
        ..Default::default()
    })
    .expect("logger");

    interpreter("1n;").with_name("audit-ok").run("", Input::empty()).unwrap();
    let _ = interpreter("+").with_name("audit-fail").run("", Input::empty());
    shoal::audit_log!(
        action = "LOAD",
        entity = ("Program", "audit-macro"),
        description = "Loaded program text",
        category = Load,
        duration_us = 42,
        meta = { rows = 3, cols = 7 },
    );
    audit::global_logger().unwrap().flush().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let entries: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect();
    let actions_for = |program: &str| -> Vec<String> {
        entries
            .iter()
            .filter(|e| e["entity_id"] == program)
            .map(|e| e["action"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    assert_eq!(actions_for("audit-ok"), ["RUN_START", "HALT"]);
    assert_eq!(actions_for("audit-fail"), ["RUN_START", "FAIL"]);

    let failed = entries
        .iter()
        .find(|e| e["entity_id"] == "audit-fail" && e["action"] == "FAIL")
        .unwrap();
    assert_eq!(failed["metadata"]["code"], "1001");

    // Start and end of one run share a correlation id; the end is timed.
    let ok_entries: Vec<&serde_json::Value> =
        entries.iter().filter(|e| e["entity_id"] == "audit-ok").collect();
    assert_eq!(ok_entries[0]["correlation_id"], "audit-ok#1");
    assert_eq!(ok_entries[1]["correlation_id"], "audit-ok#1");
    assert!(ok_entries[1]["duration_us"].is_u64());
    assert!(ok_entries[0].get("duration_us").is_none());

    let loaded = entries.iter().find(|e| e["entity_id"] == "audit-macro").unwrap();
    assert_eq!(loaded["duration_us"], 42);
    assert_eq!(loaded["metadata"]["rows"], "3");
    assert_eq!(loaded["metadata"]["cols"], "7");
    let _ = std::fs::remove_file(&path);
}
