//! Integration tests for the debugger.
//!
//! Component: Tooling (Debugger)
//!
//! These tests verify:
//! - Breakpoints (plain, hit-count, conditional)
//! - Watchpoints on self-modified cells
//! - Snapshot history browsing and retention

#![cfg(test)]

use crate::common::*;

use shoal::tooling::BreakCondition;
use shoal::*;

fn factorial_debugger(n: i64) -> Debugger {
    let mut debugger = Debugger::new(interpreter(&load_demo("factorial")));
    debugger.start("", vec![n]);
    debugger
}

#[test]
fn hit_count_breakpoint_stops_on_third_loop_entry() {
    // Arrange: the loop head of the factorial demo.
    let mut debugger = factorial_debugger(3);
    let loop_head = Position::new(2, 1);
    let id = debugger.add_hit_count_breakpoint(loop_head, 3);

    // Act
    let event = debugger.continue_run(1_000);

    // Assert: two iterations have folded 3 * 2 into the accumulator.
    match event {
        DebugEvent::BreakpointHit { id: hit, position, .. } => {
            assert_eq!(hit, id);
            assert_eq!(position, loop_head);
        }
        other => panic!("unexpected {:?}", other),
    }
    let snapshot = debugger.current().unwrap();
    assert_eq!(snapshot.top_stack(), &[Value::Int(6), Value::Int(1)]);
}

#[test]
fn disabled_breakpoint_runs_to_halt() {
    let mut debugger = factorial_debugger(5);
    let id = debugger.add_breakpoint(Position::new(2, 1));
    debugger.set_breakpoint_enabled(id, false);

    let event = debugger.continue_run(10_000);

    assert!(matches!(event, DebugEvent::Halted { .. }));
    assert_eq!(debugger.interpreter().output(), "120");
}

#[test]
fn stack_depth_condition() {
    let mut debugger = Debugger::new(interpreter("1234;"));
    debugger.start("", Input::empty());
    for col in 0..5 {
        debugger.add_conditional_breakpoint(Position::new(col, 0), BreakCondition::StackDepth { min: 3 });
    }

    let event = debugger.continue_run(100);

    match event {
        DebugEvent::BreakpointHit { step, .. } => assert_eq!(step, 3),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn watchpoint_reports_self_modification() {
    let mut debugger = Debugger::new(interpreter("';'a0p1n"));
    debugger.watch_cell(Position::new(10, 0));
    debugger.start("", Input::empty());

    let event = debugger.continue_run(100);

    match event {
        DebugEvent::WatchpointHit { cell, old_value, new_value, step, .. } => {
            assert_eq!(cell, Position::new(10, 0));
            assert_eq!((old_value, new_value), (0, ';' as i64));
            assert_eq!(step, 6);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(debugger.continue_run(100), DebugEvent::Halted { .. }));
    assert_eq!(debugger.watchpoint_events().len(), 1);
}

#[test]
fn history_can_be_browsed() {
    let mut debugger = Debugger::new(interpreter("12+n;"));
    debugger.start("", Input::empty());
    for _ in 0..3 {
        debugger.step();
    }

    assert_eq!(debugger.history_len(), 4);
    assert_eq!(debugger.snapshot_at(2).unwrap().top_stack(), &[Value::Int(1), Value::Int(2)]);

    let back = debugger.step_back().unwrap();
    assert_eq!(back.step, 2);
    let forward = debugger.step_forward().unwrap();
    assert_eq!(forward.step, 3);
    assert_eq!(forward.top_stack(), &[Value::Int(3)]);
}

#[test]
fn history_is_bounded() {
    let mut debugger = Debugger::with_max_history(interpreter(">"), 5);
    debugger.start("", Input::empty());
    for _ in 0..20 {
        debugger.step();
    }

    assert_eq!(debugger.history_len(), 5);
    assert_eq!(debugger.history().map(|s| s.step).collect::<Vec<_>>(), vec![16u64, 17, 18, 19, 20]);
    assert_eq!(debugger.visits(Position::ORIGIN).len(), 5);
}
