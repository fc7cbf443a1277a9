//! Single-step debugger.
//!
//! Drives an [`Interpreter`] one cycle at a time and reports what happened.
//!
//! # Features
//!
//! - **Breakpoints**: stop when the pointer arrives on a cell, optionally
//!   only after a hit count or when a condition holds
//! - **Watchpoints**: stop when a codebox cell changes (self-modification
//!   via `p`)
//! - **History**: bounded ring of per-cycle snapshots to browse afterwards

use std::collections::VecDeque;

use crate::core::{Position, ShoalError, StackMachine, Value};
use crate::vm::{Heading, Input, Interpreter, RunState, StepOutcome};

/// Debug event types.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugEvent {
    /// The pointer arrived on a breakpoint; its instruction has not run yet.
    BreakpointHit { id: usize, position: Position, step: u64 },
    /// A watched cell changed during the last cycle.
    WatchpointHit { id: usize, cell: Position, old_value: i64, new_value: i64, step: u64 },
    /// The program executed `;`.
    Halted { steps: u64 },
    /// The run was aborted.
    Failed { error: ShoalError },
    /// `continue_run` used up its cycle budget.
    StepLimit { limit: u64 },
}

/// Breakpoint condition.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakCondition {
    /// Always break when reached.
    Always,
    /// Break from the `target`-th arrival onwards.
    HitCount { target: usize },
    /// Break when a codebox cell holds `value`.
    CellEquals { cell: Position, value: i64 },
    /// Break when the active stack is at least this deep.
    StackDepth { min: usize },
}

impl BreakCondition {
    /// Evaluate the condition.
    pub fn evaluate(&self, hit_count: usize, state: &RunState) -> bool {
        match self {
            BreakCondition::Always => true,
            BreakCondition::HitCount { target } => hit_count >= *target,
            BreakCondition::CellEquals { cell, value } => state.codebox().get(*cell) == *value,
            BreakCondition::StackDepth { min } => state.stacks().len() >= *min,
        }
    }
}

/// Breakpoint on a grid cell.
#[derive(Debug, Clone)]
pub struct Breakpoint {
    pub id: usize,
    pub position: Position,
    pub condition: BreakCondition,
    pub enabled: bool,
    /// Times the pointer has arrived here while enabled.
    pub hit_count: usize,
}

impl Breakpoint {
    /// Check if breakpoint should trigger.
    pub fn should_trigger(&mut self, state: &RunState) -> bool {
        if !self.enabled || state.position() != self.position {
            return false;
        }
        self.hit_count += 1;
        self.condition.evaluate(self.hit_count, state)
    }
}

/// Watchpoint - monitors a codebox cell for changes.
#[derive(Debug, Clone)]
pub struct Watchpoint {
    pub id: usize,
    pub cell: Position,
    pub enabled: bool,
    /// Last known value.
    pub last_value: i64,
}

impl Watchpoint {
    /// Record `new_value`, reporting whether it differs from the last one.
    pub fn check(&mut self, new_value: i64) -> bool {
        if !self.enabled {
            return false;
        }
        let changed = self.last_value != new_value;
        self.last_value = new_value;
        changed
    }
}

/// Engine state after one cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Cycles completed when the snapshot was taken.
    pub step: u64,
    pub position: Position,
    pub heading: Heading,
    pub skip_pending: bool,
    pub parse_mode: Option<char>,
    pub stacks: StackMachine,
    /// Output length in characters.
    pub output_len: usize,
}

impl Snapshot {
    fn capture(state: &RunState) -> Self {
        Self {
            step: state.steps(),
            position: state.position(),
            heading: state.heading(),
            skip_pending: state.skip_pending(),
            parse_mode: state.parse_mode(),
            stacks: state.stacks().clone(),
            output_len: state.output().chars().count(),
        }
    }

    /// Values of the active frame, bottom first.
    pub fn top_stack(&self) -> &[Value] {
        self.stacks.values()
    }
}

/// Single-step debugger around one interpreter.
#[derive(Debug)]
pub struct Debugger {
    interpreter: Interpreter,
    history: VecDeque<Snapshot>,
    /// Cursor into `history` for browsing.
    current_index: usize,
    /// Cap on both `history` and `events`.
    max_history: usize,
    breakpoints: Vec<Breakpoint>,
    watchpoints: Vec<Watchpoint>,
    /// Event log, oldest first.
    events: Vec<DebugEvent>,
    next_bp_id: usize,
    next_wp_id: usize,
}

impl Debugger {
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            history: VecDeque::new(),
            current_index: 0,
            max_history: 1000,
            breakpoints: Vec::new(),
            watchpoints: Vec::new(),
            events: Vec::new(),
            next_bp_id: 0,
            next_wp_id: 0,
        }
    }

    /// Create a debugger with custom history limit.
    pub fn with_max_history(interpreter: Interpreter, max_history: usize) -> Self {
        Self {
            max_history: max_history.max(1),
            ..Self::new(interpreter)
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Initialize a new run. History and events are cleared; breakpoints
    /// and watchpoints are kept and re-armed.
    pub fn start(&mut self, input: impl Into<Input>, stack: impl Into<Input>) {
        self.interpreter.initialize(input, stack);
        self.reset();
        for bp in &mut self.breakpoints {
            bp.hit_count = 0;
        }
        if let Some(state) = self.interpreter.state() {
            for wp in &mut self.watchpoints {
                wp.last_value = state.codebox().get(wp.cell);
            }
            self.history.push_back(Snapshot::capture(state));
        }
    }

    /// Execute one cycle and return the events it produced.
    pub fn step(&mut self) -> Vec<DebugEvent> {
        let outcome = self.interpreter.step();
        let mut raised = Vec::new();
        let mut snapshot = None;

        if let Some(state) = self.interpreter.state() {
            for wp in &mut self.watchpoints {
                let old_value = wp.last_value;
                let new_value = state.codebox().get(wp.cell);
                if wp.check(new_value) {
                    raised.push(DebugEvent::WatchpointHit {
                        id: wp.id,
                        cell: wp.cell,
                        old_value,
                        new_value,
                        step: state.steps(),
                    });
                }
            }

            if outcome == StepOutcome::Continue {
                for bp in &mut self.breakpoints {
                    if bp.should_trigger(state) {
                        raised.push(DebugEvent::BreakpointHit {
                            id: bp.id,
                            position: bp.position,
                            step: state.steps(),
                        });
                    }
                }
                snapshot = Some(Snapshot::capture(state));
            }
        }
        if let Some(snapshot) = snapshot {
            self.record(snapshot);
        }

        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Halted => raised.push(DebugEvent::Halted { steps: self.interpreter.steps() }),
            StepOutcome::Failed(error) => raised.push(DebugEvent::Failed { error }),
        }

        self.log(raised.iter().cloned());
        raised
    }

    /// Step until something happens or `max_steps` cycles have run.
    ///
    /// Returns the first event raised; later events from the same cycle are
    /// still in [`Debugger::events`].
    pub fn continue_run(&mut self, max_steps: u64) -> DebugEvent {
        for _ in 0..max_steps {
            if let Some(event) = self.step().into_iter().next() {
                return event;
            }
        }
        let event = DebugEvent::StepLimit { limit: max_steps };
        self.log([event.clone()]);
        event
    }

    fn log(&mut self, raised: impl IntoIterator<Item = DebugEvent>) {
        self.events.extend(raised);
        if self.events.len() > self.max_history {
            let excess = self.events.len() - self.max_history;
            self.events.drain(..excess);
        }
    }

    fn record(&mut self, snapshot: Snapshot) {
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
        self.current_index = self.history.len() - 1;
    }

    // ═══════════════════════════════════════════════════════════════════
    // History
    // ═══════════════════════════════════════════════════════════════════

    /// Move the browsing cursor one snapshot back.
    pub fn step_back(&mut self) -> Option<&Snapshot> {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
        self.history.get(self.current_index)
    }

    /// Move the browsing cursor one snapshot forward.
    pub fn step_forward(&mut self) -> Option<&Snapshot> {
        if self.current_index + 1 < self.history.len() {
            self.current_index += 1;
        }
        self.history.get(self.current_index)
    }

    /// Snapshot taken after `step` cycles, if still retained.
    pub fn snapshot_at(&self, step: u64) -> Option<&Snapshot> {
        self.history.iter().find(|snap| snap.step == step)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.history.get(self.current_index)
    }

    pub fn history(&self) -> impl Iterator<Item = &Snapshot> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Breakpoint Management
    // ═══════════════════════════════════════════════════════════════════

    pub fn add_breakpoint(&mut self, position: Position) -> usize {
        self.add_conditional_breakpoint(position, BreakCondition::Always)
    }

    pub fn add_conditional_breakpoint(&mut self, position: Position, condition: BreakCondition) -> usize {
        let id = self.next_bp_id;
        self.next_bp_id += 1;

        self.breakpoints.push(Breakpoint {
            id,
            position,
            condition,
            enabled: true,
            hit_count: 0,
        });
        id
    }

    pub fn add_hit_count_breakpoint(&mut self, position: Position, count: usize) -> usize {
        self.add_conditional_breakpoint(position, BreakCondition::HitCount { target: count })
    }

    pub fn remove_breakpoint(&mut self, id: usize) {
        self.breakpoints.retain(|b| b.id != id);
    }

    pub fn set_breakpoint_enabled(&mut self, id: usize, enabled: bool) {
        if let Some(bp) = self.breakpoints.iter_mut().find(|b| b.id == id) {
            bp.enabled = enabled;
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Watchpoint Management
    // ═══════════════════════════════════════════════════════════════════

    /// Watch a codebox cell for changes.
    pub fn watch_cell(&mut self, cell: Position) -> usize {
        let id = self.next_wp_id;
        self.next_wp_id += 1;

        let last_value = self.interpreter.state().map_or(0, |state| state.codebox().get(cell));
        self.watchpoints.push(Watchpoint {
            id,
            cell,
            enabled: true,
            last_value,
        });
        id
    }

    pub fn remove_watchpoint(&mut self, id: usize) {
        self.watchpoints.retain(|w| w.id != id);
    }

    pub fn set_watchpoint_enabled(&mut self, id: usize, enabled: bool) {
        if let Some(wp) = self.watchpoints.iter_mut().find(|w| w.id == id) {
            wp.enabled = enabled;
        }
    }

    pub fn watchpoints(&self) -> &[Watchpoint] {
        &self.watchpoints
    }

    pub fn clear_watchpoints(&mut self) {
        self.watchpoints.clear();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Analysis
    // ═══════════════════════════════════════════════════════════════════

    pub fn events(&self) -> &[DebugEvent] {
        &self.events
    }

    pub fn events_of_type(&self, filter: impl Fn(&DebugEvent) -> bool) -> Vec<&DebugEvent> {
        self.events.iter().filter(|e| filter(e)).collect()
    }

    pub fn watchpoint_events(&self) -> Vec<&DebugEvent> {
        self.events_of_type(|e| matches!(e, DebugEvent::WatchpointHit { .. }))
    }

    /// Steps at which the pointer visited `position`, among retained
    /// snapshots.
    pub fn visits(&self, position: Position) -> Vec<u64> {
        self.history
            .iter()
            .filter(|snap| snap.position == position)
            .map(|snap| snap.step)
            .collect()
    }

    /// Clear history and events. Breakpoints and watchpoints are kept.
    pub fn reset(&mut self) {
        self.history.clear();
        self.events.clear();
        self.current_index = 0;
    }
}
