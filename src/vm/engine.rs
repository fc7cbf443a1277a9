//! The interpreter engine.
//!
//! An [`Interpreter`] owns the program text and configuration; calling
//! [`Interpreter::initialize`] builds a fresh [`RunState`] (codebox, stacks,
//! pointer) that lives until the next initialize or [`Interpreter::reset`].
//!
//! Each cycle:
//! 1. Read the cell under the pointer.
//! 2. In parse mode, push it verbatim unless it closes the string.
//! 3. Otherwise decode and execute it.
//! 4. Move one cell (two when skipping) along the heading, wrapping within
//!    the current bounding box. A jump places the pointer and skips this.
//!
//! Run-to-completion and single-step execution share [`Interpreter::step`].

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use crate::audit::{audit, AuditEntry};
use crate::core::{
    char_of, Codebox, InterpreterConfig, Position, ShoalError, ShoalResult, SourceLocation,
    StackMachine, Value,
};

use super::instruction::{ArithOp, Heading, Instruction};
use super::random::{DirectionSource, RngDirections};

/// Program input, or initial stack contents.
///
/// Text is consumed one character at a time as its code point.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Values(Vec<Value>),
}

impl Input {
    pub fn empty() -> Self {
        Input::Values(Vec::new())
    }

    fn into_values(self) -> Vec<Value> {
        match self {
            Input::Text(text) => text.chars().map(Value::from).collect(),
            Input::Values(values) => values,
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Input::empty()
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<Vec<Value>> for Input {
    fn from(values: Vec<Value>) -> Self {
        Input::Values(values)
    }
}

impl From<Vec<i64>> for Input {
    fn from(values: Vec<i64>) -> Self {
        Input::Values(values.into_iter().map(Value::Int).collect())
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No run state; `step` is a usage error.
    Idle,
    Running,
    Halted,
    Failed,
}

/// Result of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The cycle completed and the pointer moved on.
    Continue,
    /// `;` was executed. Not an error.
    Halted,
    /// The run was aborted.
    Failed(ShoalError),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepOutcome::Continue)
    }
}

/// How the pointer moves after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Advance,
    /// The pointer was placed directly; no motion this cycle.
    Jumped,
    Halt,
}

/// Everything one run mutates.
#[derive(Debug, Clone)]
pub struct RunState {
    codebox: Codebox,
    stacks: StackMachine,
    position: Position,
    heading: Heading,
    skip: bool,
    parse_mode: Option<char>,
    input: VecDeque<Value>,
    output: String,
    steps: u64,
    status: RunStatus,
    failure: Option<ShoalError>,
    run_id: String,
    started: Instant,
}

impl RunState {
    fn new(codebox: Codebox, input: Input, stack: Input, run_id: String) -> Self {
        Self {
            codebox,
            stacks: StackMachine::with_values(stack.into_values()),
            position: Position::ORIGIN,
            heading: Heading::Right,
            skip: false,
            parse_mode: None,
            input: input.into_values().into(),
            output: String::new(),
            steps: 0,
            status: RunStatus::Running,
            failure: None,
            run_id,
            started: Instant::now(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// True when the next instruction will be passed over.
    pub fn skip_pending(&self) -> bool {
        self.skip
    }

    /// The quote being matched while in string-parse mode.
    pub fn parse_mode(&self) -> Option<char> {
        self.parse_mode
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn stacks(&self) -> &StackMachine {
        &self.stacks
    }

    pub fn codebox(&self) -> &Codebox {
        &self.codebox
    }

    /// Input values not yet read by `i`.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Completed cycles.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The error that aborted the run, if any.
    pub fn failure(&self) -> Option<&ShoalError> {
        self.failure.as_ref()
    }

    /// Correlation id shared by this run's audit entries (`name#n`).
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn elapsed_us(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Read, dispatch and execute the cell under the pointer, then move.
    fn cycle(
        &mut self,
        config: &InterpreterConfig,
        directions: &mut dyn DirectionSource,
    ) -> ShoalResult<Flow> {
        let at = self.position;
        let code_point = self.codebox.code_point(at);
        let location = SourceLocation::new(at, char_of(i64::from(code_point)));

        let flow = match self.parse_mode {
            Some(quote) if code_point != u32::from(quote) => {
                self.stacks.push(Value::Int(i64::from(code_point)));
                Flow::Advance
            }
            _ => {
                let instruction = Instruction::decode(code_point)
                    .ok_or(ShoalError::InvalidInstruction { code_point, location })?;
                self.execute(instruction, config, directions)
                    .map_err(|e| e.located(location))?
            }
        };

        if flow == Flow::Advance {
            self.advance();
        }
        Ok(flow)
    }

    /// Move along the heading, wrapping onto the torus spanned by the
    /// current bounding box.
    fn advance(&mut self) {
        let distance = if std::mem::take(&mut self.skip) { 2 } else { 1 };
        let (dx, dy) = self.heading.delta();
        let bounds = self.codebox.bounds();
        self.position = Position::new(
            wrap_axis(self.position.col, dx * distance, bounds.wrap_width()),
            wrap_axis(self.position.row, dy * distance, bounds.wrap_height()),
        );
    }

    fn execute(
        &mut self,
        instruction: Instruction,
        config: &InterpreterConfig,
        directions: &mut dyn DirectionSource,
    ) -> ShoalResult<Flow> {
        let stacks = &mut self.stacks;
        match instruction {
            Instruction::Nop => {}

            // ═══════════════════════════════════════════════════════════
            // Motion
            // ═══════════════════════════════════════════════════════════
            Instruction::Face(heading) => self.heading = heading,
            Instruction::Reflect(mirror) => self.heading = self.heading.reflect(mirror),
            Instruction::RandomHeading => self.heading = directions.next_heading(),
            Instruction::Trampoline => self.skip = true,
            Instruction::ConditionalTrampoline => {
                if stacks.pop_one()?.is_zero() {
                    self.skip = true;
                }
            }
            Instruction::Jump => {
                let (x, y) = stacks.pop_pair()?;
                let target = self.codebox.parse_coord(x, y)?;
                if !config.arbitrary_jump && !self.codebox.contains(target) {
                    return Err(ShoalError::JumpOutOfBounds {
                        target,
                        bounds: self.codebox.bounds(),
                        location: SourceLocation::default(),
                    });
                }
                self.position = target;
                return Ok(Flow::Jumped);
            }

            // ═══════════════════════════════════════════════════════════
            // Literals & Arithmetic
            // ═══════════════════════════════════════════════════════════
            Instruction::Literal(digit) => stacks.push(Value::Int(i64::from(digit))),
            Instruction::Arithmetic(op) => {
                let (x, y) = stacks.pop_pair()?;
                let result = match op {
                    ArithOp::Add => Some(x.add(y)),
                    ArithOp::Sub => Some(x.sub(y)),
                    ArithOp::Mul => Some(x.mul(y)),
                    ArithOp::Div => x.div(y, config.exact_fractions),
                    ArithOp::Mod => x.rem(y),
                };
                let value = result.ok_or_else(|| ShoalError::DivisionByZero {
                    dividend: x.to_string(),
                    operator: op.symbol(),
                    location: SourceLocation::default(),
                })?;
                stacks.push(value);
            }
            Instruction::Equals => {
                let (x, y) = stacks.pop_pair()?;
                stacks.push(Value::from_bool(x == y));
            }
            Instruction::GreaterThan => {
                let (x, y) = stacks.pop_pair()?;
                stacks.push(Value::from_bool(x > y));
            }
            Instruction::LessThan => {
                let (x, y) = stacks.pop_pair()?;
                stacks.push(Value::from_bool(x < y));
            }
            Instruction::Quote(quote) => {
                // Only reached outside parse mode or on the closing quote.
                self.parse_mode = match self.parse_mode {
                    None => Some(quote),
                    Some(_) => None,
                };
            }

            // ═══════════════════════════════════════════════════════════
            // Stack Manipulation
            // ═══════════════════════════════════════════════════════════
            Instruction::Duplicate => {
                let v = stacks.pop_one()?;
                stacks.push(v);
                stacks.push(v);
            }
            Instruction::Remove => {
                stacks.pop_one()?;
            }
            Instruction::Swap2 => {
                let (x, y) = stacks.pop_pair()?;
                stacks.push(y);
                stacks.push(x);
            }
            Instruction::Swap3 => {
                let (x, y, z) = stacks.pop_triple()?;
                stacks.push(z);
                stacks.push(x);
                stacks.push(y);
            }
            Instruction::ShiftRight => stacks.rotate_right(),
            Instruction::ShiftLeft => stacks.rotate_left(),
            Instruction::Reverse => stacks.reverse(),
            Instruction::Length => {
                let len = stacks.len() as i64;
                stacks.push(Value::Int(len));
            }
            Instruction::NewFrame => {
                let count = self.codebox.parse_value(stacks.pop_one()?)?;
                let moved = stacks.pop(count)?;
                stacks.new_frame(moved);
            }
            Instruction::DeleteFrame => {
                let has_parent = stacks.frame_count() > 1;
                let moved = stacks.delete_frame();
                if has_parent {
                    stacks.extend(moved);
                }
            }

            // ═══════════════════════════════════════════════════════════
            // I/O, Register & Codebox
            // ═══════════════════════════════════════════════════════════
            Instruction::OutChar => {
                let code = self.codebox.parse_value(stacks.pop_one()?)?;
                self.output.push(char_of(code));
            }
            Instruction::OutNumber => {
                let v = stacks.pop_one()?;
                self.output.push_str(&v.to_string());
            }
            Instruction::Read => {
                let v = self.input.pop_front().unwrap_or(Value::END_OF_INPUT);
                stacks.push(v);
            }
            Instruction::Register => stacks.toggle_register()?,
            Instruction::Get => {
                let (x, y) = stacks.pop_pair()?;
                let pos = self.codebox.parse_coord(x, y)?;
                stacks.push(Value::Int(self.codebox.get(pos)));
            }
            Instruction::Put => {
                let (v, x, y) = stacks.pop_triple()?;
                let pos = self.codebox.parse_coord(x, y)?;
                self.codebox.store(pos, v)?;
            }
            Instruction::Halt => return Ok(Flow::Halt),
        }
        Ok(Flow::Advance)
    }
}

/// Move `coord` by `delta` on an axis `extent` cells long.
///
/// Done in `i128`: cells may sit at `i64::MAX`, where `coord + 1` and the
/// extent itself no longer fit in `i64`.
fn wrap_axis(coord: i64, delta: i64, extent: i128) -> i64 {
    let wrapped = (i128::from(coord) + i128::from(delta)).rem_euclid(extent);
    // 0 <= wrapped < extent <= i64::MAX + 1
    i64::try_from(wrapped).unwrap_or(i64::MAX)
}

/// A ><> interpreter for one program.
pub struct Interpreter {
    name: String,
    source: String,
    config: InterpreterConfig,
    directions: Box<dyn DirectionSource>,
    state: Option<RunState>,
    runs: u64,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(";", InterpreterConfig::default())
    }
}

impl Interpreter {
    /// Create an interpreter for `source`. `x` draws from entropy until
    /// [`Interpreter::with_directions`] says otherwise.
    pub fn new(source: impl Into<String>, config: InterpreterConfig) -> Self {
        Self {
            name: "<source>".to_string(),
            source: source.into(),
            config,
            directions: Box::new(RngDirections::from_entropy()),
            state: None,
            runs: 0,
        }
    }

    /// Name used in audit entries (typically the file name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_directions(mut self, directions: impl DirectionSource + 'static) -> Self {
        self.directions = Box::new(directions);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Load the source into a fresh codebox and start a run.
    ///
    /// Any previous run state is discarded.
    pub fn initialize(&mut self, input: impl Into<Input>, stack: impl Into<Input>) {
        let codebox = Codebox::load(&self.source, self.config.round_values);
        self.runs += 1;
        let run_id = format!("{}#{}", self.name, self.runs);
        audit(
            AuditEntry::run_started(&self.name, codebox.bounds(), &self.config)
                .with_correlation(run_id.as_str()),
        );
        self.state = Some(RunState::new(codebox, input.into(), stack.into(), run_id));
    }

    /// Drop the run state. Stepping afterwards is a usage error.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn state(&self) -> Option<&RunState> {
        self.state.as_ref()
    }

    pub fn status(&self) -> RunStatus {
        self.state.as_ref().map_or(RunStatus::Idle, RunState::status)
    }

    /// Output accumulated so far (empty when idle).
    pub fn output(&self) -> &str {
        self.state.as_ref().map_or("", RunState::output)
    }

    pub fn steps(&self) -> u64 {
        self.state.as_ref().map_or(0, RunState::steps)
    }

    /// Execute one cycle.
    ///
    /// Once a run has halted or failed, further steps repeat that outcome
    /// without changing any state.
    pub fn step(&mut self) -> StepOutcome {
        let Some(state) = self.state.as_mut() else {
            return StepOutcome::Failed(ShoalError::NotInitialized);
        };

        match state.status {
            RunStatus::Halted => return StepOutcome::Halted,
            RunStatus::Failed => {
                let error = state.failure.clone().unwrap_or(ShoalError::NotInitialized);
                return StepOutcome::Failed(error);
            }
            RunStatus::Idle | RunStatus::Running => {}
        }

        let outcome = state.cycle(&self.config, self.directions.as_mut());
        state.steps += 1;
        match outcome {
            Ok(Flow::Advance) | Ok(Flow::Jumped) => StepOutcome::Continue,
            Ok(Flow::Halt) => {
                state.status = RunStatus::Halted;
                audit(
                    AuditEntry::run_halted(&self.name, state.steps, state.output.chars().count())
                        .with_correlation(state.run_id.as_str())
                        .with_duration_us(state.elapsed_us()),
                );
                StepOutcome::Halted
            }
            Err(error) => {
                Self::fail(&self.name, state, error.clone());
                StepOutcome::Failed(error)
            }
        }
    }

    fn fail(name: &str, state: &mut RunState, error: ShoalError) {
        audit(
            AuditEntry::run_failed(name, state.steps, &error)
                .with_correlation(state.run_id.as_str())
                .with_duration_us(state.elapsed_us()),
        );
        state.status = RunStatus::Failed;
        state.failure = Some(error);
    }

    /// Initialize and cycle until halt, returning the output.
    ///
    /// With `max_steps` configured, a program still running after that many
    /// cycles fails with [`ShoalError::StepLimitExceeded`].
    pub fn run(&mut self, input: impl Into<Input>, stack: impl Into<Input>) -> ShoalResult<String> {
        self.initialize(input, stack);
        self.resume()
    }

    /// Keep cycling an initialized run until it terminates.
    pub fn resume(&mut self) -> ShoalResult<String> {
        loop {
            if let (Some(limit), Some(state)) = (self.config.max_steps, self.state.as_mut()) {
                if state.status == RunStatus::Running && state.steps >= limit {
                    let error = ShoalError::StepLimitExceeded { limit };
                    Self::fail(&self.name, state, error.clone());
                    return Err(error);
                }
            }
            match self.step() {
                StepOutcome::Continue => {}
                StepOutcome::Halted => return Ok(self.output().to_string()),
                StepOutcome::Failed(error) => return Err(error),
            }
        }
    }

    /// Text view of the codebox. Before initialization the freshly loaded
    /// source is rendered.
    pub fn render(&self) -> String {
        match &self.state {
            Some(state) => state.codebox.render(),
            None => Codebox::load(&self.source, self.config.round_values).render(),
        }
    }
}

/// Run `source` to completion with default configuration.
pub fn run_program(source: &str, input: impl Into<Input>) -> ShoalResult<String> {
    Interpreter::new(source, InterpreterConfig::default()).run(input, Input::empty())
}
