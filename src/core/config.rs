//! Interpreter configuration.
//!
//! Every recognised option has an explicit default; nothing is looked up
//! from ambient state at run time.

/// Options controlling how a program is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Round non-integer values written into the codebox (ties to even).
    /// When false they are truncated toward zero.
    pub round_values: bool,
    /// Allow `.` to target positions outside the current bounding box.
    pub arbitrary_jump: bool,
    /// Divide integers into exact fractions instead of floating point.
    pub exact_fractions: bool,
    /// Cycle limit for run-to-completion (`None` = unlimited).
    pub max_steps: Option<u64>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            round_values: true,
            arbitrary_jump: false,
            exact_fractions: false,
            max_steps: None,
        }
    }
}

impl InterpreterConfig {
    pub fn with_round_values(mut self, round_values: bool) -> Self {
        self.round_values = round_values;
        self
    }

    pub fn with_arbitrary_jump(mut self, arbitrary_jump: bool) -> Self {
        self.arbitrary_jump = arbitrary_jump;
        self
    }

    pub fn with_exact_fractions(mut self, exact_fractions: bool) -> Self {
        self.exact_fractions = exact_fractions;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}
