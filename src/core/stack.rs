//! Stack of stacks for the interpreter.
//!
//! Each frame owns its values and exactly one register slot, so frames and
//! registers can never fall out of step. The machine always holds at least
//! one frame; destroying the last one empties it in place.

use std::fmt;

use super::error::{ShoalError, ShoalResult, SourceLocation};
use super::value::Value;

/// One stack in the stack of stacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    values: Vec<Value>,
    register: Option<Value>,
}

impl Frame {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn register(&self) -> Option<Value> {
        self.register
    }
}

/// An ordered, never-empty sequence of frames. The last frame is active.
#[derive(Clone, PartialEq)]
pub struct StackMachine {
    frames: Vec<Frame>,
}

impl Default for StackMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StackMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames.iter().map(|frame| &frame.values))
            .finish()
    }
}

impl StackMachine {
    /// A single empty frame with an empty register.
    pub fn new() -> Self {
        Self { frames: vec![Frame::default()] }
    }

    /// A single frame prefilled with `values`, bottom first.
    pub fn with_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut machine = Self::new();
        machine.extend(values);
        machine
    }

    fn active(&self) -> &Frame {
        // Invariant: `frames` is never empty.
        &self.frames[self.frames.len() - 1]
    }

    fn active_mut(&mut self) -> &mut Frame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// Length of the active frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.active().values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active().values.is_empty()
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Values of the active frame, bottom first.
    pub fn values(&self) -> &[Value] {
        &self.active().values
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Register slot of the active frame.
    pub fn register(&self) -> Option<Value> {
        self.active().register
    }

    /// Push onto the active frame. Numerically exact values are kept as
    /// integers.
    pub fn push(&mut self, value: Value) {
        self.active_mut().values.push(value.normalize());
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        let frame = self.active_mut();
        frame.values.extend(values.into_iter().map(Value::normalize));
    }

    /// Remove the top `n` values, returned in their stack order (deepest
    /// first). `n <= 0` pops nothing.
    pub fn pop(&mut self, n: i64) -> ShoalResult<Vec<Value>> {
        let available = self.len();
        let n = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
        if n > available {
            return Err(ShoalError::StackUnderflow {
                required: n,
                available,
                location: SourceLocation::default(),
            });
        }
        Ok(self.active_mut().values.split_off(available - n))
    }

    /// Remove every value of the active frame.
    pub fn pop_all(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.active_mut().values)
    }

    pub fn pop_one(&mut self) -> ShoalResult<Value> {
        let available = self.len();
        self.active_mut().values.pop().ok_or(ShoalError::StackUnderflow {
            required: 1,
            available,
            location: SourceLocation::default(),
        })
    }

    /// Pop two values as `(x, y)`, `y` being the former top.
    pub fn pop_pair(&mut self) -> ShoalResult<(Value, Value)> {
        let popped = self.pop(2)?;
        Ok((popped[0], popped[1]))
    }

    /// Pop three values as `(x, y, z)`, `z` being the former top.
    pub fn pop_triple(&mut self) -> ShoalResult<(Value, Value, Value)> {
        let popped = self.pop(3)?;
        Ok((popped[0], popped[1], popped[2]))
    }

    /// Move the top value to the bottom of the active frame.
    pub fn rotate_right(&mut self) {
        let values = &mut self.active_mut().values;
        if values.len() > 1 {
            values.rotate_right(1);
        }
    }

    /// Move the bottom value to the top of the active frame.
    pub fn rotate_left(&mut self) {
        let values = &mut self.active_mut().values;
        if values.len() > 1 {
            values.rotate_left(1);
        }
    }

    pub fn reverse(&mut self) {
        self.active_mut().values.reverse();
    }

    /// Push a new active frame seeded with `prefill` and a fresh register.
    pub fn new_frame(&mut self, prefill: Vec<Value>) {
        self.frames.push(Frame::default());
        self.extend(prefill);
    }

    /// Destroy the active frame and hand back its values, deepest first.
    ///
    /// With more than one frame the frame and its register are removed and
    /// the caller moves the returned values onto the frame beneath. The last
    /// frame is never removed: its values and its register are cleared.
    pub fn delete_frame(&mut self) -> Vec<Value> {
        if self.frames.len() > 1 {
            self.frames.pop().map(|frame| frame.values).unwrap_or_default()
        } else {
            let frame = self.active_mut();
            frame.register = None;
            std::mem::take(&mut frame.values)
        }
    }

    /// `&`: fill the empty register from the stack, or push and clear it.
    pub fn toggle_register(&mut self) -> ShoalResult<()> {
        match self.active_mut().register.take() {
            Some(held) => {
                self.push(held);
                Ok(())
            }
            None => {
                let value = self.pop_one()?;
                self.active_mut().register = Some(value);
                Ok(())
            }
        }
    }
}
