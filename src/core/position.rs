//! Grid addressing for the codebox.
//!
//! Positions are unbounded `(column, row)` pairs. The bounding box is pure
//! bookkeeping: it records the extent of every cell ever addressed and
//! defines the torus the instruction pointer wraps around.

use std::fmt;

/// A cell address in the codebox, ordered as `(column, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub col: i64,
    pub row: i64,
}

impl Position {
    /// The origin, where every run starts.
    pub const ORIGIN: Position = Position { col: 0, row: 0 };

    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

impl From<(i64, i64)> for Position {
    fn from((col, row): (i64, i64)) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Inclusive bounds of every position the codebox has seen.
///
/// Starts at the single cell `(0, 0)` and only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub min_col: i64,
    pub max_col: i64,
    pub min_row: i64,
    pub max_row: i64,
}

impl BoundingBox {
    /// Widen the box so that it covers `pos`.
    pub fn include(&mut self, pos: Position) {
        if pos.col < self.min_col {
            self.min_col = pos.col;
        } else if pos.col > self.max_col {
            self.max_col = pos.col;
        }
        if pos.row < self.min_row {
            self.min_row = pos.row;
        } else if pos.row > self.max_row {
            self.max_row = pos.row;
        }
    }

    /// Containment test, inclusive on all four edges.
    pub fn contains(&self, pos: Position) -> bool {
        (self.min_col..=self.max_col).contains(&pos.col)
            && (self.min_row..=self.max_row).contains(&pos.row)
    }

    /// Number of columns the pointer wraps over (`max_col + 1`).
    ///
    /// Widened so that a cell written at `i64::MAX` still has an extent.
    #[inline]
    pub fn wrap_width(&self) -> i128 {
        i128::from(self.max_col) + 1
    }

    /// Number of rows the pointer wraps over (`max_row + 1`).
    #[inline]
    pub fn wrap_height(&self) -> i128 {
        i128::from(self.max_row) + 1
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cols {}..={}, rows {}..={}",
            self.min_col, self.max_col, self.min_row, self.max_row
        )
    }
}
