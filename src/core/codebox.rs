//! The codebox: a sparse, growable grid holding program text and data.
//!
//! Cells are addressed by `(column, row)` and default to 0 when never
//! written. Writes are the self-modification primitive: they are visible to
//! every later read and widen the bounding box the pointer wraps within.

use std::collections::HashMap;
use std::fmt;

use super::error::{CellValueIssue, ShoalError, ShoalResult, SourceLocation};
use super::position::{BoundingBox, Position};
use super::value::Value;

/// Cells are read as characters modulo this value.
pub const CHAR_MODULUS: i64 = 65536;

/// Something a host or instruction wants to store in a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellInput<'a> {
    /// Must be exactly one character.
    Text(&'a str),
    Char(char),
    Number(Value),
}

impl<'a> From<&'a str> for CellInput<'a> {
    fn from(text: &'a str) -> Self {
        CellInput::Text(text)
    }
}

impl From<char> for CellInput<'_> {
    fn from(c: char) -> Self {
        CellInput::Char(c)
    }
}

impl From<Value> for CellInput<'_> {
    fn from(v: Value) -> Self {
        CellInput::Number(v)
    }
}

impl From<i64> for CellInput<'_> {
    fn from(i: i64) -> Self {
        CellInput::Number(Value::Int(i))
    }
}

impl From<f64> for CellInput<'_> {
    fn from(r: f64) -> Self {
        CellInput::Number(Value::Real(r))
    }
}

/// Reduce a cell value to a UTF-16 code unit.
#[inline]
pub fn wrap_code_point(value: i64) -> u32 {
    value.rem_euclid(CHAR_MODULUS) as u32
}

/// Character form of a cell value. Surrogate code units have no `char`
/// and come back as U+FFFD.
pub fn char_of(value: i64) -> char {
    char::from_u32(wrap_code_point(value)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Sparse program grid with a monotonically growing bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Codebox {
    cells: HashMap<Position, i64>,
    bounds: BoundingBox,
    round_values: bool,
}

impl Default for Codebox {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Codebox {
    /// An empty codebox covering only `(0, 0)`.
    pub fn new(round_values: bool) -> Self {
        Self {
            cells: HashMap::new(),
            bounds: BoundingBox::default(),
            round_values,
        }
    }

    /// Load program text: rows split on `\n` (a trailing `\r` is dropped),
    /// every character stored as its code point.
    ///
    /// The bounding box covers every row, including empty ones.
    pub fn load(source: &str, round_values: bool) -> Self {
        let mut codebox = Self::new(round_values);
        for (row, line) in source.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let row = row as i64;
            codebox.bounds.include(Position::new(0, row));
            for (col, c) in line.chars().enumerate() {
                codebox.set(Position::new(col as i64, row), c as i64);
            }
        }
        codebox
    }

    /// Stored value at `pos`, or 0 if never written.
    pub fn get(&self, pos: Position) -> i64 {
        self.cells.get(&pos).copied().unwrap_or(0)
    }

    /// Store `value` at `pos`, widening the bounding box if needed.
    pub fn set(&mut self, pos: Position, value: i64) {
        self.cells.insert(pos, value);
        self.bounds.include(pos);
    }

    /// Validate `input` and store it at `pos`.
    pub fn store<'a>(&mut self, pos: Position, input: impl Into<CellInput<'a>>) -> ShoalResult<()> {
        let value = self.parse_value(input)?;
        self.set(pos, value);
        Ok(())
    }

    /// Code unit at `pos` (value modulo 65536).
    pub fn code_point(&self, pos: Position) -> u32 {
        wrap_code_point(self.get(pos))
    }

    /// Character at `pos`.
    pub fn get_char(&self, pos: Position) -> char {
        char_of(self.get(pos))
    }

    /// The single gate for cell contents: one character, or a real number
    /// rounded (ties to even) or truncated according to configuration.
    pub fn parse_value<'a>(&self, input: impl Into<CellInput<'a>>) -> ShoalResult<i64> {
        let invalid = |issue| ShoalError::InvalidCellValue { issue, location: SourceLocation::default() };
        match input.into() {
            CellInput::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c as i64),
                    _ => Err(invalid(CellValueIssue::NotOneChar(text.to_string()))),
                }
            }
            CellInput::Char(c) => Ok(c as i64),
            CellInput::Number(Value::Int(i)) => Ok(i),
            CellInput::Number(v) => {
                let real = v.to_f64();
                if !real.is_finite() {
                    return Err(invalid(CellValueIssue::NotReal(v.to_string())));
                }
                let whole = if self.round_values { real.round_ties_even() } else { real.trunc() };
                // Saturating cast; cells beyond i64 are clamped.
                Ok(whole as i64)
            }
        }
    }

    /// Convert a popped `(x, y)` pair into a position.
    pub fn parse_coord(&self, x: Value, y: Value) -> ShoalResult<Position> {
        Ok(Position::new(self.parse_value(x)?, self.parse_value(y)?))
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Bounding-box containment test.
    pub fn contains(&self, pos: Position) -> bool {
        self.bounds.contains(pos)
    }

    /// True when some cell holds `value`; 0 is always present.
    pub fn contains_value(&self, value: i64) -> bool {
        value == 0 || self.cells.values().any(|&v| v == value)
    }

    /// Number of explicitly written cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn round_values(&self) -> bool {
        self.round_values
    }

    /// Text rendering of the bounding box, one line per row.
    /// Non-printable cells are shown as spaces.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for row in self.bounds.min_row..=self.bounds.max_row {
            for col in self.bounds.min_col..=self.bounds.max_col {
                let shown = match char::from_u32(self.code_point(Position::new(col, row))) {
                    Some(c) if !c.is_control() => c,
                    _ => ' ',
                };
                text.push(shown);
            }
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for Codebox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Drop leading and trailing lines that are empty or whitespace-only.
///
/// This belongs to program loading, not to the engine: the engine keeps
/// whatever rows it is given.
pub fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_sets_cells_and_bounds() {
        let codebox = Codebox::load("ab\ncde", true);
        assert_eq!(codebox.get(Position::new(0, 0)), 'a' as i64);
        assert_eq!(codebox.get(Position::new(2, 1)), 'e' as i64);
        assert_eq!(codebox.bounds(), BoundingBox { min_col: 0, max_col: 2, min_row: 0, max_row: 1 });
    }

    #[test]
    fn test_empty_rows_still_count() {
        let codebox = Codebox::load("a\n\n", true);
        assert_eq!(codebox.bounds().max_row, 2);
        assert_eq!(Codebox::load("", true).bounds(), BoundingBox::default());
    }

    #[test]
    fn test_unwritten_cells_read_zero() {
        let codebox = Codebox::load(";", true);
        assert_eq!(codebox.get(Position::new(40, -7)), 0);
        assert_eq!(codebox.get_char(Position::new(1, 0)), '\0');
    }

    #[test]
    fn test_set_extends_bounds_and_is_visible() {
        let mut codebox = Codebox::load("abc", true);
        codebox.set(Position::new(5, 3), 'z' as i64);
        codebox.set(Position::new(-1, 0), 'y' as i64);
        let bounds = codebox.bounds();
        assert_eq!((bounds.min_col, bounds.max_col, bounds.max_row), (-1, 5, 3));
        assert_eq!(codebox.get_char(Position::new(5, 3)), 'z');
    }

    #[test]
    fn test_get_char_wraps_modulo_65536() {
        let mut codebox = Codebox::new(true);
        codebox.set(Position::ORIGIN, 65536 + 'a' as i64);
        assert_eq!(codebox.get_char(Position::ORIGIN), 'a');
        codebox.set(Position::ORIGIN, -1);
        assert_eq!(codebox.code_point(Position::ORIGIN), 65535);
        codebox.set(Position::ORIGIN, 0xD800);
        assert_eq!(codebox.get_char(Position::ORIGIN), char::REPLACEMENT_CHARACTER);
    }

    #[test]
    fn test_parse_value_characters() {
        let codebox = Codebox::new(true);
        assert_eq!(codebox.parse_value("a"), Ok(97));
        assert_eq!(codebox.parse_value('♞'), Ok(9822));
        assert!(matches!(
            codebox.parse_value("ab"),
            Err(ShoalError::InvalidCellValue { issue: CellValueIssue::NotOneChar(_), .. })
        ));
        assert!(codebox.parse_value("").is_err());
    }

    #[test]
    fn test_parse_value_round_or_truncate() {
        let rounding = Codebox::new(true);
        assert_eq!(rounding.parse_value(2.5), Ok(2));
        assert_eq!(rounding.parse_value(3.5), Ok(4));
        assert_eq!(rounding.parse_value(-1.7), Ok(-2));

        let truncating = Codebox::new(false);
        assert_eq!(truncating.parse_value(2.9), Ok(2));
        assert_eq!(truncating.parse_value(-1.7), Ok(-1));
    }

    #[test]
    fn test_parse_value_rejects_non_real_numbers() {
        let codebox = Codebox::new(true);
        assert!(matches!(
            codebox.parse_value(f64::NAN),
            Err(ShoalError::InvalidCellValue { issue: CellValueIssue::NotReal(_), .. })
        ));
        assert!(codebox.parse_value(f64::INFINITY).is_err());
    }

    #[test]
    fn test_contains_value() {
        let codebox = Codebox::load(";", true);
        assert!(codebox.contains_value(';' as i64));
        assert!(codebox.contains_value(0));
        assert!(!codebox.contains_value('x' as i64));
    }

    #[test]
    fn test_render_replaces_unprintables() {
        let mut codebox = Codebox::load("ab\nc", true);
        codebox.set(Position::new(1, 1), 7);
        assert_eq!(codebox.render(), "ab\nc \n");
    }

    #[test]
    fn test_trim_blank_lines() {
        assert_eq!(trim_blank_lines("\n  \n  >o;\n\n"), "  >o;");
        assert_eq!(trim_blank_lines("a\n\nb\n"), "a\n\nb");
        assert_eq!(trim_blank_lines("\n \n"), "");
    }
}
