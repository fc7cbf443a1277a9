//! Instruction set and pointer headings.
//!
//! Every grid character that means something decodes to one [`Instruction`];
//! the engine dispatches on the enum rather than on raw characters.

/// Direction of travel of the instruction pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Right,
    Left,
    Up,
    Down,
}

impl Heading {
    /// All four headings, in the order random selection indexes them.
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Left, Heading::Down, Heading::Up];

    /// Unit step as `(column delta, row delta)`; rows grow downward.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Heading::Right => (1, 0),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::Right | Heading::Left)
    }

    /// Heading after meeting `mirror`.
    pub fn reflect(self, mirror: Mirror) -> Heading {
        use Heading::*;
        match (mirror, self) {
            // `/`
            (Mirror::Forward, Right) => Up,
            (Mirror::Forward, Left) => Down,
            (Mirror::Forward, Down) => Left,
            (Mirror::Forward, Up) => Right,
            // `\`
            (Mirror::Backward, Right) => Down,
            (Mirror::Backward, Left) => Up,
            (Mirror::Backward, Down) => Right,
            (Mirror::Backward, Up) => Left,
            // `_` only turns vertical travel around
            (Mirror::Horizontal, Down) => Up,
            (Mirror::Horizontal, Up) => Down,
            (Mirror::Horizontal, h) => h,
            // `|` only turns horizontal travel around
            (Mirror::Vertical, Right) => Left,
            (Mirror::Vertical, Left) => Right,
            (Mirror::Vertical, h) => h,
            // `#`
            (Mirror::Cross, Right) => Left,
            (Mirror::Cross, Left) => Right,
            (Mirror::Cross, Down) => Up,
            (Mirror::Cross, Up) => Down,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heading::Right => "right",
            Heading::Left => "left",
            Heading::Up => "up",
            Heading::Down => "down",
        }
    }
}

/// Mirror shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// `/`
    Forward,
    /// `\`
    Backward,
    /// `_`
    Horizontal,
    /// `|`
    Vertical,
    /// `#`
    Cross,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// `,` real-valued division.
    Div,
    Mod,
}

impl ArithOp {
    pub fn symbol(self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
            ArithOp::Mul => '*',
            ArithOp::Div => ',',
            ArithOp::Mod => '%',
        }
    }
}

/// All instructions of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // ═══════════════════════════════════════════════════════════════════
    // Motion
    // ═══════════════════════════════════════════════════════════════════

    /// Blank, space or NUL.
    Nop,

    /// `> < ^ v`
    Face(Heading),

    /// `/ \ _ | #`
    Reflect(Mirror),

    /// `x`
    RandomHeading,

    /// `!` skip the next instruction.
    Trampoline,

    /// `?` pop; skip the next instruction if it was zero.
    /// Stack: ( a -- )
    ConditionalTrampoline,

    /// `.` move the pointer to (x, y).
    /// Stack: ( x y -- )
    Jump,

    // ═══════════════════════════════════════════════════════════════════
    // Literals & Arithmetic
    // ═══════════════════════════════════════════════════════════════════

    /// `0-9 a-f`
    /// Stack: ( -- n )
    Literal(u8),

    /// `+ - * , %`
    /// Stack: ( x y -- x<op>y )
    Arithmetic(ArithOp),

    /// `=`
    /// Stack: ( x y -- x==y )
    Equals,

    /// `)`
    /// Stack: ( x y -- x>y )
    GreaterThan,

    /// `(`
    /// Stack: ( x y -- x<y )
    LessThan,

    /// `'` or `"`: toggle string-parse mode for this quote.
    Quote(char),

    // ═══════════════════════════════════════════════════════════════════
    // Stack Manipulation
    // ═══════════════════════════════════════════════════════════════════

    /// `:`
    /// Stack: ( a -- a a )
    Duplicate,

    /// `~`
    /// Stack: ( a -- )
    Remove,

    /// `$`
    /// Stack: ( x y -- y x )
    Swap2,

    /// `@`
    /// Stack: ( x y z -- z x y )
    Swap3,

    /// `}` rotate the whole stack right.
    ShiftRight,

    /// `{` rotate the whole stack left.
    ShiftLeft,

    /// `r`
    Reverse,

    /// `l`
    /// Stack: ( -- len )
    Length,

    /// `[` pop n, move n values into a new frame.
    NewFrame,

    /// `]` destroy the active frame.
    DeleteFrame,

    // ═══════════════════════════════════════════════════════════════════
    // I/O, Register & Codebox
    // ═══════════════════════════════════════════════════════════════════

    /// `o`
    /// Stack: ( c -- )
    OutChar,

    /// `n`
    /// Stack: ( n -- )
    OutNumber,

    /// `i`
    /// Stack: ( -- c )
    Read,

    /// `&`
    Register,

    /// `g`
    /// Stack: ( x y -- v )
    Get,

    /// `p`
    /// Stack: ( v x y -- )
    Put,

    /// `;`
    Halt,
}

impl Instruction {
    /// Decode a cell's code unit. `None` for characters with no meaning.
    pub fn decode(code_point: u32) -> Option<Instruction> {
        let c = char::from_u32(code_point)?;
        let instruction = match c {
            ' ' | '\0' => Instruction::Nop,
            '>' => Instruction::Face(Heading::Right),
            '<' => Instruction::Face(Heading::Left),
            '^' => Instruction::Face(Heading::Up),
            'v' => Instruction::Face(Heading::Down),
            '/' => Instruction::Reflect(Mirror::Forward),
            '\\' => Instruction::Reflect(Mirror::Backward),
            '_' => Instruction::Reflect(Mirror::Horizontal),
            '|' => Instruction::Reflect(Mirror::Vertical),
            '#' => Instruction::Reflect(Mirror::Cross),
            'x' => Instruction::RandomHeading,
            '!' => Instruction::Trampoline,
            '?' => Instruction::ConditionalTrampoline,
            '.' => Instruction::Jump,
            '0'..='9' | 'a'..='f' => Instruction::Literal(c.to_digit(16)? as u8),
            '+' => Instruction::Arithmetic(ArithOp::Add),
            '-' => Instruction::Arithmetic(ArithOp::Sub),
            '*' => Instruction::Arithmetic(ArithOp::Mul),
            ',' => Instruction::Arithmetic(ArithOp::Div),
            '%' => Instruction::Arithmetic(ArithOp::Mod),
            '=' => Instruction::Equals,
            ')' => Instruction::GreaterThan,
            '(' => Instruction::LessThan,
            '\'' | '"' => Instruction::Quote(c),
            ':' => Instruction::Duplicate,
            '~' => Instruction::Remove,
            '$' => Instruction::Swap2,
            '@' => Instruction::Swap3,
            '}' => Instruction::ShiftRight,
            '{' => Instruction::ShiftLeft,
            'r' => Instruction::Reverse,
            'l' => Instruction::Length,
            '[' => Instruction::NewFrame,
            ']' => Instruction::DeleteFrame,
            'o' => Instruction::OutChar,
            'n' => Instruction::OutNumber,
            'i' => Instruction::Read,
            '&' => Instruction::Register,
            'g' => Instruction::Get,
            'p' => Instruction::Put,
            ';' => Instruction::Halt,
            _ => return None,
        };
        Some(instruction)
    }

    /// Canonical source character (`' '` for [`Instruction::Nop`]).
    pub fn symbol(&self) -> char {
        match *self {
            Instruction::Nop => ' ',
            Instruction::Face(Heading::Right) => '>',
            Instruction::Face(Heading::Left) => '<',
            Instruction::Face(Heading::Up) => '^',
            Instruction::Face(Heading::Down) => 'v',
            Instruction::Reflect(Mirror::Forward) => '/',
            Instruction::Reflect(Mirror::Backward) => '\\',
            Instruction::Reflect(Mirror::Horizontal) => '_',
            Instruction::Reflect(Mirror::Vertical) => '|',
            Instruction::Reflect(Mirror::Cross) => '#',
            Instruction::RandomHeading => 'x',
            Instruction::Trampoline => '!',
            Instruction::ConditionalTrampoline => '?',
            Instruction::Jump => '.',
            Instruction::Literal(d) => char::from_digit(u32::from(d), 16).unwrap_or('?'),
            Instruction::Arithmetic(op) => op.symbol(),
            Instruction::Equals => '=',
            Instruction::GreaterThan => ')',
            Instruction::LessThan => '(',
            Instruction::Quote(q) => q,
            Instruction::Duplicate => ':',
            Instruction::Remove => '~',
            Instruction::Swap2 => '$',
            Instruction::Swap3 => '@',
            Instruction::ShiftRight => '}',
            Instruction::ShiftLeft => '{',
            Instruction::Reverse => 'r',
            Instruction::Length => 'l',
            Instruction::NewFrame => '[',
            Instruction::DeleteFrame => ']',
            Instruction::OutChar => 'o',
            Instruction::OutNumber => 'n',
            Instruction::Read => 'i',
            Instruction::Register => '&',
            Instruction::Get => 'g',
            Instruction::Put => 'p',
            Instruction::Halt => ';',
        }
    }
}
