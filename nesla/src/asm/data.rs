use std::fmt::{Debug, Display, Formatter};

/// A source position, defined by its one-based line and zero-based column.
/// Lines start at one because they are reported to users verbatim in diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }

    /// The position of the first character of a file
    ///```
    /// use nesla::asm::Position;
    ///
    /// assert_eq!(Position::start(), Position::new(1, 0));
    ///```
    pub fn start() -> Position {
        Position::new(1, 0)
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the position one character to the right
    pub fn next_column(&self) -> Position {
        Position::new(self.line, self.column.saturating_add(1))
    }

    /// Returns the first position of the following line
    pub fn next_line(&self) -> Position {
        Position::new(self.line.saturating_add(1), 0)
    }
}
