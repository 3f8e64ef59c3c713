//! Source location tracking for tokens, parse tree nodes and AST nodes.

use serde::Serialize;

/// Represents a span in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A line/column position in the source text.
///
/// Lines are 1-based, columns are 0-based character offsets within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Character offset within the line, starting at 0.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the 1-based column number used when rendering messages.
    #[must_use]
    pub const fn column_number(&self) -> usize {
        self.column + 1
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_column_number() {
        let location = Location::new(1, 16);
        assert_eq!(location.column_number(), 17);
        assert_eq!(Location::default(), Location::new(1, 0));
    }
}
