//! Source positions carried by syntax-tree nodes and diagnostics.

use std::fmt;

/// Position of a node in its source file.
///
/// Lines and columns are 1-indexed. A zero line means the position is
/// unknown, which is what synthesized nodes carry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
}

impl Span {
    /// Create a span at a line and column.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Whether the position is known.
    #[inline]
    pub const fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}", self.line, self.col)
        } else {
            f.write_str("<unknown>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display() {
        assert_eq!(format!("{}", Span::new(3, 15)), "3:15");
        assert_eq!(format!("{:?}", Span::new(1, 2)), "1:2");
    }

    #[test]
    fn default_span_is_unknown() {
        let span = Span::default();
        assert!(!span.is_known());
        assert_eq!(span.to_string(), "<unknown>");
    }
}
