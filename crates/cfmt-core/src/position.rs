//! Points and half-open byte intervals in a document.
//!
//! A [`Position`] carries both the tree-sitter style `(row, column)` pair and the absolute byte
//! offset. Ordering only looks at `(row, column)`; two positions on the same row and column
//! always share a byte offset within one document version.

use std::cmp::Ordering;
use std::fmt;
use tree_sitter::{Node, Point};

/// A point in the document: zero-based row, zero-based byte column, absolute byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based line.
    pub row: usize,
    /// Zero-based byte column within the line.
    pub column: usize,
    /// Absolute byte offset from the start of the document.
    pub byte_offset: usize,
}

impl Position {
    /// Create a position.
    pub fn new(row: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            row,
            column,
            byte_offset,
        }
    }

    /// Start of a CST node.
    pub fn start_of(node: Node<'_>) -> Self {
        Self::from_point(node.start_position(), node.start_byte())
    }

    /// End of a CST node.
    pub fn end_of(node: Node<'_>) -> Self {
        Self::from_point(node.end_position(), node.end_byte())
    }

    /// Build from a tree-sitter point and its byte offset.
    pub fn from_point(point: Point, byte_offset: usize) -> Self {
        Self::new(point.row, point.column, byte_offset)
    }

    /// Byte offset of the first byte of this position's line.
    pub fn line_start(&self) -> usize {
        self.byte_offset - self.column
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl Range {
    /// Create a range.
    ///
    /// # Panics
    /// If `end` precedes `start`.
    pub fn new(start: Position, end: Position) -> Self {
        assert!(
            start.byte_offset <= end.byte_offset,
            "range end {end} precedes start {start}"
        );
        Self { start, end }
    }

    /// The range covered by a CST node.
    pub fn of(node: Node<'_>) -> Self {
        Self::new(Position::start_of(node), Position::end_of(node))
    }

    /// The whitespace (or other text) strictly between two nodes.
    pub fn between(left: Node<'_>, right: Node<'_>) -> Self {
        Self::new(Position::end_of(left), Position::start_of(right))
    }

    /// Number of bytes covered.
    pub fn byte_count(&self) -> usize {
        self.end.byte_offset - self.start.byte_offset
    }

    /// Returns `true` if the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.byte_count() == 0
    }

    /// Returns `true` if the range spans more than one row.
    pub fn is_multiline(&self) -> bool {
        self.end.row > self.start.row
    }

    /// Returns `true` if `offset` lies in `[start, end)`.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start.byte_offset <= offset && offset < self.end.byte_offset
    }

    /// Returns `true` if `other` lies entirely within this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.start.byte_offset <= other.start.byte_offset
            && other.end.byte_offset <= self.end.byte_offset
    }

    /// Returns `true` if the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start.byte_offset < other.end.byte_offset
            && other.start.byte_offset < self.end.byte_offset
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
