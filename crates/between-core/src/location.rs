//! Source positions shared by tokens, syntax nodes and errors.
//!
//! Every location carries both byte offsets (for exact slicing of the source
//! text) and zero-based row/column points (for editor ranges). Columns count
//! Unicode scalar values, not bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based row/column position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: u32,
    pub col: u32,
}

impl Point {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Point {
    /// Human-facing form is one-based, `line:col`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

/// A half-open source span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start: Point,
    pub end: Point,
}

impl Location {
    pub fn new(byte_start: usize, byte_end: usize, start: Point, end: Point) -> Self {
        Self {
            byte_start,
            byte_end,
            start,
            end,
        }
    }

    /// Zero-width location at a point.
    pub fn empty_at(byte: usize, point: Point) -> Self {
        Self::new(byte, byte, point, point)
    }

    /// Zero-width location at the start of `self`.
    pub fn start_only(&self) -> Self {
        Self::empty_at(self.byte_start, self.start)
    }

    /// Slice the source text this location was produced from.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.byte_start..self.byte_end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.start.fmt(f)
    }
}
