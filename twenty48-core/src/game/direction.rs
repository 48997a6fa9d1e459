//! Move Directions
//!
//! Maps the four player directions onto an explicit scan-order table so
//! the move engine never branches on the sign of a delta.

use serde::{Serialize, Deserialize};

use crate::game::board::{Position, GRID_SIZE};

/// A player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Tiles slide toward row 0
    Up = 0,
    /// Tiles slide toward the last row
    Down = 1,
    /// Tiles slide toward column 0
    Left = 2,
    /// Tiles slide toward the last column
    Right = 3,
}

impl Direction {
    /// Every direction, in table order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)` of a sliding tile. Exactly one component is non-zero.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Scan order used by the move engine.
    #[inline]
    pub const fn scan_order(self) -> ScanOrder {
        SCAN_TABLE[self as usize]
    }

    /// Map a key name to a direction.
    ///
    /// Accepts arrow key names and WASD, case-insensitive. Anything else
    /// is not a move and yields `None`.
    pub fn from_key_name(name: &str) -> Option<Direction> {
        match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Some(Direction::Up),
            "down" | "arrowdown" | "s" => Some(Direction::Down),
            "left" | "arrowleft" | "a" => Some(Direction::Left),
            "right" | "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

// =============================================================================
// SCAN ORDER TABLE
// =============================================================================

/// Which index of a position walks along a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Lines are rows; tiles move between columns.
    Row,
    /// Lines are columns; tiles move between rows.
    Column,
}

/// How to visit source cells of one line for a given direction.
///
/// Sources are visited starting next to the destination edge and moving
/// away from it, so every tile meets its final neighbour before any tile
/// behind it is processed. The edge cell itself is never a source: it has
/// nowhere to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOrder {
    /// Primary axis
    pub axis: Axis,
    /// First source index visited
    pub start: usize,
    /// Increment between visited indices (+1 or -1)
    pub step: isize,
}

/// Indexed by `Direction as usize`.
const SCAN_TABLE: [ScanOrder; 4] = [
    scan_for(Direction::Up),
    scan_for(Direction::Down),
    scan_for(Direction::Left),
    scan_for(Direction::Right),
];

/// Derive a table row from the direction's unit delta.
///
/// The axis is the one the delta moves along. Scanning runs against the
/// slide, starting one cell in from the destination edge.
const fn scan_for(direction: Direction) -> ScanOrder {
    let (dx, dy) = direction.delta();
    let (axis, along) = if dx != 0 { (Axis::Row, dx) } else { (Axis::Column, dy) };
    let start = if along < 0 { 1 } else { GRID_SIZE - 2 };
    ScanOrder { axis, start, step: -along as isize }
}

impl ScanOrder {
    /// Direction a tile travels along the line: opposite to the scan.
    #[inline]
    pub const fn slide_step(self) -> isize {
        -self.step
    }

    /// Source indices in visiting order (`GRID_SIZE - 1` of them).
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..GRID_SIZE - 1).map(move |i| (self.start as isize + self.step * i as isize) as usize)
    }

    /// Board position of `index` on `line`.
    #[inline]
    pub fn position(self, line: usize, index: usize) -> Position {
        match self.axis {
            Axis::Row => Position::new(line, index),
            Axis::Column => Position::new(index, line),
        }
    }
}
