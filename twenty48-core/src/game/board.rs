//! Grid State
//!
//! The authoritative board plus the displacement map the renderer uses
//! to animate the last move.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Board dimension (cells per side).
pub const GRID_SIZE: usize = 4;

/// A cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;

// =============================================================================
// POSITION
// =============================================================================

/// A cell coordinate. Row 0 is the top row, column 0 the left column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0..GRID_SIZE)
    pub row: usize,
    /// Column index (0..GRID_SIZE)
    pub col: usize,
}

impl Position {
    /// Create a position. Callers keep both coordinates below `GRID_SIZE`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index (0..GRID_SIZE²).
    #[inline]
    pub fn index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    /// Iterate over every position in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position::new(row, col)))
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// Square matrix of tiles.
///
/// Treated as a value: the move engine reads one board and produces a new
/// one, the session swaps it in on success.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Tile; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    /// All cells empty.
    pub const EMPTY: Board = Board { cells: [[0; GRID_SIZE]; GRID_SIZE] };

    /// Build a board from rows, top to bottom.
    pub const fn from_rows(cells: [[Tile; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Borrow the rows, top to bottom.
    pub fn rows(&self) -> &[[Tile; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Value at `pos`.
    #[inline]
    pub fn get(&self, pos: Position) -> Tile {
        self.cells[pos.row][pos.col]
    }

    /// Overwrite the value at `pos`.
    #[inline]
    pub fn set(&mut self, pos: Position, value: Tile) {
        self.cells[pos.row][pos.col] = value;
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all().filter(|&p| self.get(p) == 0).collect()
    }

    /// Number of non-zero tiles.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values. Sliding and merging never change it.
    pub fn value_sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile on the board (0 for an empty board).
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// True if any cell holds exactly `value`.
    pub fn contains(&self, value: Tile) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    /// Every non-zero cell is a power of two and at least 2.
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two()))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, &value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{value:>5}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// DISPLACEMENT
// =============================================================================

/// 2D integer offset. Cell units inside the engine, pixels once scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal component (positive = right)
    pub dx: i32,
    /// Vertical component (positive = down)
    pub dy: i32,
}

impl Offset {
    /// No displacement.
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    /// Create an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// True when both components are zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Move one component toward zero by `step`, snapping to zero once the
/// remaining magnitude drops below `step`.
fn decay_component(value: &mut i32, step: i32) {
    if *value == 0 {
        return;
    }
    *value -= if *value > 0 { step } else { -step };
    if value.abs() < step {
        *value = 0;
    }
}

/// Per-cell offsets recorded by the last accepted move.
///
/// Only the cell a tile vacated carries an offset: the vector from that
/// cell to where the tile ended up. This is a presentation hint and never
/// influences game rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplacementMap {
    offsets: [[Offset; GRID_SIZE]; GRID_SIZE],
}

impl DisplacementMap {
    /// All offsets zero.
    pub const SETTLED: DisplacementMap = DisplacementMap {
        offsets: [[Offset::ZERO; GRID_SIZE]; GRID_SIZE],
    };

    /// Offset recorded at `pos`.
    #[inline]
    pub fn get(&self, pos: Position) -> Offset {
        self.offsets[pos.row][pos.col]
    }

    /// Record an offset at `pos`.
    #[inline]
    pub fn set(&mut self, pos: Position, offset: Offset) {
        self.offsets[pos.row][pos.col] = offset;
    }

    /// Multiply every offset by `factor` (cell units to pixels).
    pub fn scaled(mut self, factor: i32) -> Self {
        for offset in self.offsets.iter_mut().flatten() {
            offset.dx *= factor;
            offset.dy *= factor;
        }
        self
    }

    /// Advance the animation by one frame.
    ///
    /// Returns true if any offset was still non-zero before this step,
    /// i.e. the caller should redraw.
    pub fn decay(&mut self, step: i32) -> bool {
        let mut animating = false;
        for offset in self.offsets.iter_mut().flatten() {
            if !offset.is_zero() {
                animating = true;
                decay_component(&mut offset.dx, step);
                decay_component(&mut offset.dy, step);
            }
        }
        animating
    }

    /// True when every offset is zero.
    pub fn is_settled(&self) -> bool {
        self.offsets.iter().flatten().all(|o| o.is_zero())
    }

    /// Non-zero offsets with their positions, row-major.
    pub fn active(&self) -> impl Iterator<Item = (Position, Offset)> + '_ {
        Position::all()
            .map(move |p| (p, self.get(p)))
            .filter(|(_, o)| !o.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.empty_cells().len(), GRID_SIZE * GRID_SIZE);
        assert_eq!(board.max_tile(), 0);
        assert!(board.is_well_formed());
    }

    #[test]
    fn test_empty_cells_row_major() {
        let board = Board::from_rows([
            [2, 0, 2, 2],
            [2, 2, 2, 2],
            [2, 2, 2, 0],
            [2, 2, 2, 2],
        ]);
        assert_eq!(board.empty_cells(), vec![Position::new(0, 1), Position::new(2, 3)]);
        assert_eq!(board.tile_count(), 14);
        assert_eq!(board.value_sum(), 28);
    }

    #[test]
    fn test_well_formed() {
        let mut board = Board::EMPTY;
        board.set(Position::new(1, 1), 2048);
        assert!(board.is_well_formed());
        assert!(board.contains(2048));

        board.set(Position::new(0, 0), 1);
        assert!(!board.is_well_formed());

        board.set(Position::new(0, 0), 6);
        assert!(!board.is_well_formed());
    }

    #[test]
    fn test_display_renders_rows() {
        let board = Board::from_rows([
            [2, 0, 0, 0],
            [0, 4, 0, 0],
            [0, 0, 8, 0],
            [0, 0, 0, 2048],
        ]);
        let text = board.to_string();
        assert_eq!(text.lines().count(), GRID_SIZE);
        assert!(text.lines().last().unwrap().ends_with("2048"));
    }

    #[test]
    fn test_displacement_scaling() {
        let mut map = DisplacementMap::SETTLED;
        map.set(Position::new(0, 3), Offset::new(-3, 0));
        map.set(Position::new(2, 1), Offset::new(0, 2));

        let pixels = map.scaled(100);
        assert_eq!(pixels.get(Position::new(0, 3)), Offset::new(-300, 0));
        assert_eq!(pixels.get(Position::new(2, 1)), Offset::new(0, 200));
        assert_eq!(pixels.active().count(), 2);
    }

    #[test]
    fn test_displacement_decay_reaches_zero() {
        let mut map = DisplacementMap::SETTLED;
        map.set(Position::new(1, 0), Offset::new(100, 0));
        map.set(Position::new(3, 3), Offset::new(0, -25));

        let mut frames = 0;
        while map.decay(10) {
            frames += 1;
            assert!(frames <= 10, "decay must terminate");
        }
        assert!(map.is_settled());
        // 100 px at 10 px/frame: the 10th frame snaps the last 10 px to zero
        assert_eq!(frames, 10);
    }

    #[test]
    fn test_decay_snaps_small_remainder() {
        let mut map = DisplacementMap::SETTLED;
        map.set(Position::new(0, 0), Offset::new(-15, 0));

        assert!(map.decay(10));
        // -15 + 10 = -5, below one step, snapped
        assert!(map.is_settled());
        assert!(!map.decay(10));
    }
}
