//! Move Engine
//!
//! Pure slide-and-merge transition plus win/loss evaluation.
//!
//! ## Merge-once
//!
//! Each line keeps an `absorbed` flag per index. A cell that received a
//! merge during this pass behaves like a mismatched tile for every later
//! source on the same line, so `[2, 2, 2, 2]` moved left becomes
//! `[4, 4, 0, 0]` and never `[8, 0, 0, 0]`.

use serde::{Serialize, Deserialize};

use crate::game::board::{Board, DisplacementMap, Offset, Position, Tile, GRID_SIZE};
use crate::game::direction::Direction;

/// Result of sliding a board in one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after sliding and merging (no spawn yet)
    pub board: Board,
    /// Sum of all tiles created by merges in this move
    pub score_delta: u64,
    /// Number of merge pairs
    pub merges: u32,
    /// Vacated-cell offsets, in cell units
    pub displacement: DisplacementMap,
    /// Positions that received a merge, with their new value
    pub merged_into: [Option<(Position, Tile)>; GRID_SIZE * GRID_SIZE / 2],
    /// Did any tile change position or value?
    pub moved: bool,
}

impl MoveOutcome {
    /// Merged destinations recorded during the move.
    pub fn merged_cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.merged_into.iter().flatten().copied()
    }
}

/// Why a session stopped accepting moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The win value appeared on the board
    Won,
    /// The board is full and no adjacent pair matches
    Lost,
}

#[inline]
fn in_line(index: isize) -> bool {
    index >= 0 && (index as usize) < GRID_SIZE
}

/// Slide and merge every line of `board` toward `direction`.
///
/// The input board is not modified. For each source tile, walk along the
/// slide direction across empty cells:
/// - the first occupied cell holds the same value and has not absorbed a
///   merge yet: merge into it;
/// - otherwise: stop on the last empty cell reached, if that differs from
///   the source.
pub fn slide_and_merge(board: &Board, direction: Direction) -> MoveOutcome {
    let scan = direction.scan_order();
    let slide = scan.slide_step();

    let mut next = *board;
    let mut displacement = DisplacementMap::SETTLED;
    let mut merged_into = [None; GRID_SIZE * GRID_SIZE / 2];
    let mut score_delta = 0u64;
    let mut merges = 0u32;
    let mut moved = false;

    for line in 0..GRID_SIZE {
        let mut absorbed = [false; GRID_SIZE];

        for index in scan.indices() {
            let from = scan.position(line, index);
            let value = next.get(from);
            if value == 0 {
                continue;
            }

            let mut probe = index as isize + slide;
            while in_line(probe) && next.get(scan.position(line, probe as usize)) == 0 {
                probe += slide;
            }

            let destination = if in_line(probe)
                && !absorbed[probe as usize]
                && next.get(scan.position(line, probe as usize)) == value
            {
                let target = probe as usize;
                let merged = value * 2;
                next.set(scan.position(line, target), merged);
                absorbed[target] = true;
                merged_into[merges as usize] = Some((scan.position(line, target), merged));
                score_delta += u64::from(merged);
                merges += 1;
                target
            } else {
                let rest = (probe - slide) as usize;
                if rest == index {
                    continue;
                }
                next.set(scan.position(line, rest), value);
                rest
            };

            next.set(from, 0);
            let to = scan.position(line, destination);
            displacement.set(
                from,
                Offset::new(
                    to.col as i32 - from.col as i32,
                    to.row as i32 - from.row as i32,
                ),
            );
            moved = true;
        }
    }

    MoveOutcome {
        board: next,
        score_delta,
        merges,
        displacement,
        merged_into,
        moved,
    }
}

/// True if any cell is empty or any orthogonally adjacent pair matches.
pub fn can_move(board: &Board) -> bool {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = board.get(Position::new(row, col));
            if value == 0 {
                return true;
            }
            if row + 1 < GRID_SIZE && board.get(Position::new(row + 1, col)) == value {
                return true;
            }
            if col + 1 < GRID_SIZE && board.get(Position::new(row, col + 1)) == value {
                return true;
            }
        }
    }
    false
}

/// True if `value` appears anywhere on the board.
#[inline]
pub fn contains_value(board: &Board, value: Tile) -> bool {
    board.contains(value)
}

/// Decide whether a committed board ends the game.
///
/// The win check runs first and short-circuits: a board that reaches
/// `win_value` and is also locked reports `Won` only.
pub fn evaluate_termination(board: &Board, win_value: Tile) -> Option<Termination> {
    if contains_value(board, win_value) {
        return Some(Termination::Won);
    }
    if !can_move(board) {
        return Some(Termination::Lost);
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
