//! Random Tile Spawner
//!
//! Drops a 2 (or occasionally a 4) into a uniformly chosen empty cell.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::board::{Board, Position, Tile};

/// Default chance of spawning a 4 instead of a 2.
pub const DEFAULT_FOUR_PERCENT: u8 = 10;

/// A tile placed by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    /// Where the tile landed
    pub position: Position,
    /// 2 or 4
    pub value: Tile,
}

/// Place one random tile on `board`.
///
/// Empty cells are enumerated row-major and one is picked uniformly; the
/// value is 4 with `four_percent`% probability, else 2. A full board is
/// left alone and no randomness is consumed.
pub fn spawn_random_tile(
    board: &mut Board,
    rng: &mut DeterministicRng,
    four_percent: u8,
) -> Option<SpawnedTile> {
    let empty = board.empty_cells();
    let position = *rng.choose(&empty)?;
    let value = if rng.next_percent_chance(four_percent) { 4 } else { 2 };

    board.set(position, value);
    Some(SpawnedTile { position, value })
}
