//! Board view components

use bevy::prelude::*;

use twenty48::Position;

/// Static background square of one cell.
#[derive(Component)]
pub struct CellBackground;

/// Sprite showing the tile currently at `0`.
#[derive(Component)]
pub struct TileSprite(pub Position);

/// Number drawn on the tile at `0`.
#[derive(Component)]
pub struct TileLabel(pub Position);

/// Translucent square sliding away from a cell a tile just left.
#[derive(Component)]
pub struct SlideGhost(pub Position);

/// Everything spawned for the board, cleaned up on leaving `Playing`.
#[derive(Component)]
pub struct BoardEntity;
