//! Board view - cell layout, tile sprites and slide ghosts
//!
//! Board coordinates are screen-style: row 0 at the top, offsets with
//! positive `dy` pointing down. Bevy's world has y up and the origin at
//! the window centre, so everything goes through [`BoardLayout`].

use bevy::prelude::*;

use twenty48::{Offset, Position, Tile, GRID_SIZE};

use super::{ActiveSession, BoardEntity, CellBackground, ClientConfig, SlideAnimation, SlideGhost, TileLabel, TileSprite};

/// Height of the score strip above the board, in pixels.
pub const HEADER_HEIGHT: f32 = 50.0;

/// Window background, visible as the gaps between cells.
pub const BACKGROUND_COLOR: Color = Color::srgb_u8(187, 173, 160);

const EMPTY_CELL_COLOR: Color = Color::srgb_u8(205, 193, 180);
const TILE_COLOR: Color = Color::srgb_u8(238, 228, 218);
const GHOST_COLOR: Color = Color::srgba_u8(238, 228, 218, 153);
const TILE_TEXT_COLOR: Color = Color::srgb_u8(119, 110, 101);

/// Gap between neighbouring cells.
const CELL_GAP: f32 = 8.0;

// Draw order
const Z_CELL: f32 = 0.0;
const Z_GHOST: f32 = 1.0;
const Z_TILE: f32 = 2.0;
const Z_LABEL: f32 = 3.0;

/// Maps board cells to world space for a given cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub cell_size: f32,
}

impl BoardLayout {
    pub fn new(cell_size: i32) -> Self {
        Self { cell_size: cell_size as f32 }
    }

    pub fn window_size(&self) -> Vec2 {
        let width = self.cell_size * GRID_SIZE as f32;
        Vec2::new(width, width + HEADER_HEIGHT)
    }

    /// Centre of `pos` in window pixels (origin top-left, y down).
    pub fn screen_center(&self, pos: Position) -> Vec2 {
        Vec2::new(
            (pos.col as f32 + 0.5) * self.cell_size,
            HEADER_HEIGHT + (pos.row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Window pixels to world units.
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        let half = self.window_size() / 2.0;
        Vec2::new(screen.x - half.x, half.y - screen.y)
    }

    pub fn cell_center(&self, pos: Position) -> Vec2 {
        self.to_world(self.screen_center(pos))
    }

    /// Side of the square drawn inside a cell.
    pub fn tile_side(&self) -> f32 {
        (self.cell_size - CELL_GAP).max(1.0)
    }
}

/// Where the ghost leaving `pos` is drawn this frame.
///
/// It starts on the vacated cell and travels the part of `initial` that
/// has already decayed away, ending on the destination.
pub fn ghost_center(layout: &BoardLayout, pos: Position, initial: Offset, current: Offset) -> Vec2 {
    let travelled = Vec2::new(
        (initial.dx - current.dx) as f32,
        (initial.dy - current.dy) as f32,
    );
    layout.to_world(layout.screen_center(pos) + travelled)
}

fn label_font_size(cell_size: f32, value: Tile) -> f32 {
    let digits = value.max(1).ilog10() + 1;
    match digits {
        1 | 2 => cell_size * 0.45,
        3 => cell_size * 0.38,
        4 => cell_size * 0.3,
        _ => cell_size * 0.24,
    }
}

// ============================================================================
// SPAWNING
// ============================================================================

/// Spawn one background, tile, label and ghost per cell.
pub fn spawn_board(mut commands: Commands, config: Res<ClientConfig>) {
    let layout = BoardLayout::new(config.0.cell_size);
    let side = Vec2::splat(layout.tile_side());

    for pos in Position::all() {
        let center = layout.cell_center(pos);

        commands.spawn((
            CellBackground,
            BoardEntity,
            Sprite {
                color: EMPTY_CELL_COLOR,
                custom_size: Some(side),
                ..default()
            },
            Transform::from_translation(center.extend(Z_CELL)),
        ));

        commands.spawn((
            SlideGhost(pos),
            BoardEntity,
            Sprite {
                color: GHOST_COLOR,
                custom_size: Some(side),
                ..default()
            },
            Transform::from_translation(center.extend(Z_GHOST)),
            Visibility::Hidden,
        ));

        commands.spawn((
            TileSprite(pos),
            BoardEntity,
            Sprite {
                color: TILE_COLOR,
                custom_size: Some(side),
                ..default()
            },
            Transform::from_translation(center.extend(Z_TILE)),
            Visibility::Hidden,
        ));

        commands.spawn((
            TileLabel(pos),
            BoardEntity,
            Text2d::new(""),
            TextFont {
                font_size: label_font_size(layout.cell_size, 2),
                ..default()
            },
            TextColor(TILE_TEXT_COLOR),
            Transform::from_translation(center.extend(Z_LABEL)),
        ));
    }

    info!("Board spawned ({}px cells)", layout.cell_size);
}

// ============================================================================
// SYNC
// ============================================================================

/// Show a tile sprite and label for every occupied cell.
pub fn sync_tiles(
    session: Res<ActiveSession>,
    config: Res<ClientConfig>,
    mut tiles: Query<(&TileSprite, &mut Visibility)>,
    mut labels: Query<(&TileLabel, &mut Text2d, &mut TextFont)>,
) {
    if !session.is_changed() {
        return;
    }
    let board = session.0.board();
    let cell_size = config.0.cell_size as f32;

    for (tile, mut visibility) in tiles.iter_mut() {
        *visibility = if board.get(tile.0) == 0 {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
    }

    for (label, mut text, mut font) in labels.iter_mut() {
        let value = board.get(label.0);
        if value == 0 {
            text.0.clear();
        } else {
            text.0 = value.to_string();
            font.font_size = label_font_size(cell_size, value);
        }
    }
}

/// Move and show ghosts for cells that still carry an offset.
pub fn sync_slide_ghosts(
    animation: Res<SlideAnimation>,
    config: Res<ClientConfig>,
    mut ghosts: Query<(&SlideGhost, &mut Transform, &mut Visibility)>,
) {
    if !animation.is_changed() {
        return;
    }
    let layout = BoardLayout::new(config.0.cell_size);

    for (ghost, mut transform, mut visibility) in ghosts.iter_mut() {
        let current = animation.current.get(ghost.0);
        if current.is_zero() {
            *visibility = Visibility::Hidden;
            continue;
        }

        let initial = animation.initial.get(ghost.0);
        let center = ghost_center(&layout, ghost.0, initial, current);
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        *visibility = Visibility::Visible;
    }
}
