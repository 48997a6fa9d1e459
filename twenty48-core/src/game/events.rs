//! Game Events
//!
//! Events generated by the session for logging, HUD effects and replay
//! inspection. The session queues them; callers drain with `take_events`.

use serde::{Serialize, Deserialize};

use crate::game::board::{Position, Tile};
use crate::game::direction::Direction;
use crate::game::engine::Termination;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A fresh board was dealt
    SessionStarted {
        seed: u64,
    },

    /// The spawner placed a tile
    TileSpawned {
        position: Position,
        value: Tile,
    },

    /// Two tiles merged into `position`
    TilesMerged {
        position: Position,
        value: Tile,
    },

    /// A move changed the board
    MoveApplied {
        direction: Direction,
        score_delta: u64,
        merges: u32,
    },

    /// The session reached a terminal state
    GameEnded {
        termination: Termination,
        score: u64,
        move_count: u32,
    },
}

/// A game event stamped with the move it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Move count at the time the event was produced (0 = opening deal)
    pub move_index: u32,
    /// Event payload
    pub data: GameEventData,
}

impl GameEvent {
    /// Create an event.
    pub fn new(move_index: u32, data: GameEventData) -> Self {
        Self { move_index, data }
    }

    /// True for the event that closes a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::GameEnded { .. })
    }

    /// Serialize to a single JSON line (for event logs).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
