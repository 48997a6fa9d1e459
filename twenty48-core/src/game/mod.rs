//! Game Logic Module
//!
//! All game rules. 100% deterministic given a seed.
//!
//! ## Module Structure
//!
//! - `board`: Grid state and displacement map
//! - `direction`: Directions and the scan-order table
//! - `engine`: Slide/merge transition, win/loss detection
//! - `spawn`: Random tile spawner
//! - `session`: Session controller (start, apply move)
//! - `replay`: Deterministic replay of recorded moves
//! - `events`: Game events for logging/replay

pub mod board;
pub mod direction;
pub mod engine;
pub mod spawn;
pub mod session;
pub mod replay;
pub mod events;

// Re-export key types
pub use board::{Board, DisplacementMap, Offset, Position, Tile, GRID_SIZE};
pub use direction::Direction;
pub use engine::{MoveOutcome, Termination};
pub use session::{GameSession, MoveReport, MoveResult, SessionPhase};
pub use events::{GameEvent, GameEventData};
