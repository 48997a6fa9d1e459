//! # Twenty48
//!
//! Deterministic core of a 2048-style tile-merging puzzle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TWENTY48 CORE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── board.rs    - Board and displacement map                │
//! │  ├── direction.rs- Directions and scan-order table           │
//! │  ├── engine.rs   - Slide/merge, win/loss detection           │
//! │  ├── spawn.rs    - Random tile spawner                       │
//! │  ├── session.rs  - Session controller                        │
//! │  ├── replay.rs   - Replay of recorded moves                  │
//! │  └── events.rs   - Game events                               │
//! │                                                              │
//! │  config.rs       - Tunables, JSON loading                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given identical config, seed and direction sequence, a session
//! produces identical boards, scores and state hashes on any platform.
//! Rendering concerns (window, fonts, animation timing) live in the
//! client crate and only read from the session.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use crate::core::rng::DeterministicRng;
pub use game::board::{Board, DisplacementMap, Offset, Position, Tile, GRID_SIZE};
pub use game::direction::Direction;
pub use game::session::{GameSession, MoveReport, MoveResult, SessionPhase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tile value that wins by default
pub const DEFAULT_WIN_VALUE: Tile = 2048;

/// Default rendered cell size in pixels
pub const CELL_SIZE: i32 = 100;

/// Default displacement decay per frame, in pixels
pub const ANIMATION_STEP: i32 = 10;
