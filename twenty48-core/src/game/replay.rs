//! Deterministic Replay
//!
//! A game is fully described by its config, seed and the directions the
//! player pressed. Replaying them reproduces the exact same session.

use crate::config::GameConfig;
use crate::game::direction::Direction;
use crate::game::session::{GameSession, MoveResult};

/// Start a session and feed it every direction in order.
///
/// Directions after the game ended are still fed (and rejected), so the
/// returned results line up one-to-one with `moves`.
pub fn replay_session(
    config: GameConfig,
    seed: u64,
    moves: &[Direction],
) -> (GameSession, Vec<MoveResult>) {
    let mut session = GameSession::new(config, seed);
    session.start();

    let results = moves.iter().map(|&dir| session.apply_move(dir)).collect();

    (session, results)
}

/// Keep only the directions that changed the board.
///
/// Replaying the filtered list gives the same final state, since
/// no-op and rejected moves never touch the session or its RNG.
pub fn accepted_moves(moves: &[Direction], results: &[MoveResult]) -> Vec<Direction> {
    moves
        .iter()
        .zip(results)
        .filter(|(_, result)| result.is_applied())
        .map(|(&dir, _)| dir)
        .collect()
}
