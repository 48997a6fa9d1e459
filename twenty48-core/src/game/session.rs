//! Session Controller
//!
//! Owns one game from the opening deal to a terminal state. All state
//! lives in a single `GameSession` value; the input layer calls `start`
//! and `apply_move`, the render layer reads the accessors.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::board::{Board, DisplacementMap};
use crate::game::direction::Direction;
use crate::game::engine::{evaluate_termination, slide_and_merge, Termination};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::spawn::{spawn_random_tile, SpawnedTile};

/// Tiles dealt by `start`.
pub const STARTING_TILES: usize = 2;

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created but no board dealt yet
    #[default]
    NotStarted,
    /// Accepting moves
    Playing,
    /// Win value reached
    Won,
    /// No legal moves remain
    Lost,
}

impl SessionPhase {
    /// True once the session stops accepting moves.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

impl From<Termination> for SessionPhase {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Won => SessionPhase::Won,
            Termination::Lost => SessionPhase::Lost,
        }
    }
}

/// What an accepted move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Direction applied
    pub direction: Direction,
    /// Score gained
    pub score_delta: u64,
    /// Merge pairs
    pub merges: u32,
    /// Tile added after the slide (None only if the board was full)
    pub spawned: Option<SpawnedTile>,
    /// Set when this move ended the game
    pub termination: Option<Termination>,
}

/// Result of `GameSession::apply_move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Session not started or already over; nothing changed
    Rejected(SessionPhase),
    /// The direction moved no tile; nothing changed
    NoChange,
    /// The board changed and a tile was spawned
    Applied(MoveReport),
}

impl MoveResult {
    /// True if the session state changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied(_))
    }
}

/// A single-player game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,

    /// Seed the RNG was created from (for verification)
    seed: u64,

    rng: DeterministicRng,

    board: Board,

    /// Pixel offsets from the last accepted move
    displacement: DisplacementMap,

    score: u64,

    move_count: u32,

    phase: SessionPhase,

    /// Events since the last `take_events`
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session that has not started yet.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: DeterministicRng::new(seed),
            board: Board::EMPTY,
            displacement: DisplacementMap::SETTLED,
            score: 0,
            move_count: 0,
            phase: SessionPhase::NotStarted,
            pending_events: Vec::new(),
        }
    }

    /// Create a session already in play from a given position.
    ///
    /// Score and move count start at zero; no tiles are spawned.
    pub fn with_board(config: GameConfig, seed: u64, board: Board) -> Self {
        let mut session = Self::new(config, seed);
        session.board = board;
        session.phase = SessionPhase::Playing;
        session
    }

    /// Deal a fresh game: clear everything, then spawn two tiles.
    ///
    /// The RNG keeps its stream, so restarting does not replay the
    /// previous opening.
    pub fn start(&mut self) {
        self.board = Board::EMPTY;
        self.displacement = DisplacementMap::SETTLED;
        self.score = 0;
        self.move_count = 0;
        self.phase = SessionPhase::Playing;

        self.push_event(GameEventData::SessionStarted { seed: self.seed });
        for _ in 0..STARTING_TILES {
            self.spawn_tile();
        }

        info!("Session started (seed {})", self.seed);
    }

    /// Start over after a finished (or abandoned) game.
    pub fn restart(&mut self) {
        self.start();
    }

    /// Apply a player move.
    ///
    /// Rejected unless the session is `Playing`. A direction that moves no
    /// tile leaves every field untouched. Otherwise the slid board and its
    /// displacement replace the current ones, a tile spawns, the move count
    /// increments and termination is evaluated (win before loss).
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        if self.phase != SessionPhase::Playing {
            return MoveResult::Rejected(self.phase);
        }

        let outcome = slide_and_merge(&self.board, direction);
        if !outcome.moved {
            debug!("{:?}: no tile moved", direction);
            return MoveResult::NoChange;
        }

        self.board = outcome.board;
        self.displacement = outcome.displacement.scaled(self.config.cell_size);
        self.score += outcome.score_delta;
        self.move_count += 1;

        for (position, value) in outcome.merged_cells() {
            self.push_event(GameEventData::TilesMerged { position, value });
        }
        self.push_event(GameEventData::MoveApplied {
            direction,
            score_delta: outcome.score_delta,
            merges: outcome.merges,
        });

        let spawned = self.spawn_tile();

        let termination = evaluate_termination(&self.board, self.config.win_value);
        if let Some(termination) = termination {
            self.phase = termination.into();
            self.push_event(GameEventData::GameEnded {
                termination,
                score: self.score,
                move_count: self.move_count,
            });
            info!(
                "Session ended: {:?} after {} moves, score {}",
                termination, self.move_count, self.score
            );
        }

        debug!(
            "{:?}: +{} ({} merges), score {}, move {}",
            direction, outcome.score_delta, outcome.merges, self.score, self.move_count
        );

        MoveResult::Applied(MoveReport {
            direction,
            score_delta: outcome.score_delta,
            merges: outcome.merges,
            spawned,
            termination,
        })
    }

    fn spawn_tile(&mut self) -> Option<SpawnedTile> {
        let spawned = spawn_random_tile(&mut self.board, &mut self.rng, self.config.four_tile_percent);
        if let Some(tile) = spawned {
            self.push_event(GameEventData::TileSpawned {
                position: tile.position,
                value: tile.value,
            });
        }
        spawned
    }

    // =========================================================================
    // Read-only snapshot access
    // =========================================================================

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pixel displacement recorded by the last accepted move.
    pub fn displacement(&self) -> &DisplacementMap {
        &self.displacement
    }

    /// Accumulated score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Accepted moves since `start`.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Win flag.
    pub fn won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    /// Loss flag. Never set on the move that produced a win.
    pub fn lost(&self) -> bool {
        self.phase == SessionPhase::Lost
    }

    /// Seed the session was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration in effect.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.move_count, data));
    }

    /// Compute hash of current state for verification.
    ///
    /// Covers the board, score, phase and RNG position; the displacement
    /// map and queued events are presentation-only and excluded.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.move_count, self.seed, |hasher| {
            for row in self.board.rows() {
                for &value in row {
                    hasher.update_u32(value);
                }
            }
            hasher.update_u64(self.score);
            hasher.update_u8(self.phase as u8);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Offset, Position, GRID_SIZE};

    fn started(seed: u64) -> GameSession {
        let mut session = GameSession::new(GameConfig::default(), seed);
        session.start();
        session
    }

    /// Moving left turns the top row's 1024 pair into 2048, leaving one
    /// gap at (0, 3); rows 1-3 are locked and no 2 or 4 can match the
    /// neighbours of the gap.
    const ALMOST_WON: Board = Board::from_rows([
        [1024, 1024, 8, 16],
        [32, 64, 128, 256],
        [512, 32, 64, 128],
        [256, 512, 32, 64],
    ]);

    /// Same shape without the winning pair.
    const ALMOST_LOST: Board = Board::from_rows([
        [2, 2, 8, 16],
        [32, 64, 128, 256],
        [512, 32, 64, 128],
        [256, 512, 32, 64],
    ]);

    #[test]
    fn test_start_deals_two_tiles() {
        for seed in 0..50 {
            let session = started(seed);
            let board = session.board();
            assert_eq!(board.tile_count(), 2);
            assert!(board
                .rows()
                .iter()
                .flatten()
                .all(|&v| v == 0 || v == 2 || v == 4));
            assert_eq!(session.score(), 0);
            assert_eq!(session.move_count(), 0);
            assert_eq!(session.phase(), SessionPhase::Playing);
            assert!(session.displacement().is_settled());
        }
    }

    #[test]
    fn test_opening_four_frequency() {
        let mut tiles = 0;
        let mut fours = 0;
        for seed in 0..2_000 {
            let session = started(seed);
            for &value in session.board().rows().iter().flatten() {
                if value != 0 {
                    tiles += 1;
                    if value == 4 {
                        fours += 1;
                    }
                }
            }
        }
        assert_eq!(tiles, 4_000);
        // ~10%: 400 expected
        assert!((280..520).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn test_moves_rejected_before_start() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        let before = session.compute_hash();
        assert_eq!(
            session.apply_move(Direction::Left),
            MoveResult::Rejected(SessionPhase::NotStarted)
        );
        assert_eq!(session.compute_hash(), before);
    }

    #[test]
    fn test_no_change_move_is_idempotent() {
        let board = Board::from_rows([
            [2, 4, 2, 4],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut session = GameSession::with_board(GameConfig::default(), 5, board);
        let before = session.compute_hash();

        assert_eq!(session.apply_move(Direction::Left), MoveResult::NoChange);
        assert_eq!(session.apply_move(Direction::Up), MoveResult::NoChange);
        assert_eq!(session.compute_hash(), before);
        assert_eq!(*session.board(), board);
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_accepted_move_spawns_and_counts() {
        let board = Board::from_rows([
            [2, 2, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let mut session = GameSession::with_board(GameConfig::default(), 11, board);

        let MoveResult::Applied(report) = session.apply_move(Direction::Left) else {
            panic!("move should apply");
        };
        assert_eq!(report.score_delta, 4);
        assert_eq!(report.merges, 1);
        assert!(report.termination.is_none());

        let spawned = report.spawned.expect("board had room");
        assert_eq!(session.board().get(spawned.position), spawned.value);
        // 3 tiles, one merge, one spawn
        assert_eq!(session.board().tile_count(), 3);
        assert_eq!(session.score(), 4);
        assert_eq!(session.move_count(), 1);
    }

    #[test]
    fn test_displacement_is_scaled_to_pixels() {
        let board = Board::from_rows([
            [0, 0, 0, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let config = GameConfig { cell_size: 80, ..GameConfig::default() };
        let mut session = GameSession::with_board(config, 2, board);

        assert!(session.apply_move(Direction::Left).is_applied());
        assert_eq!(
            session.displacement().get(Position::new(0, 3)),
            Offset::new(-240, 0)
        );
    }

    #[test]
    fn test_win_without_loss_on_locked_board() {
        let mut session = GameSession::with_board(GameConfig::default(), 3, ALMOST_WON);

        let MoveResult::Applied(report) = session.apply_move(Direction::Left) else {
            panic!("move should apply");
        };
        assert_eq!(report.termination, Some(Termination::Won));
        assert_eq!(report.spawned.map(|t| t.position), Some(Position::new(0, 3)));
        assert!(session.board().empty_cells().is_empty());

        assert!(session.won());
        assert!(!session.lost());
        assert_eq!(session.score(), 2048);
    }

    #[test]
    fn test_loss_on_locked_board() {
        let mut session = GameSession::with_board(GameConfig::default(), 3, ALMOST_LOST);

        let result = session.apply_move(Direction::Left);
        assert!(matches!(
            result,
            MoveResult::Applied(MoveReport { termination: Some(Termination::Lost), .. })
        ));
        assert!(session.lost());
        assert!(!session.won());
    }

    #[test]
    fn test_terminal_session_is_frozen() {
        let mut session = GameSession::with_board(GameConfig::default(), 3, ALMOST_LOST);
        session.apply_move(Direction::Left);
        assert!(session.phase().is_terminal());

        let before = session.compute_hash();
        for dir in Direction::ALL {
            assert_eq!(session.apply_move(dir), MoveResult::Rejected(SessionPhase::Lost));
        }
        assert_eq!(session.compute_hash(), before);

        session.restart();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.board().tile_count(), 2);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_custom_win_value() {
        let board = Board::from_rows([
            [64, 64, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let config = GameConfig { win_value: 128, ..GameConfig::default() };
        let mut session = GameSession::with_board(config, 8, board);
        session.apply_move(Direction::Right);
        assert!(session.won());
    }

    #[test]
    fn test_events_follow_move() {
        let mut session = started(21);
        let opening = session.take_events();
        assert_eq!(opening.len(), 1 + STARTING_TILES);
        assert!(matches!(opening[0].data, GameEventData::SessionStarted { seed: 21 }));

        let applied = Direction::ALL
            .iter()
            .find_map(|&d| match session.apply_move(d) {
                MoveResult::Applied(report) => Some(report),
                _ => None,
            })
            .expect("an opening position always has a move");

        let events = session.take_events();
        assert!(events.iter().all(|e| e.move_index == 1));
        assert!(events.iter().any(|e| matches!(
            e.data,
            GameEventData::MoveApplied { direction, .. } if direction == applied.direction
        )));
        assert!(matches!(
            events.last().map(|e| &e.data),
            Some(GameEventData::TileSpawned { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = [
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Up,
        ];
        let play = || {
            let mut session = started(777);
            for _ in 0..50 {
                for dir in script {
                    session.apply_move(dir);
                }
            }
            session
        };

        let a = play();
        let b = play();
        assert_eq!(a.board(), b.board());
        assert_eq!(a.compute_hash(), b.compute_hash());

        let c = started(778);
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_score_is_monotonic_and_board_well_formed() {
        let mut session = started(31337);
        let mut last_score = 0;
        let mut step = 0usize;
        while !session.phase().is_terminal() && step < 5_000 {
            let before_tiles = session.board().tile_count();
            let dir = Direction::ALL[step % 4];
            if let MoveResult::Applied(report) = session.apply_move(dir) {
                let after_tiles = session.board().tile_count();
                let spawned = usize::from(report.spawned.is_some());
                assert_eq!(after_tiles, before_tiles - report.merges as usize + spawned);
                assert_eq!(session.score(), last_score + report.score_delta);
            }
            assert!(session.score() >= last_score);
            assert!(session.board().is_well_formed());
            assert!(session.board().tile_count() <= GRID_SIZE * GRID_SIZE);
            last_score = session.score();
            step += 1;
        }
    }
}
