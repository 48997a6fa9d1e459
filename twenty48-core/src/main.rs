//! Twenty48 Autoplay
//!
//! Plays a headless game with a fixed preference policy, then replays
//! the recorded moves and checks that the final state hash matches.
//!
//! With `--moves` the listed directions are played instead of the policy.
//! Events are logged as JSON lines at debug level (`RUST_LOG=twenty48::events=debug`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use twenty48::{
    VERSION, GRID_SIZE,
    config::GameConfig,
    core::rng::derive_session_seed,
    game::{
        direction::Direction,
        engine::slide_and_merge,
        events::GameEventData,
        replay::{accepted_moves, replay_session},
        session::GameSession,
    },
};

/// Seed used when neither the command line nor the config names one.
const DEFAULT_SEED: u64 = 12345;

/// Hard stop for a policy that somehow never ends the game.
const MAX_MOVES: u32 = 100_000;

/// Directions tried in order; the first that changes the board is played.
const POLICY: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

#[derive(Debug, Parser)]
#[command(name = "twenty48-autoplay", version, about = "Play a headless 2048 game and verify its replay")]
struct Args {
    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Session seed (defaults to the config's seed, then 12345)
    #[arg(long, conflicts_with = "seed_label")]
    seed: Option<u64>,

    /// Derive the seed from a text label
    #[arg(long, value_name = "TEXT")]
    seed_label: Option<String>,

    /// Comma-separated directions to play instead of the policy, e.g. `up,a,ArrowDown`
    #[arg(long, value_delimiter = ',', value_parser = parse_direction)]
    moves: Option<Vec<Direction>>,
}

impl Args {
    fn seed(&self) -> Option<u64> {
        self.seed.or_else(|| {
            self.seed_label
                .as_ref()
                .map(|label| derive_session_seed(label.as_bytes(), 0))
        })
    }
}

/// One key name such as `up`, `a` or `ArrowDown`.
fn parse_direction(name: &str) -> Result<Direction, String> {
    let name = name.trim();
    Direction::from_key_name(name).ok_or_else(|| format!("unknown direction {name:?}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Twenty48 Autoplay v{}", VERSION);

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    let seed = args.seed().or(config.seed).unwrap_or(DEFAULT_SEED);

    info!("Grid: {}x{}, win value {}", GRID_SIZE, GRID_SIZE, config.win_value);
    info!("Seed: {}", seed);

    let (session, moves) = match args.moves {
        Some(script) => play_scripted(config.clone(), seed, &script),
        None => play(config.clone(), seed),
    };

    println!("{}", session.board());
    info!("=== Result ===");
    info!("Phase: {:?}", session.phase());
    info!("Score: {}", session.score());
    info!("Moves: {}", session.move_count());
    info!("Highest tile: {}", session.board().max_tile());

    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let (replayed, results) = replay_session(config, seed, &moves);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!(
        "DETERMINISM VERIFIED: {} recorded moves, {} accepted on replay",
        moves.len(),
        accepted_moves(&moves, &results).len()
    );

    Ok(())
}

/// Log queued events as JSON lines; true once the session has ended.
fn drain_events(session: &mut GameSession) -> bool {
    let mut ended = false;
    for event in session.take_events() {
        match event.to_json() {
            Ok(line) => debug!(target: "twenty48::events", "{}", line),
            Err(e) => warn!("Could not encode event {:?}: {}", event, e),
        }
        if event.is_terminal() {
            if let GameEventData::GameEnded { termination, score, move_count } = event.data {
                info!("Game ended: {:?} with score {} after {} moves", termination, score, move_count);
            }
            ended = true;
        }
    }
    ended
}

/// Play until the session ends, returning it with the directions played.
fn play(config: GameConfig, seed: u64) -> (GameSession, Vec<Direction>) {
    let mut session = GameSession::new(config, seed);
    session.start();
    drain_events(&mut session);
    let mut moves = Vec::new();
    let mut best_tile = 0;

    while session.move_count() < MAX_MOVES {
        let Some(direction) = POLICY
            .into_iter()
            .find(|&d| slide_and_merge(session.board(), d).moved)
        else {
            warn!("No direction moves but session is still playing");
            break;
        };

        moves.push(direction);
        session.apply_move(direction);

        if session.board().max_tile() > best_tile {
            best_tile = session.board().max_tile();
            if best_tile >= 256 {
                info!("Move {}: reached {}", session.move_count(), best_tile);
            }
        }

        if drain_events(&mut session) {
            break;
        }

        if session.move_count() % 250 == 0 {
            info!("Move {}: score {}", session.move_count(), session.score());
        }
    }

    (session, moves)
}

/// Play the given directions until they run out or the session ends.
fn play_scripted(config: GameConfig, seed: u64, script: &[Direction]) -> (GameSession, Vec<Direction>) {
    let mut session = GameSession::new(config, seed);
    session.start();
    drain_events(&mut session);
    let mut moves = Vec::with_capacity(script.len());

    for &direction in script {
        moves.push(direction);
        if !session.apply_move(direction).is_applied() {
            debug!("Move {:?} left the board unchanged", direction);
        }
        if drain_events(&mut session) {
            if moves.len() < script.len() {
                info!("Session over, ignoring {} remaining moves", script.len() - moves.len());
            }
            break;
        }
    }

    (session, moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("twenty48-autoplay").chain(argv.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_moves_list() {
        let args = parse(&["--moves", "up, a,ArrowDown,D"]).unwrap();
        assert_eq!(
            args.moves,
            Some(vec![Direction::Up, Direction::Left, Direction::Down, Direction::Right])
        );
    }

    #[test]
    fn test_moves_rejects_unknown_name() {
        assert!(parse(&["--moves", "up,jump"]).is_err());
        assert!(parse_direction("jump").is_err());
    }

    #[test]
    fn test_seed_and_label_conflict() {
        assert!(parse(&["--seed", "1", "--seed-label", "daily"]).is_err());
    }

    #[test]
    fn test_seed_sources() {
        assert_eq!(parse(&["--seed", "99"]).unwrap().seed(), Some(99));
        assert_eq!(
            parse(&["--seed-label", "daily"]).unwrap().seed(),
            Some(derive_session_seed(b"daily", 0))
        );
        assert_eq!(parse(&[]).unwrap().seed(), None);
    }

    #[test]
    fn test_config_path() {
        let args = parse(&["--config", "game.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("game.json")));
    }

    #[test]
    fn test_scripted_play_matches_replay() {
        let script: Vec<Direction> = ["left", "down", "right", "down", "left", "up"]
            .into_iter()
            .map(|name| parse_direction(name).unwrap())
            .collect();
        let (session, moves) = play_scripted(GameConfig::default(), 7, &script);
        let (replayed, _) = replay_session(GameConfig::default(), 7, &moves);
        assert_eq!(session.compute_hash(), replayed.compute_hash());
    }

    #[test]
    fn test_policy_play_stops_on_game_end() {
        let (session, moves) = play(GameConfig::default(), 3);
        assert!(session.phase().is_terminal());
        assert_eq!(moves.len() as u32, session.move_count());
    }

    #[test]
    fn test_drain_opening_is_not_terminal() {
        let mut session = GameSession::new(GameConfig::default(), 5);
        session.start();
        assert!(!drain_events(&mut session));
        assert!(session.take_events().is_empty());
    }
}
