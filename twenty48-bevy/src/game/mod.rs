//! Game module - owns the session and turns key presses into moves
//!
//! The session is the only authority on the board. Everything here
//! either forwards input to it or reads from it; the slide animation
//! works on a private copy of the displacement map.

use bevy::prelude::*;
use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;

use twenty48::{Direction, DisplacementMap, GameConfig, GameSession, MoveResult};
use crate::AppState;

pub mod components;
pub mod board_view;

pub use components::*;
pub use board_view::*;

// ============================================================================
// RESOURCES
// ============================================================================

/// Config the window and sessions were built from.
#[derive(Resource)]
pub struct ClientConfig(pub GameConfig);

/// The session being played.
#[derive(Resource)]
pub struct ActiveSession(pub GameSession);

/// Renderer-side copy of the last move's displacement.
///
/// `initial` is the map as the move produced it, `current` decays toward
/// zero every fixed tick. Nothing here is written back to the session.
#[derive(Resource, Default)]
pub struct SlideAnimation {
    pub initial: DisplacementMap,
    pub current: DisplacementMap,
}

impl SlideAnimation {
    fn begin(&mut self, displacement: &DisplacementMap) {
        self.initial = *displacement;
        self.current = *displacement;
    }
}

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<SlideAnimation>()

            .add_systems(OnEnter(AppState::Playing), (start_session, spawn_board).chain())
            .add_systems(OnExit(AppState::Playing), cleanup_board)

            // Input, then redraw from the updated session
            .add_systems(Update, (
                handle_move_keys,
                handle_session_keys,
                sync_tiles,
                sync_slide_ghosts,
            ).chain().run_if(in_state(AppState::Playing)))

            .add_systems(FixedUpdate, decay_slide_animation.run_if(in_state(AppState::Playing)));
    }
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

fn start_session(
    mut commands: Commands,
    config: Res<ClientConfig>,
    mut animation: ResMut<SlideAnimation>,
) {
    let seed = config.0.seed.unwrap_or_else(rand::random);
    let mut session = GameSession::new(config.0.clone(), seed);
    session.start();
    session.take_events();

    *animation = SlideAnimation::default();
    commands.insert_resource(ActiveSession(session));

    info!("New game (seed {})", seed);
}

/// Key that moves tiles, if any.
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Direction::Up),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Direction::Down),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Direction::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Direction::Right),
        _ => None,
    }
}

/// Forward direction keys to the session in the order they arrived.
fn handle_move_keys(
    mut key_events: EventReader<KeyboardInput>,
    mut session: ResMut<ActiveSession>,
    mut animation: ResMut<SlideAnimation>,
) {
    for event in key_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let Some(direction) = direction_for_key(event.key_code) else {
            continue;
        };

        if let MoveResult::Applied(report) = session.0.apply_move(direction) {
            animation.begin(session.0.displacement());
            if let Some(termination) = report.termination {
                info!(
                    "{:?}! Score {} in {} moves",
                    termination,
                    session.0.score(),
                    session.0.move_count()
                );
            }
        }

        for event in session.0.take_events() {
            debug!("{:?}", event);
        }
    }
}

/// SPACE restarts a finished game, ESC returns to the start screen.
fn handle_session_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<ActiveSession>,
    mut animation: ResMut<SlideAnimation>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(AppState::StartScreen);
    } else if keyboard.just_pressed(KeyCode::Space) && session.0.phase().is_terminal() {
        session.0.restart();
        session.0.take_events();
        *animation = SlideAnimation::default();
        info!("Restarted");
    }
}

/// Advance the slide animation one step.
fn decay_slide_animation(
    config: Res<ClientConfig>,
    mut animation: ResMut<SlideAnimation>,
) {
    if !animation.current.is_settled() {
        animation.current.decay(config.0.animation_step);
    }
}

fn cleanup_board(
    mut commands: Commands,
    entities: Query<Entity, With<BoardEntity>>,
) {
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<ActiveSession>();
    info!("Board cleaned up");
}
