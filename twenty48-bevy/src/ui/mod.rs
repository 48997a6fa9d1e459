//! UI module - start screen, score header and end-of-game overlay

use bevy::prelude::*;

use twenty48::SessionPhase;
use crate::AppState;
use crate::game::{ActiveSession, HEADER_HEIGHT};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(OnEnter(AppState::StartScreen), setup_start_screen)
            .add_systems(OnExit(AppState::StartScreen), cleanup_start_screen)
            .add_systems(OnEnter(AppState::Playing), setup_hud)
            .add_systems(OnExit(AppState::Playing), cleanup_hud)
            .add_systems(Update, (
                (handle_start_button, handle_start_key).run_if(in_state(AppState::StartScreen)),
                (update_hud, update_end_overlay).run_if(in_state(AppState::Playing)),
            ));
    }
}

/// Marker for start screen UI
#[derive(Component)]
struct StartScreenUI;

/// Marker for HUD UI
#[derive(Component)]
struct HudUI;

/// Marker for the win/lose overlay
#[derive(Component)]
struct EndOverlay;

#[derive(Component)]
struct StartButton;

#[derive(Component)]
struct MovesText;

#[derive(Component)]
struct ScoreText;

const HEADER_TEXT_COLOR: Color = Color::srgb_u8(119, 110, 101);
const BUTTON_COLOR: Color = Color::srgb_u8(143, 122, 102);
const BUTTON_HOVER_COLOR: Color = Color::srgb_u8(160, 138, 116);
const WIN_COLOR: Color = Color::srgb(0.2, 0.85, 0.3);
const LOSE_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);

// ============================================================================
// START SCREEN
// ============================================================================

fn setup_start_screen(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        StartScreenUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new("2048"),
            TextFont {
                font_size: 72.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                margin: UiRect::bottom(Val::Px(30.0)),
                ..default()
            },
        ));

        parent.spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(56.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_COLOR),
            StartButton,
        )).with_children(|parent| {
            parent.spawn((
                Text::new("Start Game"),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

        parent.spawn((
            Text::new("Arrows or WASD to slide | ENTER to start"),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(HEADER_TEXT_COLOR),
            Node {
                margin: UiRect::top(Val::Px(30.0)),
                ..default()
            },
        ));
    });
}

fn handle_start_button(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<StartButton>),
    >,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for (interaction, mut bg_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                info!("Start clicked");
                next_state.set(AppState::Playing);
            }
            Interaction::Hovered => *bg_color = BackgroundColor(BUTTON_HOVER_COLOR),
            Interaction::None => *bg_color = BackgroundColor(BUTTON_COLOR),
        }
    }
}

fn handle_start_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(AppState::Playing);
    }
}

fn cleanup_start_screen(
    mut commands: Commands,
    query: Query<Entity, With<StartScreenUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ============================================================================
// HUD
// ============================================================================

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(HEADER_HEIGHT),
            position_type: PositionType::Absolute,
            top: Val::Px(0.0),
            left: Val::Px(0.0),
            padding: UiRect::horizontal(Val::Px(12.0)),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            ..default()
        },
        HudUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new("Moves: 0"),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(HEADER_TEXT_COLOR),
            MovesText,
        ));

        parent.spawn((
            Text::new("Score: 0"),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(HEADER_TEXT_COLOR),
            ScoreText,
        ));
    });
}

fn update_hud(
    session: Option<Res<ActiveSession>>,
    mut moves_text: Query<&mut Text, (With<MovesText>, Without<ScoreText>)>,
    mut score_text: Query<&mut Text, (With<ScoreText>, Without<MovesText>)>,
) {
    let Some(session) = session else {
        return;
    };
    if !session.is_changed() {
        return;
    }

    if let Ok(mut text) = moves_text.get_single_mut() {
        **text = format!("Moves: {}", session.0.move_count());
    }
    if let Ok(mut text) = score_text.get_single_mut() {
        **text = format!("Score: {}", session.0.score());
    }
}

/// Overlay text for a finished session.
fn end_message(phase: SessionPhase) -> Option<(&'static str, Color)> {
    match phase {
        SessionPhase::Won => Some(("You Win!", WIN_COLOR)),
        SessionPhase::Lost => Some(("You Lose!", LOSE_COLOR)),
        SessionPhase::NotStarted | SessionPhase::Playing => None,
    }
}

/// Show the overlay while the session is over, drop it after a restart.
fn update_end_overlay(
    mut commands: Commands,
    session: Option<Res<ActiveSession>>,
    overlay: Query<Entity, With<EndOverlay>>,
) {
    let Some(session) = session else {
        return;
    };
    if !session.is_changed() {
        return;
    }

    let Some((message, color)) = end_message(session.0.phase()) else {
        for entity in overlay.iter() {
            commands.entity(entity).despawn_recursive();
        }
        return;
    };
    if !overlay.is_empty() {
        return;
    }

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ZIndex(10),
        EndOverlay,
        HudUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(message),
            TextFont {
                font_size: 56.0,
                ..default()
            },
            TextColor(color),
        ));

        parent.spawn((
            Text::new("SPACE to play again | ESC for menu"),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                margin: UiRect::top(Val::Px(16.0)),
                ..default()
            },
        ));
    });
}

fn cleanup_hud(
    mut commands: Commands,
    query: Query<Entity, With<HudUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
