//! Twenty48 - 2048 in a window
//!
//! Slide tiles with the arrow keys (or WASD); equal tiles merge.
//! Reach 2048 to win, fill the board with no merges left to lose.

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowResolution;

use twenty48::{ConfigError, GameConfig};

use game::{BoardLayout, GamePlugin, ClientConfig, BACKGROUND_COLOR};
use ui::UiPlugin;

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "TWENTY48_CONFIG";

/// Game states
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    StartScreen,
    Playing,
}

fn main() {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (GameConfig::default(), Some(e)),
    };
    let size = BoardLayout::new(config.cell_size).window_size();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "2048".into(),
                resolution: WindowResolution::new(size.x, size.y),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(ClientConfig(config))
        .init_state::<AppState>()
        .add_plugins((
            GamePlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .add_systems(Startup, move || {
            if let Some(e) = &config_error {
                warn!("{}; using default config", e);
            }
        })
        .run();
}

/// Config from `TWENTY48_CONFIG`, or defaults when unset.
fn load_config() -> Result<GameConfig, ConfigError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => GameConfig::load(path),
        Err(_) => Ok(GameConfig::default()),
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("Twenty48 initialized!");
}
