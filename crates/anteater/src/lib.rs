mod anteater;
pub mod colony;
pub mod config;
pub mod consumption;
mod core;
mod drag;
mod feedback;
pub mod gesture;
pub mod host_bridge;
mod hud;
pub mod leaderboard;
mod spawner;
mod theme;

use anteater_helpers::floating_score::FloatingScorePlugin;
use bevy::prelude::*;

use crate::colony::Colony;
use crate::config::GameConfig;
use crate::consumption::EatSystems;
use crate::core::{GameRng, Score, Viewport, track_viewport};
use crate::drag::DragSystems;
use crate::feedback::FeedbackSystems;

/// Entry point for the game
pub fn run() {
    let mut app = anteater_helpers::get_default_app("Anteater");

    // Read after the log plugin is up so override problems get reported.
    let config = GameConfig::load();
    let rng = GameRng::from_config(&config);

    app.insert_resource(config)
        .insert_resource(rng)
        .init_resource::<Colony>()
        .init_resource::<Score>()
        .init_resource::<Viewport>()
        .configure_sets(Update, (DragSystems, EatSystems, FeedbackSystems).chain())
        .add_systems(PreStartup, track_viewport)
        .add_systems(PreUpdate, track_viewport)
        .add_systems(Startup, setup_camera)
        .add_plugins(theme::ThemePlugin)
        .add_plugins(host_bridge::HostBridgePlugin)
        .add_plugins(spawner::SpawnerPlugin)
        .add_plugins(drag::DragPlugin)
        .add_plugins(consumption::ConsumptionPlugin)
        .add_plugins(anteater::AnteaterPlugin)
        .add_plugins(FloatingScorePlugin)
        .add_plugins(feedback::FeedbackPlugin)
        .add_plugins(leaderboard::client::LeaderboardPlugin)
        .add_plugins(hud::HudPlugin);

    app.run();
}

/// Sets up the main 2D camera
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
