use anteater_helpers::window_resizing::viewport_size;
use anteater_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::colony::{AntId, AntSize};
use crate::config::GameConfig;

/// Ants eaten this session. Only ever grows; gone on reload.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score(pub u64);

impl Score {
    pub const fn add(&mut self, eaten: usize) -> u64 {
        self.0 += eaten as u64;
        self.0
    }
}

/// Shared randomness for spawning, clustering and wobble thresholds.
#[derive(Resource)]
pub struct GameRng(pub fastrand::Rng);

impl GameRng {
    pub fn from_config(config: &GameConfig) -> Self {
        Self(config.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed))
    }
}

/// Logical size of the play area in screen pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport(pub Vec2);

impl Default for Viewport {
    fn default() -> Self {
        Self(Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT))
    }
}

/// Requests new ants. `position` is in screen space; `None` picks a random spot.
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnAnts {
    pub count: usize,
    pub size: AntSize,
    pub position: Option<Vec2>,
}

impl SpawnAnts {
    /// The "add one" button.
    pub const fn one_large() -> Self {
        Self {
            count: 1,
            size: AntSize::Large,
            position: None,
        }
    }

    /// The "add ten" button.
    pub const fn ten_small() -> Self {
        Self {
            count: 10,
            size: AntSize::Small,
            position: None,
        }
    }
}

/// A finished gesture. Positions are already committed.
#[derive(Event, Debug, Clone)]
pub struct SelectionDropped {
    pub ants: Vec<AntId>,
    pub pointer: Vec2,
}

/// One batch of ants went into the anteater.
#[derive(Event, Debug, Clone, Copy)]
pub struct AntsEaten {
    pub count: usize,
    /// Drop point in screen space.
    pub at: Vec2,
    pub score: u64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WobblePulse;

/// A held press grew into a whole-colony selection.
#[derive(Event, Debug, Clone, Copy)]
pub struct LongPressPromoted;

#[derive(Event, Debug, Clone, Copy)]
pub struct SaveScoreRequested;

#[derive(Event, Debug, Clone, Copy)]
pub struct ToggleThemeRequested;

pub fn track_viewport(windows: Query<&Window, With<PrimaryWindow>>, mut viewport: ResMut<Viewport>) {
    let Some(size) = viewport_size(&windows) else {
        return;
    };
    if viewport.0 != size {
        viewport.0 = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_grows_by_batch_size() {
        let mut score = Score(41);
        assert_eq!(score.add(3), 44, "returns the new total");
        assert_eq!(score.add(0), 44, "empty batches change nothing");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = GameConfig {
            seed: Some(12),
            ..default()
        };
        let mut first = GameRng::from_config(&config);
        let mut second = GameRng::from_config(&config);
        assert_eq!(first.0.u32(..), second.0.u32(..), "same seed, same stream");
    }
}
