use anteater_helpers::floating_score::spawn_floating_score;
use anteater_helpers::platform;
use bevy::color::palettes::css::ORANGE;
use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::config::{GameConfig, HAPTIC_MILLIS};
use crate::core::{AntsEaten, LongPressPromoted};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
enum AssetState {
    #[default]
    Loading,
    Loaded,
    /// Sounds are missing. The game plays on silently.
    Failed,
}

#[derive(AssetCollection, Resource)]
struct AudioAssets {
    #[asset(path = "audio/crunch.ogg")]
    crunch: Handle<bevy_kira_audio::prelude::AudioSource>,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub struct FeedbackSystems;

pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .init_state::<AssetState>()
            .add_loading_state(
                LoadingState::new(AssetState::Loading)
                    .continue_to_state(AssetState::Loaded)
                    .on_failure_continue_to_state(AssetState::Failed)
                    .load_collection::<AudioAssets>(),
            )
            .add_event::<AntsEaten>()
            .add_event::<LongPressPromoted>()
            .add_systems(OnEnter(AssetState::Failed), report_missing_audio)
            .add_systems(
                Update,
                (
                    crunch_audio.run_if(in_state(AssetState::Loaded)),
                    show_eaten_count,
                    haptic_pulse,
                )
                    .in_set(FeedbackSystems),
            );
    }
}

/// Crunch loudness for a batch: grows by a fixed step per ant up to a cap.
pub fn crunch_volume(count: usize, config: &GameConfig) -> f64 {
    config
        .volume_per_ant
        .mul_add(count as f64, config.base_volume)
        .min(config.max_volume)
}

fn report_missing_audio() {
    warn!("Crunch sound could not be loaded, playing without audio");
}

fn crunch_audio(
    audio_assets: Res<AudioAssets>,
    audio: Res<Audio>,
    config: Res<GameConfig>,
    mut eaten: EventReader<AntsEaten>,
) {
    for batch in eaten.read() {
        audio
            .play(audio_assets.crunch.clone_weak())
            .with_volume(crunch_volume(batch.count, &config));
    }
}

fn show_eaten_count(mut commands: Commands, mut eaten: EventReader<AntsEaten>) {
    for batch in eaten.read() {
        spawn_floating_score(&mut commands, batch.at, &format!("+{}", batch.count), ORANGE);
    }
}

fn haptic_pulse(mut promoted: EventReader<LongPressPromoted>) {
    if promoted.read().count() == 0 {
        return;
    }
    if !platform::vibrate(HAPTIC_MILLIS) {
        debug!("Haptics unavailable");
    }
}
