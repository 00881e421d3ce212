use anteater_helpers::storage::{self, StorageScope};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::ToggleThemeRequested;

pub const THEME_KEY: &str = "anteater.theme";

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Text that follows the theme's foreground color.
#[derive(Component, Clone, Copy)]
pub struct ThemedText;

/// Panel or button background that follows the theme.
#[derive(Component, Clone, Copy)]
pub struct ThemedPanel;

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn clear_color(self) -> Color {
        match self {
            Self::Light => Color::srgb(0.93, 0.89, 0.78),
            Self::Dark => Color::srgb(0.1, 0.11, 0.13),
        }
    }

    pub const fn text_color(self) -> Color {
        match self {
            Self::Light => Color::srgb(0.12, 0.1, 0.08),
            Self::Dark => Color::srgb(0.92, 0.92, 0.9),
        }
    }

    pub const fn panel_color(self) -> Color {
        match self {
            Self::Light => Color::srgba(1.0, 1.0, 1.0, 0.6),
            Self::Dark => Color::srgba(0.0, 0.0, 0.0, 0.45),
        }
    }

    pub const fn highlight_color(self) -> Color {
        match self {
            Self::Light => Color::srgb(0.75, 0.35, 0.05),
            Self::Dark => Color::srgb(1.0, 0.7, 0.3),
        }
    }
}

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(restore_theme())
            .add_event::<ToggleThemeRequested>()
            .add_systems(
                Update,
                (toggle_theme, apply_theme.run_if(resource_changed::<Theme>)).chain(),
            );
    }
}

fn restore_theme() -> Theme {
    match storage::load_json(StorageScope::Local, THEME_KEY) {
        Ok(theme) => theme.unwrap_or_default(),
        Err(err) => {
            warn!("Could not restore theme: {err}");
            Theme::default()
        }
    }
}

fn toggle_theme(mut requests: EventReader<ToggleThemeRequested>, mut theme: ResMut<Theme>) {
    // An even number of requests cancels out.
    let flips = requests.read().count();
    if flips % 2 == 0 {
        return;
    }

    *theme = theme.toggled();
    info!("Theme switched to {}", *theme);
    if let Err(err) = storage::save_json(StorageScope::Local, THEME_KEY, &*theme) {
        warn!("Could not persist theme: {err}");
    }
}

fn apply_theme(
    theme: Res<Theme>,
    mut clear_color: ResMut<ClearColor>,
    mut texts: Query<&mut TextColor, With<ThemedText>>,
    mut panels: Query<&mut BackgroundColor, With<ThemedPanel>>,
) {
    clear_color.0 = theme.clear_color();
    for mut color in &mut texts {
        color.0 = theme.text_color();
    }
    for mut background in &mut panels {
        background.0 = theme.panel_color();
    }
}
