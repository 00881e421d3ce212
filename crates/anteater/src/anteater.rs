use core::f32::consts::TAU;

use anteater_helpers::input::screen_to_world;
use bevy::prelude::*;

use crate::config::{ANTEATER_CENTER_FRACTION, GameConfig};
use crate::core::{Viewport, WobblePulse};

const BODY_COLOR: Color = Color::srgb(0.45, 0.38, 0.33);
const SNOUT_COLOR: Color = Color::srgb(0.33, 0.27, 0.23);
const ANTEATER_Z: f32 = 1.0;
const WOBBLE_SWINGS: f32 = 3.0;
const WOBBLE_ANGLE: f32 = 0.22;

#[derive(Component)]
pub struct Anteater;

/// Drop rectangle of the anteater in screen space.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct TargetZone(pub Rect);

/// Running wobble animation. Re-inserting restarts it.
#[derive(Component)]
struct Wobble(Timer);

pub struct AnteaterPlugin;

impl Plugin for AnteaterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetZone>()
            .add_event::<WobblePulse>()
            .add_systems(Startup, spawn_anteater)
            .add_systems(Update, (place_anteater, start_wobble, animate_wobble).chain());
    }
}

pub fn anteater_center(viewport: Vec2) -> Vec2 {
    Vec2::new(viewport.x / 2.0, viewport.y * ANTEATER_CENTER_FRACTION)
}

pub fn target_rect(viewport: Vec2, size: Vec2) -> Rect {
    Rect::from_center_size(anteater_center(viewport), size)
}

fn spawn_anteater(mut commands: Commands, config: Res<GameConfig>, viewport: Res<Viewport>) {
    let size = config.anteater_size();
    commands
        .spawn((
            Anteater,
            Name::new("Anteater"),
            Sprite::from_color(BODY_COLOR, size),
            Transform::from_translation(
                screen_to_world(anteater_center(viewport.0), viewport.0).extend(ANTEATER_Z),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(SNOUT_COLOR, Vec2::new(size.x * 0.45, size.y * 0.18)),
                Transform::from_xyz(-size.x * 0.6, -size.y * 0.3, 0.1),
            ));
            parent.spawn((
                Text2d::new("feed me"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 0.0, 0.2),
            ));
        });
}

/// Keeps the anteater and its drop zone anchored to the current viewport.
fn place_anteater(
    viewport: Res<Viewport>,
    config: Res<GameConfig>,
    mut zone: ResMut<TargetZone>,
    mut anteaters: Query<&mut Transform, With<Anteater>>,
) {
    let rect = target_rect(viewport.0, config.anteater_size());
    if zone.0 != rect {
        zone.0 = rect;
    }

    let translation = screen_to_world(rect.center(), viewport.0).extend(ANTEATER_Z);
    for mut transform in &mut anteaters {
        if transform.translation != translation {
            transform.translation = translation;
        }
    }
}

fn start_wobble(
    mut commands: Commands,
    mut pulses: EventReader<WobblePulse>,
    config: Res<GameConfig>,
    anteaters: Query<Entity, With<Anteater>>,
) {
    if pulses.read().count() == 0 {
        return;
    }
    for entity in &anteaters {
        commands
            .entity(entity)
            .insert(Wobble(Timer::new(config.wobble_duration(), TimerMode::Once)));
    }
}

fn animate_wobble(
    mut commands: Commands,
    time: Res<Time>,
    mut wobbling: Query<(Entity, &mut Transform, &mut Wobble)>,
) {
    for (entity, mut transform, mut wobble) in &mut wobbling {
        wobble.0.tick(time.delta());
        let progress = wobble.0.fraction();
        let angle = (progress * WOBBLE_SWINGS * TAU).sin() * WOBBLE_ANGLE * (1.0 - progress);
        transform.rotation = Quat::from_rotation_z(angle);

        if wobble.0.finished() {
            transform.rotation = Quat::IDENTITY;
            commands.entity(entity).remove::<Wobble>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_sits_centered_in_upper_part() {
        let rect = target_rect(Vec2::new(400.0, 1000.0), Vec2::new(150.0, 110.0));
        assert_eq!(rect.center(), Vec2::new(200.0, 300.0), "centered horizontally");
        assert_eq!(rect.min, Vec2::new(125.0, 245.0), "extends half its size");
    }

    #[test]
    fn wobble_pulse_animates_then_settles() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(AnteaterPlugin)
            .insert_resource(GameConfig {
                wobble_millis: 0,
                ..default()
            })
            .init_resource::<Viewport>();
        app.update();

        app.world_mut().send_event(WobblePulse);
        app.update();
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, Has<Wobble>), With<Anteater>>();
        let (transform, wobbling) = query.single(app.world());
        assert!(!wobbling, "a zero-length wobble is already over");
        assert_eq!(transform.rotation, Quat::IDENTITY, "back to rest");
    }

    #[test]
    fn zone_tracks_viewport() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(AnteaterPlugin)
            .init_resource::<GameConfig>()
            .insert_resource(Viewport(Vec2::new(300.0, 600.0)));
        app.update();

        let zone = app.world().resource::<TargetZone>().0;
        assert_eq!(zone.center(), Vec2::new(150.0, 180.0), "follows viewport");
    }
}
