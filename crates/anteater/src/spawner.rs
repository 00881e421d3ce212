use anteater_helpers::input::screen_to_world;
use bevy::prelude::*;

use crate::colony::{AntSize, AntSprite, Colony};
use crate::config::GameConfig;
use crate::core::{GameRng, SpawnAnts, Viewport};

pub const ANT_Z: f32 = 2.0;
const SMALL_ANT_COLOR: Color = Color::srgb(0.35, 0.16, 0.08);
const LARGE_ANT_COLOR: Color = Color::srgb(0.55, 0.12, 0.06);

pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SpawnAnts>()
            .add_systems(Update, spawn_ants);
    }
}

/// Uniform point in the lower half of the viewport, kept `padding` away from the edges.
pub fn random_spawn_point(viewport: Vec2, padding: f32, rng: &mut fastrand::Rng) -> Vec2 {
    let min_x = padding;
    let max_x = (viewport.x - padding).max(min_x);
    let min_y = viewport.y / 2.0;
    let max_y = (viewport.y - padding).max(min_y);

    Vec2::new(
        rng.f32().mul_add(max_x - min_x, min_x),
        rng.f32().mul_add(max_y - min_y, min_y),
    )
}

pub const fn ant_color(size: AntSize) -> Color {
    match size {
        AntSize::Small => SMALL_ANT_COLOR,
        AntSize::Large => LARGE_ANT_COLOR,
    }
}

pub fn spawn_ants(
    mut commands: Commands,
    mut requests: EventReader<SpawnAnts>,
    mut colony: ResMut<Colony>,
    mut rng: ResMut<GameRng>,
    viewport: Res<Viewport>,
    config: Res<GameConfig>,
) {
    for request in requests.read() {
        let extent = request.size.extent(&config);

        for _ in 0..request.count {
            let position = request
                .position
                .unwrap_or_else(|| random_spawn_point(viewport.0, config.spawn_padding, &mut rng.0));

            let sprite = commands
                .spawn((
                    Sprite::from_color(ant_color(request.size), Vec2::splat(extent)),
                    Transform::from_translation(screen_to_world(position, viewport.0).extend(ANT_Z)),
                ))
                .id();
            let id = colony.insert(sprite, position, request.size, extent);
            commands.entity(sprite).insert((AntSprite { id }, Name::new(id.to_string())));
        }

        info!(
            "Spawned {} {} ant(s), colony now {}",
            request.count,
            request.size,
            colony.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_stay_in_padded_lower_half() {
        let viewport = Vec2::new(400.0, 800.0);
        let mut rng = fastrand::Rng::with_seed(77);

        for _ in 0..500 {
            let point = random_spawn_point(viewport, 50.0, &mut rng);
            assert!((50.0..=350.0).contains(&point.x), "x {} out of range", point.x);
            assert!((400.0..=750.0).contains(&point.y), "y {} out of range", point.y);
        }
    }

    #[test]
    fn tiny_viewport_does_not_invert_ranges() {
        let mut rng = fastrand::Rng::with_seed(1);
        let point = random_spawn_point(Vec2::new(60.0, 60.0), 50.0, &mut rng);
        assert!(point.x >= 50.0 && point.y >= 30.0, "clamped to the lower bounds");
    }

    fn spawn_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(SpawnerPlugin)
            .init_resource::<Colony>()
            .init_resource::<Viewport>()
            .init_resource::<GameConfig>()
            .insert_resource(GameRng(fastrand::Rng::with_seed(4)));
        app
    }

    #[test]
    fn add_ten_spawns_ten_small_ants() {
        let mut app = spawn_app();
        app.world_mut().send_event(SpawnAnts::ten_small());
        app.update();

        let colony = app.world().resource::<Colony>();
        assert_eq!(colony.len(), 10, "ten ants registered");
        assert!(
            colony.iter().all(|ant| ant.size == AntSize::Small),
            "all small"
        );

        let sprites = app
            .world_mut()
            .query::<&AntSprite>()
            .iter(app.world())
            .count();
        assert_eq!(sprites, 10, "one sprite per ant");
    }

    #[test]
    fn explicit_position_is_used() {
        let mut app = spawn_app();
        app.world_mut().send_event(SpawnAnts {
            count: 1,
            size: AntSize::Large,
            position: Some(Vec2::new(100.0, 500.0)),
        });
        app.update();

        let colony = app.world().resource::<Colony>();
        let ant = colony.iter().next().expect("one ant spawned");
        assert_eq!(ant.position, Vec2::new(100.0, 500.0), "requested spot");
        assert_eq!(ant.extent, GameConfig::default().large_ant_extent, "large extent");
    }
}
