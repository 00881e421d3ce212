use core::time::Duration;

use bevy::prelude::*;

const RISE_DISTANCE: f32 = 60.0;
const LIFETIME: Duration = Duration::from_millis(900);

/// Short-lived UI text that drifts up and fades, e.g. "+3" where ants were eaten.
#[derive(Component)]
pub struct FloatingScore {
    timer: Timer,
    initial_position: Vec2,
    color: Srgba,
}

pub struct FloatingScorePlugin;

impl Plugin for FloatingScorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_floating_scores);
    }
}

/// `position` is in screen space.
pub fn spawn_floating_score(commands: &mut Commands, position: Vec2, text: &str, color: Srgba) {
    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::Srgba(color)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(position.x + 20.0),
            top: Val::Px(position.y),
            ..default()
        },
        GlobalZIndex(10),
        FloatingScore {
            timer: Timer::new(LIFETIME, TimerMode::Once),
            initial_position: position,
            color,
        },
    ));
}

fn animate_floating_scores(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Node, &mut TextColor, &mut FloatingScore)>,
) {
    for (entity, mut node, mut text_color, mut floating_score) in &mut query {
        floating_score.timer.tick(time.delta());
        let progress = floating_score.timer.fraction();

        node.top = Val::Px(RISE_DISTANCE.mul_add(-progress, floating_score.initial_position.y));
        text_color.0 = Color::Srgba(floating_score.color.with_alpha(1.0 - progress));

        if floating_score.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floating_score_expires() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(FloatingScorePlugin);
        app.world_mut().spawn((
            Node::default(),
            TextColor::default(),
            FloatingScore {
                timer: Timer::new(Duration::ZERO, TimerMode::Once),
                initial_position: Vec2::new(10.0, 10.0),
                color: Srgba::WHITE,
            },
        ));

        app.update();

        let remaining = app
            .world_mut()
            .query::<&FloatingScore>()
            .iter(app.world())
            .count();
        assert_eq!(remaining, 0, "a finished floating score is despawned");
    }
}
