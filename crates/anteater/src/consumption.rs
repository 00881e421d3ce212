//! Deciding which dropped ants the anteater eats.

use core::ops::RangeInclusive;

use bevy::prelude::*;

use crate::anteater::TargetZone;
use crate::colony::{Ant, AntId, Colony};
use crate::config::GameConfig;
use crate::core::{AntsEaten, GameRng, Score, SelectionDropped, WobblePulse};

/// Center-in-rectangle test, inclusive on every edge.
pub fn center_in_target(center: Vec2, target: Rect) -> bool {
    center.x >= target.min.x
        && center.x <= target.max.x
        && center.y >= target.min.y
        && center.y <= target.max.y
}

#[derive(Debug, Default)]
pub struct Consumption {
    pub eaten: Vec<Ant>,
    pub survivors: Vec<AntId>,
}

/// Removes every ant of `selection` whose center lies in `target`.
///
/// Ids that are no longer in the colony are skipped.
pub fn consume(colony: &mut Colony, selection: &[AntId], target: Rect) -> Consumption {
    let mut consumption = Consumption::default();

    for &id in selection {
        let Some(ant) = colony.get(id) else {
            continue;
        };
        if center_in_target(ant.bounds().center(), target) {
            if let Some(ant) = colony.remove(id) {
                consumption.eaten.push(ant);
            }
        } else {
            consumption.survivors.push(id);
        }
    }

    consumption
}

/// Counts ants eaten since the last wobble and rolls the next threshold.
#[derive(Resource, Debug)]
pub struct Appetite {
    eaten_since_pulse: u32,
    threshold: u32,
    range: RangeInclusive<u32>,
}

impl Appetite {
    pub fn new(range: RangeInclusive<u32>, rng: &mut fastrand::Rng) -> Self {
        let threshold = rng.u32(range.clone());
        Self {
            eaten_since_pulse: 0,
            threshold,
            range,
        }
    }

    pub fn from_config(config: &GameConfig, rng: &mut fastrand::Rng) -> Self {
        Self::new(config.wobble_range(), rng)
    }

    pub const fn eaten_since_pulse(&self) -> u32 {
        self.eaten_since_pulse
    }

    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Adds a batch. Returns true when the batch reaches the threshold, in
    /// which case the counter restarts from zero against a fresh threshold.
    pub fn record(&mut self, eaten: u32, rng: &mut fastrand::Rng) -> bool {
        self.eaten_since_pulse += eaten;
        if self.eaten_since_pulse < self.threshold {
            return false;
        }
        self.eaten_since_pulse = 0;
        self.threshold = rng.u32(self.range.clone());
        true
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub struct EatSystems;

pub struct ConsumptionPlugin;

impl Plugin for ConsumptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SelectionDropped>()
            .add_event::<AntsEaten>()
            .add_event::<WobblePulse>()
            .add_systems(Startup, insert_appetite)
            .add_systems(Update, eat_dropped_ants.in_set(EatSystems));
    }
}

fn insert_appetite(mut commands: Commands, config: Res<GameConfig>, mut rng: ResMut<GameRng>) {
    let appetite = Appetite::from_config(&config, &mut rng.0);
    debug!("First wobble after {} ants", appetite.threshold());
    commands.insert_resource(appetite);
}

pub fn eat_dropped_ants(
    mut commands: Commands,
    mut drops: EventReader<SelectionDropped>,
    zone: Res<TargetZone>,
    mut colony: ResMut<Colony>,
    mut score: ResMut<Score>,
    mut appetite: ResMut<Appetite>,
    mut rng: ResMut<GameRng>,
    mut eaten_events: EventWriter<AntsEaten>,
    mut pulses: EventWriter<WobblePulse>,
) {
    for drop in drops.read() {
        let consumption = consume(&mut colony, &drop.ants, zone.0);
        if consumption.eaten.is_empty() {
            continue;
        }

        for ant in &consumption.eaten {
            if let Some(mut sprite) = commands.get_entity(ant.sprite) {
                sprite.despawn();
            }
        }

        let count = consumption.eaten.len();
        let total = score.add(count);
        info!("Anteater ate {count} ant(s), score {total}");
        eaten_events.send(AntsEaten {
            count,
            at: drop.pointer,
            score: total,
        });

        if appetite.record(u32::try_from(count).unwrap_or(u32::MAX), &mut rng.0) {
            debug!("Wobble, next after {} ants", appetite.threshold());
            pulses.send(WobblePulse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::AntSize;
    use crate::core::Score;
    use crate::gesture::DragController;

    fn eating_app(zone: Rect) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(ConsumptionPlugin)
            .insert_resource(TargetZone(zone))
            .init_resource::<Colony>()
            .init_resource::<Score>()
            .init_resource::<GameConfig>()
            .insert_resource(GameRng(fastrand::Rng::with_seed(5)));
        app.update();
        app
    }

    fn target() -> Rect {
        Rect::new(0.0, 0.0, 50.0, 50.0)
    }

    #[test]
    fn boundary_centers_are_eaten() {
        for point in [
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(0.0, 25.0),
            Vec2::new(25.0, 50.0),
        ] {
            assert!(center_in_target(point, target()), "{point} is on the edge");
        }
        assert!(!center_in_target(Vec2::new(50.01, 25.0), target()), "just outside");
        assert!(!center_in_target(Vec2::new(25.0, -0.5), target()), "above");
    }

    #[test]
    fn partition_removes_only_eaten_ants() {
        let mut colony = Colony::default();
        let inside = colony.insert(Entity::from_raw(0), Vec2::new(20.0, 20.0), AntSize::Small, 28.0);
        let outside = colony.insert(Entity::from_raw(1), Vec2::new(90.0, 20.0), AntSize::Small, 28.0);

        let result = consume(&mut colony, &[inside, outside, AntId(42)], target());

        assert_eq!(result.eaten.len(), 1, "one ant inside");
        assert_eq!(result.survivors, vec![outside], "one survivor, missing id skipped");
        assert!(!colony.contains(inside), "eaten ant left the colony");
        assert!(colony.contains(outside), "survivor stays");
    }

    #[test]
    fn drag_into_mouth_scores_one() {
        let config = GameConfig::default();
        let mut colony = Colony::default();
        let mut controller = DragController::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let mut score = Score::default();

        let ant = colony.insert(
            Entity::from_raw(0),
            Vec2::new(100.0, 500.0),
            AntSize::Large,
            AntSize::Large.extent(&config),
        );
        controller
            .begin(&mut colony, ant, Vec2::new(100.0, 500.0), default(), &mut rng)
            .expect("gesture starts");
        let dropped = controller
            .release(Vec2::new(40.0, 40.0), &mut colony)
            .expect("gesture was active");
        assert_eq!(dropped.delta, Vec2::new(-60.0, -460.0), "drag delta");

        let result = consume(&mut colony, &dropped.ants, target());
        score.add(result.eaten.len());

        assert!(colony.is_empty(), "ant removed");
        assert_eq!(score.0, 1, "score is one");
    }

    #[test]
    fn score_grows_by_every_batch() {
        let mut colony = Colony::default();
        let mut score = Score(7);
        let ids: Vec<_> = (0..5)
            .map(|index| {
                colony.insert(
                    Entity::from_raw(index),
                    Vec2::new(10.0 * index as f32, 10.0),
                    AntSize::Small,
                    28.0,
                )
            })
            .collect();

        let before = score.0;
        let result = consume(&mut colony, &ids, target());
        score.add(result.eaten.len());

        assert_eq!(result.eaten.len(), 5, "x in 0..=40 all inside");
        assert_eq!(score.0, before + 5, "score after = before + batch");
    }

    #[test]
    fn wobble_fires_once_per_threshold() {
        let mut rng = fastrand::Rng::with_seed(21);
        let mut appetite = Appetite::new(4..=17, &mut rng);
        let first_threshold = appetite.threshold();
        assert!((4..=17).contains(&first_threshold), "initial roll in range");

        let mut pulses = 0;
        for _ in 0..first_threshold - 1 {
            pulses += u32::from(appetite.record(1, &mut rng));
        }
        assert_eq!(pulses, 0, "below threshold");
        assert_eq!(appetite.eaten_since_pulse(), first_threshold - 1, "counting up");

        assert!(appetite.record(1, &mut rng), "reaching the threshold pulses");
        assert_eq!(appetite.eaten_since_pulse(), 0, "counter reset");
        assert!((4..=17).contains(&appetite.threshold()), "fresh roll in range");
    }

    #[test]
    fn big_batch_overshooting_pulses_once() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut appetite = Appetite::new(4..=4, &mut rng);
        assert!(appetite.record(30, &mut rng), "one pulse for the batch");
        assert_eq!(appetite.eaten_since_pulse(), 0, "overshoot discarded");
    }

    #[test]
    fn dropped_ants_are_eaten_and_scored() {
        let mut app = eating_app(target());
        let sprite = app.world_mut().spawn_empty().id();
        let survivor_sprite = app.world_mut().spawn_empty().id();
        let (inside, outside) = {
            let mut colony = app.world_mut().resource_mut::<Colony>();
            (
                colony.insert(sprite, Vec2::new(25.0, 25.0), AntSize::Small, 28.0),
                colony.insert(survivor_sprite, Vec2::new(300.0, 25.0), AntSize::Small, 28.0),
            )
        };

        app.world_mut().send_event(SelectionDropped {
            ants: vec![inside, outside],
            pointer: Vec2::new(25.0, 25.0),
        });
        app.update();

        assert_eq!(app.world().resource::<Score>().0, 1, "one ant eaten");
        assert!(app.world().get_entity(sprite).is_err(), "eaten sprite despawned");
        assert!(app.world().get_entity(survivor_sprite).is_ok(), "survivor sprite kept");

        let events = app.world().resource::<Events<AntsEaten>>();
        let eaten: Vec<_> = events.get_cursor().read(events).copied().collect();
        assert_eq!(eaten.len(), 1, "one batch reported");
        assert!(
            eaten.iter().all(|batch| batch.count == 1 && batch.score == 1),
            "batch carries count and total"
        );
    }

    #[test]
    fn misses_change_nothing() {
        let mut app = eating_app(target());
        let sprite = app.world_mut().spawn_empty().id();
        let id = app
            .world_mut()
            .resource_mut::<Colony>()
            .insert(sprite, Vec2::new(400.0, 400.0), AntSize::Large, 48.0);

        app.world_mut().send_event(SelectionDropped {
            ants: vec![id],
            pointer: Vec2::new(400.0, 400.0),
        });
        app.update();

        assert_eq!(app.world().resource::<Score>().0, 0, "nothing eaten");
        assert!(app.world().resource::<Colony>().contains(id), "ant still there");
        assert!(
            app.world().resource::<Events<AntsEaten>>().is_empty(),
            "no batch reported"
        );
    }
}
