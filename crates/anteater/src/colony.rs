//! The live ants, in spawn order.

use core::fmt;

use bevy::prelude::*;
use strum::Display;

use crate::config::GameConfig;

/// Unique per process, handed out in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AntId(pub u64);

impl fmt::Display for AntId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ant-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AntSize {
    Small,
    Large,
}

impl AntSize {
    /// Side of the ant's square bounding box in pixels.
    pub const fn extent(self, config: &GameConfig) -> f32 {
        match self {
            Self::Small => config.small_ant_extent,
            Self::Large => config.large_ant_extent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ant {
    pub id: AntId,
    /// The sprite drawn for this ant.
    pub sprite: Entity,
    /// Center of the ant in screen space.
    pub position: Vec2,
    pub size: AntSize,
    pub extent: f32,
}

impl Ant {
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(self.extent))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }
}

/// Marks the sprite of an ant and links it back to the colony.
#[derive(Component, Debug, Clone, Copy)]
pub struct AntSprite {
    pub id: AntId,
}

/// Ordered store of active ants.
///
/// Ants are only ever appended with fresh ids and removals keep order, so the
/// backing vector stays sorted by id and lookups are binary searches.
#[derive(Resource, Default, Debug)]
pub struct Colony {
    ants: Vec<Ant>,
    next_id: u64,
}

impl Colony {
    /// Registers a new ant and returns its id.
    pub fn insert(&mut self, sprite: Entity, position: Vec2, size: AntSize, extent: f32) -> AntId {
        let id = AntId(self.next_id);
        self.next_id += 1;
        self.ants.push(Ant {
            id,
            sprite,
            position,
            size,
            extent,
        });
        id
    }

    fn index_of(&self, id: AntId) -> Option<usize> {
        self.ants.binary_search_by_key(&id, |ant| ant.id).ok()
    }

    pub fn get(&self, id: AntId) -> Option<&Ant> {
        self.ants.get(self.index_of(id)?)
    }

    pub fn get_mut(&mut self, id: AntId) -> Option<&mut Ant> {
        let index = self.index_of(id)?;
        self.ants.get_mut(index)
    }

    pub fn contains(&self, id: AntId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn remove(&mut self, id: AntId) -> Option<Ant> {
        let index = self.index_of(id)?;
        Some(self.ants.remove(index))
    }

    pub fn ids(&self) -> Vec<AntId> {
        self.ants.iter().map(|ant| ant.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ant> {
        self.ants.iter()
    }

    pub fn len(&self) -> usize {
        self.ants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ants.is_empty()
    }

    /// Topmost ant under `point`. Later spawns are drawn above earlier ones.
    pub fn ant_at(&self, point: Vec2) -> Option<AntId> {
        self.ants
            .iter()
            .rev()
            .find(|ant| ant.contains(point))
            .map(|ant| ant.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colony_with(positions: &[Vec2]) -> Colony {
        let mut colony = Colony::default();
        for (index, &position) in positions.iter().enumerate() {
            colony.insert(
                Entity::from_raw(index as u32),
                position,
                AntSize::Small,
                20.0,
            );
        }
        colony
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut colony = colony_with(&[Vec2::ZERO, Vec2::ONE]);
        let removed = colony.remove(AntId(0)).expect("first ant exists");
        let fresh = colony.insert(Entity::from_raw(9), Vec2::ZERO, AntSize::Large, 40.0);

        assert_eq!(removed.id, AntId(0), "removed the requested ant");
        assert_eq!(fresh, AntId(2), "ids are never reused");
        assert_eq!(colony.ids(), vec![AntId(1), AntId(2)], "spawn order kept");
    }

    #[test]
    fn lookups_survive_removals() {
        let mut colony = colony_with(&[Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0), Vec2::splat(3.0)]);
        colony.remove(AntId(1));

        assert!(!colony.contains(AntId(1)), "removed ant is gone");
        assert_eq!(
            colony.get(AntId(3)).map(|ant| ant.position),
            Some(Vec2::splat(3.0)),
            "later ants are still found"
        );
        assert!(colony.remove(AntId(1)).is_none(), "double removal is a no-op");
    }

    #[test]
    fn topmost_ant_wins_hit_test() {
        let colony = colony_with(&[Vec2::new(100.0, 100.0), Vec2::new(105.0, 100.0)]);
        assert_eq!(
            colony.ant_at(Vec2::new(103.0, 100.0)),
            Some(AntId(1)),
            "the later spawn is on top"
        );
        assert_eq!(colony.ant_at(Vec2::new(300.0, 300.0)), None, "empty spot");
    }

    #[test]
    fn extent_follows_size() {
        let config = GameConfig::default();
        assert!(
            AntSize::Large.extent(&config) > AntSize::Small.extent(&config),
            "large ants are larger"
        );
        assert_eq!(AntSize::Small.to_string(), "small", "lowercase display");
    }
}
