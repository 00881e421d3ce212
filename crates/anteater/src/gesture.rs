//! Selection and drag state for a single pointer gesture.
//!
//! A gesture starts on an ant, optionally grows to the whole colony, and ends
//! on release. While it is active the selected ants are drawn at
//! `position + delta`; their stored positions change only when the gesture
//! ends, or when the colony is clustered around the grabbed ant.

use core::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

use crate::colony::{Ant, AntId, Colony};
use crate::config::GameConfig;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GestureError {
    #[error("a gesture is already in progress")]
    AlreadyActive,

    #[error("{0} is not in the colony")]
    UnknownAnt(AntId),
}

/// Held modifier keys at gesture start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionModifiers {
    /// Shift: grab every ant and pull them onto the grabbed one.
    pub cluster: bool,
    /// Ctrl / Cmd: grab every ant where it stands.
    pub all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    All,
    Clustered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSettings {
    pub long_press: Duration,
    pub move_threshold: f32,
    pub cluster_jitter: f32,
}

impl From<&GameConfig> for GestureSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            long_press: config.long_press(),
            move_threshold: config.move_threshold,
            cluster_jitter: config.cluster_jitter,
        }
    }
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

#[derive(Debug)]
struct ActiveGesture {
    origin: Vec2,
    anchor: AntId,
    selection: Vec<AntId>,
    mode: SelectionMode,
    long_press: Option<Timer>,
    delta: Vec2,
}

/// What a finished gesture hands to the eating step.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedSelection {
    pub ants: Vec<AntId>,
    pub delta: Vec2,
}

#[derive(Resource, Debug, Default)]
pub struct DragController {
    settings: GestureSettings,
    gesture: Option<ActiveGesture>,
}

impl DragController {
    pub const fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            gesture: None,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn mode(&self) -> Option<SelectionMode> {
        self.gesture.as_ref().map(|gesture| gesture.mode)
    }

    pub fn selection(&self) -> &[AntId] {
        match &self.gesture {
            Some(gesture) => &gesture.selection,
            None => &[],
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.gesture.as_ref().map_or(Vec2::ZERO, |gesture| gesture.delta)
    }

    pub fn long_press_pending(&self) -> bool {
        self.gesture
            .as_ref()
            .is_some_and(|gesture| gesture.long_press.is_some())
    }

    /// Starts a gesture on `anchor` at pointer `origin`.
    pub fn begin(
        &mut self,
        colony: &mut Colony,
        anchor: AntId,
        origin: Vec2,
        modifiers: SelectionModifiers,
        rng: &mut fastrand::Rng,
    ) -> Result<SelectionMode, GestureError> {
        if self.gesture.is_some() {
            return Err(GestureError::AlreadyActive);
        }
        if !colony.contains(anchor) {
            return Err(GestureError::UnknownAnt(anchor));
        }

        let (mode, selection, long_press) = if modifiers.cluster {
            cluster_around(colony, anchor, self.settings.cluster_jitter, rng);
            (SelectionMode::Clustered, colony.ids(), None)
        } else if modifiers.all {
            (SelectionMode::All, colony.ids(), None)
        } else {
            let timer = Timer::new(self.settings.long_press, TimerMode::Once);
            (SelectionMode::Single, vec![anchor], Some(timer))
        };

        self.gesture = Some(ActiveGesture {
            origin,
            anchor,
            selection,
            mode,
            long_press,
            delta: Vec2::ZERO,
        });
        Ok(mode)
    }

    /// Follows the pointer. Returns the provisional delta, or `None` when idle.
    pub fn drag_to(&mut self, pointer: Vec2) -> Option<Vec2> {
        let threshold = self.settings.move_threshold;
        let gesture = self.gesture.as_mut()?;
        let delta = pointer - gesture.origin;

        if delta.x.abs() > threshold || delta.y.abs() > threshold {
            gesture.long_press = None;
        }
        gesture.delta = delta;
        Some(delta)
    }

    /// Advances the long-press timer. Returns true on the frame the selection
    /// is promoted to the whole colony.
    pub fn tick(&mut self, elapsed: Duration, colony: &mut Colony, rng: &mut fastrand::Rng) -> bool {
        let jitter = self.settings.cluster_jitter;
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        let Some(timer) = gesture.long_press.as_mut() else {
            return false;
        };
        if !timer.tick(elapsed).finished() {
            return false;
        }

        gesture.long_press = None;
        cluster_around(colony, gesture.anchor, jitter, rng);
        gesture.selection = colony.ids();
        gesture.mode = SelectionMode::Clustered;
        true
    }

    /// Ends the gesture at `pointer`, committing the delta into every selected
    /// ant that is still in the colony.
    pub fn release(&mut self, pointer: Vec2, colony: &mut Colony) -> Option<DroppedSelection> {
        let gesture = self.gesture.take()?;
        let delta = pointer - gesture.origin;

        for &id in &gesture.selection {
            if let Some(ant) = colony.get_mut(id) {
                ant.position += delta;
            }
        }

        Some(DroppedSelection {
            ants: gesture.selection,
            delta,
        })
    }

    /// Where `ant` should be drawn right now.
    pub fn display_position(&self, ant: &Ant) -> Vec2 {
        match &self.gesture {
            Some(gesture) if gesture.selection.contains(&ant.id) => ant.position + gesture.delta,
            _ => ant.position,
        }
    }
}

/// Moves every ant except `anchor` to a random spot within `jitter` of it on each axis.
pub fn cluster_around(colony: &mut Colony, anchor: AntId, jitter: f32, rng: &mut fastrand::Rng) {
    let Some(center) = colony.get(anchor).map(|ant| ant.position) else {
        return;
    };
    for id in colony.ids() {
        if id == anchor {
            continue;
        }
        let offset = Vec2::new(
            rng.f32().mul_add(2.0, -1.0) * jitter,
            rng.f32().mul_add(2.0, -1.0) * jitter,
        );
        if let Some(ant) = colony.get_mut(id) {
            ant.position = center + offset;
        }
    }
}
