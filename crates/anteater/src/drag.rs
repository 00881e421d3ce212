use anteater_helpers::input::{
    command_held, just_pressed_screen_position, just_released_screen_position,
    pointer_released, pressed_screen_position, screen_to_world, shift_held,
};
use bevy::prelude::*;
use bevy::utils::HashSet;
use bevy::window::PrimaryWindow;

use crate::colony::{AntSprite, Colony};
use crate::config::GameConfig;
use crate::core::{GameRng, LongPressPromoted, SelectionDropped, Viewport};
use crate::gesture::{DragController, GestureSettings, SelectionModifiers};
use crate::spawner::{ANT_Z, ant_color};

const DRAGGED_Z: f32 = 5.0;
const SELECTED_TINT: Color = Color::srgb(0.95, 0.55, 0.1);

/// Last pointer position seen during the active gesture, used when the
/// release itself happens off-window.
#[derive(Resource, Default)]
struct LastPointer(Option<Vec2>);

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub struct DragSystems;

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastPointer>()
            .add_event::<SelectionDropped>()
            .add_event::<LongPressPromoted>()
            .add_systems(Startup, insert_controller)
            .add_systems(
                Update,
                (
                    begin_gesture,
                    tick_long_press,
                    follow_pointer,
                    end_gesture,
                    sync_ant_sprites,
                )
                    .chain()
                    .in_set(DragSystems),
            );
    }
}

fn insert_controller(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(DragController::new(GestureSettings::from(&*config)));
}

/// True while the pointer is on a UI button, which then owns the press.
fn pointer_on_button(interactions: &Query<&Interaction, With<Button>>) -> bool {
    interactions
        .iter()
        .any(|interaction| matches!(interaction, Interaction::Pressed | Interaction::Hovered))
}

fn begin_gesture(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    interactions: Query<&Interaction, With<Button>>,
    mut controller: ResMut<DragController>,
    mut colony: ResMut<Colony>,
    mut rng: ResMut<GameRng>,
    mut last_pointer: ResMut<LastPointer>,
) {
    if controller.is_active() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(origin) = just_pressed_screen_position(&buttons, &touches, window) else {
        return;
    };
    if pointer_on_button(&interactions) {
        return;
    }
    let Some(anchor) = colony.ant_at(origin) else {
        return;
    };

    let modifiers = SelectionModifiers {
        cluster: shift_held(&keys),
        all: command_held(&keys),
    };

    match controller.begin(&mut colony, anchor, origin, modifiers, &mut rng.0) {
        Ok(mode) => {
            last_pointer.0 = Some(origin);
            debug!(
                "Grabbed {anchor} ({mode:?}), {} selected",
                controller.selection().len()
            );
        }
        Err(err) => warn!("Could not start drag: {err}"),
    }
}

fn tick_long_press(
    time: Res<Time>,
    mut controller: ResMut<DragController>,
    mut colony: ResMut<Colony>,
    mut rng: ResMut<GameRng>,
    mut promoted: EventWriter<LongPressPromoted>,
) {
    if controller.tick(time.delta(), &mut colony, &mut rng.0) {
        debug!("Long press grabbed the whole colony ({} ants)", colony.len());
        promoted.send(LongPressPromoted);
    }
}

fn follow_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut controller: ResMut<DragController>,
    mut last_pointer: ResMut<LastPointer>,
) {
    if !controller.is_active() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(pointer) = pressed_screen_position(&buttons, &touches, window) else {
        return;
    };
    controller.drag_to(pointer);
    last_pointer.0 = Some(pointer);
}

fn end_gesture(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut controller: ResMut<DragController>,
    mut colony: ResMut<Colony>,
    mut last_pointer: ResMut<LastPointer>,
    mut dropped: EventWriter<SelectionDropped>,
) {
    if !controller.is_active() {
        return;
    }
    let released_at = windows
        .get_single()
        .ok()
        .and_then(|window| just_released_screen_position(&buttons, &touches, window));
    if released_at.is_none() && !pointer_released(&buttons, &touches) {
        return;
    }

    // Off-window releases end where the pointer was last seen.
    let Some(pointer) = released_at.or(last_pointer.0) else {
        return;
    };
    last_pointer.0 = None;

    if let Some(selection) = controller.release(pointer, &mut colony) {
        debug!(
            "Dropped {} ant(s) after moving {}",
            selection.ants.len(),
            selection.delta
        );
        dropped.send(SelectionDropped {
            ants: selection.ants,
            pointer,
        });
    }
}

/// Draws each ant at its provisional position and tints the current selection.
fn sync_ant_sprites(
    controller: Res<DragController>,
    colony: Res<Colony>,
    viewport: Res<Viewport>,
    mut sprites: Query<(&AntSprite, &mut Transform, &mut Sprite)>,
) {
    let selected: HashSet<_> = controller.selection().iter().copied().collect();
    let group = selected.len() > 1;

    for (ant_sprite, mut transform, mut sprite) in &mut sprites {
        let Some(ant) = colony.get(ant_sprite.id) else {
            continue;
        };
        let is_selected = selected.contains(&ant.id);
        let z = if is_selected { DRAGGED_Z } else { ANT_Z };
        let translation = screen_to_world(controller.display_position(ant), viewport.0).extend(z);
        if transform.translation != translation {
            transform.translation = translation;
        }

        let color = if is_selected && group {
            SELECTED_TINT
        } else {
            ant_color(ant.size)
        };
        if sprite.color != color {
            sprite.color = color;
        }
        let scale = if is_selected { Vec3::splat(1.15) } else { Vec3::ONE };
        if transform.scale != scale {
            transform.scale = scale;
        }
    }
}
