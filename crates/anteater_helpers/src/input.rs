use bevy::prelude::*;

/// Pointer position (mouse or first touch) that went down this frame, in screen space.
pub fn just_pressed_screen_position(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: &Window,
) -> Option<Vec2> {
    if buttons.just_pressed(MouseButton::Left) {
        window.cursor_position()
    } else if touches.any_just_pressed() {
        let touch = touches.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// Pointer position while the mouse button or a touch is held.
pub fn pressed_screen_position(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: &Window,
) -> Option<Vec2> {
    if buttons.pressed(MouseButton::Left) {
        window.cursor_position()
    } else {
        touches.iter().next().map(bevy::input::touch::Touch::position)
    }
}

/// Pointer position that went up this frame. A cursor released outside the window yields `None`.
pub fn just_released_screen_position(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: &Window,
) -> Option<Vec2> {
    if buttons.just_released(MouseButton::Left) {
        window.cursor_position()
    } else if touches.any_just_released() {
        let touch = touches.iter_just_released().next()?;
        Some(touch.position())
    } else {
        None
    }
}

/// True once the pointer is no longer held by either the mouse or any touch.
pub fn pointer_released(buttons: &ButtonInput<MouseButton>, touches: &Touches) -> bool {
    !buttons.pressed(MouseButton::Left) && touches.iter().next().is_none()
}

pub fn shift_held(keys: &ButtonInput<KeyCode>) -> bool {
    keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight])
}

/// Ctrl on every platform, plus Cmd on macOS.
pub fn command_held(keys: &ButtonInput<KeyCode>) -> bool {
    keys.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ])
}

/// Screen space (origin top-left, y down) to the default 2D camera's world space.
pub fn screen_to_world(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(point.x - viewport.x / 2.0, viewport.y / 2.0 - point.y)
}

pub fn world_to_screen(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(point.x + viewport.x / 2.0, viewport.y / 2.0 - point.y)
}
