use bevy::prelude::*;
use bevy::window::PrimaryWindow;

// wgpu refuses surfaces above the max texture extent on most browsers.
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Clamps a browser inner size to a surface size the renderer accepts.
pub fn clamp_surface_size(width: f32, height: f32) -> Vec2 {
    Vec2::new(width.min(MAX_SURFACE_EXTENT), height.min(MAX_SURFACE_EXTENT))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(mut primary_query: Query<&mut Window, With<PrimaryWindow>>) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) = (wasm_window.inner_width(), wasm_window.inner_height())
    else {
        return;
    };
    let (Some(width), Some(height)) = (inner_width.as_f64(), inner_height.as_f64()) else {
        return;
    };

    let target = clamp_surface_size(width as f32, height as f32);

    for mut window in &mut primary_query {
        if (window.resolution.width() - target.x).abs() > f32::EPSILON
            || (window.resolution.height() - target.y).abs() > f32::EPSILON
        {
            window.resolution.set(target.x, target.y);
        }
    }
}

/// Logical size of the primary window, the screen space ants live in.
pub fn viewport_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    let window = windows.get_single().ok()?;
    Some(Vec2::new(window.width(), window.height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_browser_is_clamped() {
        assert_eq!(
            clamp_surface_size(1284.0, 2418.0),
            Vec2::new(1284.0, 2048.0),
            "only the tall side should be clamped"
        );
    }
}
