//! Browser affordances with quiet native fallbacks.

#[cfg(not(target_arch = "wasm32"))]
use bevy::log::info;
#[cfg(target_arch = "wasm32")]
use bevy::log::warn;

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// Short haptic pulse. Returns whether the device accepted it.
#[cfg(target_arch = "wasm32")]
pub fn vibrate(millis: u32) -> bool {
    web_sys::window().is_some_and(|window| window.navigator().vibrate_with_duration(millis))
}

#[cfg(not(target_arch = "wasm32"))]
pub const fn vibrate(_millis: u32) -> bool {
    false
}

/// Blocking notice. Native builds only log it.
#[cfg(target_arch = "wasm32")]
pub fn alert(message: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.alert_with_message(message) {
        warn!("alert failed: {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn alert(message: &str) {
    info!("{message}");
}

/// Asks the player for a line of text. `None` means the prompt was dismissed.
///
/// Native builds have no dialog and accept `default` as the answer.
#[cfg(target_arch = "wasm32")]
pub fn prompt(message: &str, default: &str) -> Option<String> {
    let window = web_sys::window()?;
    match window.prompt_with_message_and_default(message, default) {
        Ok(answer) => answer,
        Err(err) => {
            warn!("prompt failed: {err:?}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn prompt(message: &str, default: &str) -> Option<String> {
    info!("{message} -> {default}");
    Some(default.to_string())
}
