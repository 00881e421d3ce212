use anteater_helpers::CANVAS_SELECTOR;
use wasm_bindgen::prelude::*;
use web_sys::console;

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document to render into"))?;
    // Bevy would otherwise create a detached canvas nobody sees.
    if document.query_selector(CANVAS_SELECTOR)?.is_none() {
        return Err(JsValue::from_str(&format!(
            "Missing canvas {CANVAS_SELECTOR}"
        )));
    }

    console::log_1(&format!("Starting anteater {}", env!("CARGO_PKG_VERSION")).into());
    anteater::run();
    Ok(())
}
