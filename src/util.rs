// Small browser-facing helpers.

use wasm_bindgen::JsValue;

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Short pulse on marker toggles. Best-effort: devices without a vibration
/// motor report failure and nothing else happens.
pub fn vibrate_soft() {
    if let Some(win) = web_sys::window() {
        let _ = win.navigator().vibrate_with_duration(12);
    }
}
