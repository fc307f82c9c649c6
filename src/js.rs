/// Conversions across the JS boundary
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};

/// Serialize into plain JS objects (no `Map`s, no `BigInt`s) so the value can
/// be handed straight to the `chrome.*` APIs
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {}", e))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| format!("Failed to parse: {}", e))
}

/// Best-effort human readable message for a rejected promise
pub fn error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    match err.as_string() {
        Some(message) => message,
        None => format!("{:?}", err),
    }
}
