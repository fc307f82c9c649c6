/// How a UI surface talks to the background worker
use log::debug;
use wasm_bindgen::prelude::*;

use crate::js::{error_message, from_js, to_js};
use crate::protocol::{Action, ActionResponse, Push};
use crate::snapshot::WindowSnapshot;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/surface.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    fn addPushListener(handler: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

    fn removePushListener(listener: &js_sys::Function);

    fn extensionUrl(path: &str) -> String;

    fn closeSurface();
}

pub async fn request(action: Action) -> Result<ActionResponse, String> {
    let message = to_js(&action.to_request())?;
    let response = sendRuntimeMessage(message)
        .await
        .map_err(|e| format!("Failed to reach background: {}", error_message(&e)))?;
    from_js(response)
}

/// Fetch a fresh snapshot of every window
pub async fn list_all() -> Result<Vec<WindowSnapshot>, String> {
    let windows = request(Action::ListAll).await?.into_result()?;
    Ok(windows.unwrap_or_default())
}

/// Run an action whose only result is success or an error message
pub async fn perform(action: Action) -> Result<(), String> {
    request(action).await?.into_result().map(|_| ())
}

pub fn page_url(path: &str) -> String {
    extensionUrl(path)
}

pub fn close_surface() {
    closeSurface();
}

/// Listens for background pushes until dropped
pub struct PushSubscription {
    listener: js_sys::Function,
    _handler: Closure<dyn FnMut(JsValue)>,
}

impl PushSubscription {
    pub fn new(mut on_push: impl FnMut(Push) + 'static) -> Self {
        let handler = Closure::wrap(Box::new(move |message: JsValue| {
            // Requests from the other surface arrive here too
            match from_js::<Push>(message) {
                Ok(push) => on_push(push),
                Err(e) => debug!("Ignoring runtime message: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);

        let listener = addPushListener(&handler);
        PushSubscription {
            listener,
            _handler: handler,
        }
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        removePushListener(&self.listener);
    }
}
