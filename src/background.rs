/// Background service worker: wires runtime messages to the router, host
/// lifecycle events to the notifier and keyboard shortcuts to commands
use std::rc::Rc;

use log::{debug, error, info, warn};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::handle_command;
use crate::config::Config;
use crate::host::ChromeHost;
use crate::js::{error_message, from_js, to_js};
use crate::notifier::{ChangeNotifier, HostEvent, PushSink};
use crate::protocol::{MessageSender, Push};
use crate::router::ActionRouter;
use crate::timer::BrowserTimers;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/background.js")]
extern "C" {
    fn runtimeId() -> String;

    fn extensionUrl(path: &str) -> String;

    fn onRuntimeMessage(handler: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);

    fn onHostEvent(handler: &Closure<dyn FnMut(JsValue)>);

    fn onCommand(handler: &Closure<dyn FnMut(String)>);

    #[wasm_bindgen(catch)]
    async fn broadcast(message: JsValue) -> Result<(), JsValue>;
}

/// Sends pushes to every open extension page
pub struct RuntimeBroadcast;

impl PushSink for RuntimeBroadcast {
    fn push(&self, push: Push) {
        let message = match to_js(&push) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to encode push: {}", e);
                return;
            }
        };
        spawn_local(async move {
            // Rejects when no page is open to listen
            if let Err(e) = broadcast(message).await {
                debug!("Push not delivered: {}", error_message(&e));
            }
        });
    }
}

/// Install the Rust handlers behind the listeners the bridge added at load.
/// Events queued while the module was loading are replayed in order.
/// Handlers live as long as the worker.
pub fn start() {
    let config = Config::default();
    let router = Rc::new(ActionRouter::new(ChromeHost, runtimeId(), &config));

    let on_message = Closure::wrap(Box::new(
        move |message: JsValue, sender: JsValue, send_response: js_sys::Function| -> bool {
            let message: Value = match from_js(message) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Unreadable runtime message: {}", e);
                    Value::Null
                }
            };
            // An unreadable sender has no id and is rejected by the router
            let sender: MessageSender = from_js(sender).unwrap_or_default();

            let router = router.clone();
            spawn_local(async move {
                let response = router.handle(&message, &sender).await;
                match to_js(&response) {
                    Ok(response) => {
                        if let Err(e) = send_response.call1(&JsValue::NULL, &response) {
                            debug!("Requester went away: {}", error_message(&e));
                        }
                    }
                    Err(e) => error!("Failed to encode response: {}", e),
                }
            });
            // Keep the channel open for the asynchronous reply
            true
        },
    ) as Box<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>);
    onRuntimeMessage(&on_message);
    on_message.forget();

    let notifier = ChangeNotifier::new(BrowserTimers, RuntimeBroadcast, &config);
    let on_event = Closure::wrap(Box::new(move |event: JsValue| match from_js::<HostEvent>(event) {
        Ok(event) => notifier.observe(event),
        Err(e) => warn!("Ignoring host event: {}", e),
    }) as Box<dyn FnMut(JsValue)>);
    onHostEvent(&on_event);
    on_event.forget();

    let manager_url = extensionUrl(config.manager_page);
    let on_command = Closure::wrap(Box::new(move |command: String| {
        let manager_url = manager_url.clone();
        spawn_local(async move {
            handle_command(&ChromeHost, &command, &manager_url).await;
        });
    }) as Box<dyn FnMut(String)>);
    onCommand(&on_command);
    on_command.forget();

    info!("Background worker started");
}
