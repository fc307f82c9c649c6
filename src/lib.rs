/// Window & Tab Manager - Chrome extension for managing every open window
/// Built with Rust + WASM + Yew

mod background;
mod commands;
pub mod config;
pub mod domain;
pub mod error;
mod gather;
pub mod host;
mod js;
pub mod notifier;
pub mod protocol;
pub mod router;
pub mod snapshot;
pub mod timer;
pub mod ui;

use wasm_bindgen::prelude::*;

use crate::config::Config;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(Config::default().log_level));
}

// Register the service worker's listeners
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Start the Yew app for the toolbar popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::Popup>::new().render();
}

// Start the Yew app for the full-page manager
#[wasm_bindgen]
pub fn start_manager() {
    yew::Renderer::<ui::manager::Manager>::new().render();
}
