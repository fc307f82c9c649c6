/// UI module exports
pub mod client;
pub mod components;
pub mod manager;
pub mod popup;
pub mod session;

/// Vertical scroll offset of the page, 0 when unknown
pub fn scroll_offset() -> f64 {
    web_sys::window()
        .and_then(|window| window.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn restore_scroll(offset: f64) {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, offset);
    }
}
