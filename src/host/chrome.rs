/// `BrowserHost` backed by the `chrome.windows` / `chrome.tabs` APIs
use async_trait::async_trait;
use wasm_bindgen::prelude::*;

use super::{BrowserHost, CreateWindow, HostTab, HostWindow};
use crate::error::HostError;
use crate::js::{error_message, from_js, to_js};
use crate::snapshot::{TabId, WindowId};

// Import JS bridge functions
#[wasm_bindgen(module = "/js/host.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getAllWindows() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeWindow(window_id: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTab(tab_id: f64, window_id: f64, index: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn focusWindow(window_id: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn activateTab(tab_id: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabsByUrl(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str, active: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createWindow(options: JsValue) -> Result<JsValue, JsValue>;
}

/// Chrome's window/tab API. Ids cross the bridge as JS numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeHost;

fn host_error(err: JsValue) -> HostError {
    HostError::new(error_message(&err))
}

fn parse<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, HostError> {
    from_js(value).map_err(HostError::new)
}

#[async_trait(?Send)]
impl BrowserHost for ChromeHost {
    async fn get_all_windows(&self) -> Result<Vec<HostWindow>, HostError> {
        let windows = getAllWindows().await.map_err(host_error)?;
        parse(windows)
    }

    async fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        removeTab(tab_id as f64).await.map_err(host_error)
    }

    async fn remove_window(&self, window_id: WindowId) -> Result<(), HostError> {
        removeWindow(window_id as f64).await.map_err(host_error)
    }

    async fn move_tab(&self, tab_id: TabId, window_id: WindowId, index: i64) -> Result<(), HostError> {
        moveTab(tab_id as f64, window_id as f64, index as f64)
            .await
            .map_err(host_error)
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError> {
        focusWindow(window_id as f64).await.map_err(host_error)
    }

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        activateTab(tab_id as f64).await.map_err(host_error)
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<HostTab, HostError> {
        let tab = getTab(tab_id as f64).await.map_err(host_error)?;
        parse(tab)
    }

    async fn query_tabs_by_url(&self, url: &str) -> Result<Vec<HostTab>, HostError> {
        let tabs = queryTabsByUrl(url).await.map_err(host_error)?;
        parse(tabs)
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<HostTab, HostError> {
        let tab = createTab(url, active).await.map_err(host_error)?;
        parse(tab)
    }

    async fn create_window(&self, options: CreateWindow) -> Result<HostWindow, HostError> {
        let options = to_js(&options).map_err(HostError::new)?;
        let window = createWindow(options).await.map_err(host_error)?;
        parse(window)
    }
}
