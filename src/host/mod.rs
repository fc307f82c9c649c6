//! The browser's window/tab API, as seen by the background coordinator
//!
//! Everything that touches `chrome.windows` or `chrome.tabs` goes through
//! [`BrowserHost`]. The extension runs it against [`ChromeHost`]; tests run it
//! against an in-memory fake.

mod chrome;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::snapshot::{TabId, WindowId};

pub use chrome::ChromeHost;

/// Index value that appends a moved tab to the end of its target window
pub const APPEND_INDEX: i64 = -1;

/// `chrome.tabs.MutedInfo`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HostMutedInfo {
    pub muted: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `chrome.tabs.Tab`, with the fields this extension reads
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTab {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub pinned: bool,
    #[serde(default)]
    pub audible: Option<bool>,
    #[serde(default)]
    pub muted_info: Option<HostMutedInfo>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub discarded: bool,
}

/// `chrome.windows.Window`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostWindow {
    pub id: WindowId,
    pub focused: bool,
    #[serde(rename = "type")]
    pub window_type: String,
    pub state: String,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub tabs: Option<Vec<HostTab>>,
}

impl HostWindow {
    /// An unfocused, empty, normal window
    pub fn normal(id: WindowId) -> Self {
        HostWindow {
            id,
            focused: false,
            window_type: "normal".to_string(),
            state: "normal".to_string(),
            incognito: false,
            always_on_top: false,
            width: None,
            height: None,
            tabs: None,
        }
    }
}

/// Options for `chrome.windows.create`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub focused: bool,
}

impl CreateWindow {
    /// A focused window built around an existing tab
    pub fn around_tab(tab_id: TabId) -> Self {
        CreateWindow {
            tab_id: Some(tab_id),
            url: None,
            focused: true,
        }
    }

    /// A focused window opened on `url`
    pub fn with_url(url: impl Into<String>) -> Self {
        CreateWindow {
            tab_id: None,
            url: Some(url.into()),
            focused: true,
        }
    }
}

/// Asynchronous access to the browser's windows and tabs
///
/// Every call is a single host request that either completes or reports the
/// host's own error message. Nothing is retried.
#[async_trait(?Send)]
pub trait BrowserHost {
    /// Every normal-type window, with its tabs populated
    async fn get_all_windows(&self) -> Result<Vec<HostWindow>, HostError>;

    async fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError>;

    /// Closes the window together with all of its tabs
    async fn remove_window(&self, window_id: WindowId) -> Result<(), HostError>;

    /// Moves a tab into `window_id` at `index`; [`APPEND_INDEX`] appends
    async fn move_tab(&self, tab_id: TabId, window_id: WindowId, index: i64) -> Result<(), HostError>;

    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError>;

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), HostError>;

    async fn get_tab(&self, tab_id: TabId) -> Result<HostTab, HostError>;

    /// Tabs whose URL matches `url`
    async fn query_tabs_by_url(&self, url: &str) -> Result<Vec<HostTab>, HostError>;

    async fn create_tab(&self, url: &str, active: bool) -> Result<HostTab, HostError>;

    async fn create_window(&self, options: CreateWindow) -> Result<HostWindow, HostError>;
}
