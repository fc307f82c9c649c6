/// Read-only window/tab snapshots handed from the background to the UI
use serde::{Deserialize, Serialize};

use crate::host::{HostTab, HostWindow};

pub type TabId = i64;
pub type WindowId = i64;

/// Largest integer a JS number holds exactly (`Number.MAX_SAFE_INTEGER`)
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Mute state of a tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutedInfo {
    pub muted: bool,
}

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: i64,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub pinned: bool,
    #[serde(default)]
    pub audible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted_info: Option<MutedInfo>,
}

impl TabSnapshot {
    pub fn is_muted(&self) -> bool {
        self.muted_info.as_ref().is_some_and(|info| info.muted)
    }
}

/// Information about a browser window and its tabs, in tab order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub focused: bool,
    #[serde(rename = "type")]
    pub window_type: String,
    pub state: String,
    pub tabs: Vec<TabSnapshot>,
}

impl WindowSnapshot {
    pub fn active_tab(&self) -> Option<&TabSnapshot> {
        self.tabs.iter().find(|tab| tab.active)
    }
}

pub fn total_tabs(windows: &[WindowSnapshot]) -> usize {
    windows.iter().map(|window| window.tabs.len()).sum()
}

pub fn find_tab(windows: &[WindowSnapshot], tab_id: TabId) -> Option<&TabSnapshot> {
    windows
        .iter()
        .flat_map(|window| window.tabs.iter())
        .find(|tab| tab.id == tab_id)
}

impl From<HostTab> for TabSnapshot {
    fn from(tab: HostTab) -> Self {
        TabSnapshot {
            id: tab.id,
            window_id: tab.window_id,
            index: tab.index,
            url: tab.url.unwrap_or_default(),
            title: tab.title.unwrap_or_default(),
            fav_icon_url: tab.fav_icon_url.filter(|icon| !icon.is_empty()),
            active: tab.active,
            pinned: tab.pinned,
            audible: tab.audible.unwrap_or(false),
            muted_info: tab.muted_info.map(|info| MutedInfo { muted: info.muted }),
        }
    }
}

impl From<HostWindow> for WindowSnapshot {
    fn from(window: HostWindow) -> Self {
        WindowSnapshot {
            id: window.id,
            focused: window.focused,
            window_type: window.window_type,
            state: window.state,
            tabs: window
                .tabs
                .unwrap_or_default()
                .into_iter()
                .map(TabSnapshot::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostMutedInfo;

    fn host_tab(id: TabId, window_id: WindowId) -> HostTab {
        HostTab {
            id,
            window_id,
            index: 0,
            url: Some("https://github.com/rust-lang".to_string()),
            title: Some("Rust".to_string()),
            fav_icon_url: Some(String::new()),
            active: true,
            pinned: false,
            audible: None,
            muted_info: Some(HostMutedInfo {
                muted: true,
                reason: Some("user".to_string()),
            }),
            status: Some("complete".to_string()),
            incognito: false,
            highlighted: true,
            discarded: false,
        }
    }

    #[test]
    fn test_tab_projection_drops_host_fields() {
        let snapshot = TabSnapshot::from(host_tab(7, 3));

        assert_eq!(snapshot.id, 7);
        assert_eq!(snapshot.window_id, 3);
        assert_eq!(snapshot.fav_icon_url, None);
        assert!(!snapshot.audible);
        assert!(snapshot.is_muted());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["windowId"], 3);
        assert_eq!(json["mutedInfo"], serde_json::json!({ "muted": true }));
        assert!(json.get("status").is_none());
        assert!(json.get("favIconUrl").is_none());
    }

    #[test]
    fn test_window_projection() {
        let window = HostWindow {
            id: 3,
            focused: true,
            window_type: "normal".to_string(),
            state: "maximized".to_string(),
            incognito: false,
            always_on_top: false,
            width: Some(1280),
            height: Some(800),
            tabs: Some(vec![host_tab(7, 3), host_tab(8, 3)]),
        };

        let snapshot = WindowSnapshot::from(window);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["type"], "normal");
        assert_eq!(json["state"], "maximized");
        assert_eq!(json["tabs"].as_array().unwrap().len(), 2);
        assert!(json.get("width").is_none());
    }

    #[test]
    fn test_find_tab_and_totals() {
        let windows = vec![
            WindowSnapshot::from(HostWindow {
                tabs: Some(vec![host_tab(1, 1), host_tab(2, 1)]),
                ..HostWindow::normal(1)
            }),
            WindowSnapshot::from(HostWindow {
                tabs: Some(vec![host_tab(5, 2)]),
                ..HostWindow::normal(2)
            }),
        ];

        assert_eq!(total_tabs(&windows), 3);
        assert_eq!(find_tab(&windows, 5).map(|tab| tab.window_id), Some(2));
        assert!(find_tab(&windows, 9).is_none());
    }
}
