//! Message shapes exchanged between the UI surfaces and the background
//!
//! Requests are `{action, data?}` objects, responses are `{success: true, ...}`
//! or `{error}`, and background pushes are tagged by `action` as well.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::RouterError;
use crate::snapshot::{MAX_SAFE_INTEGER, TabId, WindowId, WindowSnapshot};

pub const LIST_ALL: &str = "list-all";
pub const CLOSE_TAB: &str = "close-tab";
pub const CLOSE_WINDOW: &str = "close-window";
pub const MOVE_TAB: &str = "move-tab";
pub const FOCUS_WINDOW: &str = "focus-window";
pub const FOCUS_TAB: &str = "focus-tab";

/// An operation the background can run against the browser
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ListAll,
    CloseTab { tab_id: TabId },
    CloseWindow { window_id: WindowId },
    /// `index: None` appends to the end of the target window
    MoveTab {
        tab_id: TabId,
        window_id: WindowId,
        index: Option<i64>,
    },
    FocusWindow { window_id: WindowId },
    FocusTab { tab_id: TabId },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ListAll => LIST_ALL,
            Action::CloseTab { .. } => CLOSE_TAB,
            Action::CloseWindow { .. } => CLOSE_WINDOW,
            Action::MoveTab { .. } => MOVE_TAB,
            Action::FocusWindow { .. } => FOCUS_WINDOW,
            Action::FocusTab { .. } => FOCUS_TAB,
        }
    }

    /// Resolve an action name and its payload, checking every id argument
    pub fn parse(name: &str, data: Option<&Value>) -> Result<Action, RouterError> {
        let action = match name {
            LIST_ALL => Action::ListAll,
            CLOSE_TAB => Action::CloseTab {
                tab_id: id_field(data, "tabId", "tab ID")?,
            },
            CLOSE_WINDOW => Action::CloseWindow {
                window_id: id_field(data, "windowId", "window ID")?,
            },
            MOVE_TAB => Action::MoveTab {
                tab_id: id_field(data, "tabId", "tab ID")?,
                window_id: id_field(data, "windowId", "window ID")?,
                index: index_field(data)?,
            },
            FOCUS_WINDOW => Action::FocusWindow {
                window_id: id_field(data, "windowId", "window ID")?,
            },
            FOCUS_TAB => Action::FocusTab {
                tab_id: id_field(data, "tabId", "tab ID")?,
            },
            other => return Err(RouterError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    /// The `{action, data?}` request a UI surface sends for this action
    pub fn to_request(&self) -> Value {
        let data = match self {
            Action::ListAll => None,
            Action::CloseTab { tab_id } | Action::FocusTab { tab_id } => {
                Some(json!({ "tabId": tab_id }))
            }
            Action::CloseWindow { window_id } | Action::FocusWindow { window_id } => {
                Some(json!({ "windowId": window_id }))
            }
            Action::MoveTab {
                tab_id,
                window_id,
                index,
            } => {
                let mut data = Map::new();
                data.insert("tabId".to_string(), json!(tab_id));
                data.insert("windowId".to_string(), json!(window_id));
                if let Some(index) = index {
                    data.insert("index".to_string(), json!(index));
                }
                Some(Value::Object(data))
            }
        };

        match data {
            Some(data) => json!({ "action": self.name(), "data": data }),
            None => json!({ "action": self.name() }),
        }
    }
}

/// A usable window/tab id: a positive integer below `MAX_SAFE_INTEGER`
pub fn parse_id(value: &Value) -> Option<i64> {
    let number = value.as_f64()?;
    if number.fract() != 0.0 || number <= 0.0 || number >= MAX_SAFE_INTEGER as f64 {
        return None;
    }
    Some(number as i64)
}

fn id_field(data: Option<&Value>, field: &str, label: &'static str) -> Result<i64, RouterError> {
    data.and_then(|data| data.get(field))
        .and_then(parse_id)
        .ok_or(RouterError::InvalidArgument(label))
}

/// `-1` and a missing or null index both mean "append"
fn index_field(data: Option<&Value>) -> Result<Option<i64>, RouterError> {
    let index = match data.and_then(|data| data.get("index")) {
        None | Some(Value::Null) => return Ok(None),
        Some(index) => index,
    };

    let number = index
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= -1.0 && *n < MAX_SAFE_INTEGER as f64)
        .ok_or(RouterError::InvalidArgument("tab index"))?;

    if number < 0.0 {
        Ok(None)
    } else {
        Ok(Some(number as i64))
    }
}

/// Who sent a runtime message (`chrome.runtime.MessageSender`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageSender {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl MessageSender {
    pub fn extension(id: impl Into<String>) -> Self {
        MessageSender {
            id: Some(id.into()),
            url: None,
        }
    }
}

/// Reply to one action request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Success {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        windows: Option<Vec<WindowSnapshot>>,
    },
    Failure {
        error: String,
    },
}

impl ActionResponse {
    pub fn ok() -> Self {
        ActionResponse::Success {
            success: true,
            windows: None,
        }
    }

    pub fn with_windows(windows: Vec<WindowSnapshot>) -> Self {
        ActionResponse::Success {
            success: true,
            windows: Some(windows),
        }
    }

    pub fn failure(error: &RouterError) -> Self {
        ActionResponse::Failure {
            error: error.to_string(),
        }
    }

    pub fn into_result(self) -> Result<Option<Vec<WindowSnapshot>>, String> {
        match self {
            ActionResponse::Success { windows, .. } => Ok(windows),
            ActionResponse::Failure { error } => Err(error),
        }
    }
}

/// Position change of a tab inside one window (`chrome.tabs.onMoved`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub window_id: WindowId,
    pub from_index: i64,
    pub to_index: i64,
}

/// `chrome.tabs.onAttached`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachInfo {
    pub new_window_id: WindowId,
    pub new_position: i64,
}

/// `chrome.tabs.onDetached`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachInfo {
    pub old_window_id: WindowId,
    pub old_position: i64,
}

/// Host data carried by an immediate push
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImmediateData {
    Moved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "moveInfo")]
        move_info: MoveInfo,
    },
    Attached {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "attachInfo")]
        attach_info: AttachInfo,
    },
    Detached {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "detachInfo")]
        detach_info: DetachInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImmediateKind {
    TabMoved,
    TabAttached,
    TabDetached,
}

/// Background-to-UI notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Push {
    /// Something changed; sent once per quiet period
    StateChanged,
    /// A tab changed position or window; sent for every event
    StateChangedImmediate {
        #[serde(rename = "eventType")]
        event_type: ImmediateKind,
        data: ImmediateData,
    },
}
