/// Keyboard shortcuts and the "open manager" flow shared with the popup
use log::{error, warn};

use crate::config::OPEN_MANAGER_COMMAND;
use crate::error::HostError;
use crate::host::BrowserHost;
use crate::snapshot::TabId;

/// Run a `chrome.commands` shortcut. Failures are logged, never surfaced.
pub async fn handle_command<H: BrowserHost>(host: &H, command: &str, manager_url: &str) {
    match command {
        OPEN_MANAGER_COMMAND => {
            if let Err(e) = open_manager(host, manager_url).await {
                error!("Failed to open manager page: {}", e);
            }
        }
        other => warn!("Unknown command: {}", other),
    }
}

/// Bring an existing manager tab to the front, or open one
pub async fn open_manager<H: BrowserHost>(host: &H, manager_url: &str) -> Result<TabId, HostError> {
    let existing = host.query_tabs_by_url(manager_url).await?;

    match existing.into_iter().next() {
        Some(tab) => {
            host.activate_tab(tab.id).await?;
            host.focus_window(tab.window_id).await?;
            Ok(tab.id)
        }
        None => {
            let tab = host.create_tab(manager_url, true).await?;
            Ok(tab.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use futures::executor::block_on;

    const MANAGER_URL: &str = "chrome-extension://abcdefghijklmnop/manager.html";

    #[test]
    fn test_opens_manager_when_missing() {
        let host = FakeHost::new();
        let window_id = host.add_window(&["https://a.example"]);
        block_on(host.focus_window(window_id)).unwrap();

        let tab_id = block_on(open_manager(&host, MANAGER_URL)).unwrap();

        let tab = host.tab(tab_id).unwrap();
        assert_eq!(tab.url.as_deref(), Some(MANAGER_URL));
        assert!(tab.active);
        assert_eq!(tab.window_id, window_id);
    }

    #[test]
    fn test_reuses_existing_manager_tab() {
        let host = FakeHost::new();
        let first = host.add_window(&["https://a.example"]);
        let second = host.add_window(&["https://b.example", MANAGER_URL]);
        let manager_tab = host.tab_ids(second)[1];
        block_on(host.focus_window(first)).unwrap();

        let tab_id = block_on(open_manager(&host, MANAGER_URL)).unwrap();

        assert_eq!(tab_id, manager_tab);
        assert_eq!(host.focused_window(), Some(second));
        assert!(host.tab(manager_tab).unwrap().active);
        assert!(!host.calls().iter().any(|call| call.starts_with("create_tab")));
    }

    #[test]
    fn test_unknown_command_does_nothing() {
        let host = FakeHost::new();

        block_on(handle_command(&host, "toggle-feature-x", MANAGER_URL));

        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_command_swallows_host_errors() {
        let host = FakeHost::new();
        host.fail_on("query_tabs_by_url");

        block_on(handle_command(&host, OPEN_MANAGER_COMMAND, MANAGER_URL));

        assert_eq!(host.calls().len(), 1);
    }
}
