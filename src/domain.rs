/// Presentation helpers shared by the popup and the manager page
use std::collections::BTreeMap;

use url::Url;

use crate::snapshot::{TabSnapshot, WindowSnapshot};

const EXTENSION_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' width='16' height='16' viewBox='0 0 24 24'><path fill='currentColor' d='M20.5 11H19V7a2 2 0 0 0-2-2h-4V3.5a2.5 2.5 0 0 0-5 0V5H4a2 2 0 0 0-2 2v3.8h1.5a2.5 2.5 0 0 1 0 5H2V20a2 2 0 0 0 2 2h3.8v-1.5a2.5 2.5 0 0 1 5 0V22H17a2 2 0 0 0 2-2v-4h1.5a2.5 2.5 0 0 0 0-5z'/></svg>";
const FILE_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' width='16' height='16' viewBox='0 0 24 24'><path fill='currentColor' d='M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8l-6-6m4 18H6V4h7v5h5v11z'/></svg>";
const BROWSER_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' width='16' height='16' viewBox='0 0 24 24'><circle cx='12' cy='12' r='9' fill='none' stroke='currentColor' stroke-width='2'/><circle cx='12' cy='12' r='3' fill='currentColor'/></svg>";
const GLOBE_ICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' width='16' height='16' viewBox='0 0 24 24'><circle cx='12' cy='12' r='9' fill='none' stroke='currentColor' stroke-width='2'/><path d='M3 12h18M12 3c3 3.5 3 14.5 0 18M12 3c-3 3.5-3 14.5 0 18' fill='none' stroke='currentColor' stroke-width='1.5'/></svg>";

/// Tabs of one window sharing a domain label
#[derive(Debug, Clone, PartialEq)]
pub struct DomainGroup {
    pub domain: String,
    pub tabs: Vec<TabSnapshot>,
}

impl DomainGroup {
    pub fn tab_ids(&self) -> Vec<i64> {
        self.tabs.iter().map(|tab| tab.id).collect()
    }
}

fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_lowercase)
}

/// Host name for display, or the raw URL when there is none
pub fn display_url(url: &str) -> String {
    hostname(url).unwrap_or_else(|| url.to_string())
}

/// Label used when grouping tabs by domain
pub fn domain_label(url: &str) -> String {
    if url.is_empty() || url == "about:blank" {
        return "Blank Pages".to_string();
    }
    if url.starts_with("chrome-extension://") {
        return "Extensions".to_string();
    }
    if url.starts_with("chrome://") {
        return "Chrome Pages".to_string();
    }
    hostname(url).unwrap_or_else(|| "Unknown".to_string())
}

/// Group tabs by domain label; groups sorted by label, tabs keep their order
pub fn group_by_domain(tabs: &[TabSnapshot]) -> Vec<DomainGroup> {
    let mut groups: BTreeMap<String, Vec<TabSnapshot>> = BTreeMap::new();
    for tab in tabs {
        groups.entry(domain_label(&tab.url)).or_default().push(tab.clone());
    }

    groups
        .into_iter()
        .map(|(domain, tabs)| DomainGroup { domain, tabs })
        .collect()
}

/// `"1 tab"`, `"3 windows"`, `"0 tabs"`
pub fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// `Window 2: <active title>`, or `Window 2 (5 tabs)` when the active tab
/// has no useful title
pub fn window_title(window: &WindowSnapshot, position: usize) -> String {
    match window.active_tab() {
        Some(tab) if !tab.title.is_empty() && !tab.title.contains("New Tab") => {
            format!("Window {}: {}", position + 1, tab.title)
        }
        _ => format!(
            "Window {} ({})",
            position + 1,
            count_label(window.tabs.len(), "tab")
        ),
    }
}

/// Icon to show for a tab, falling back by kind of page
pub fn favicon_url(tab: &TabSnapshot) -> String {
    let url = tab.url.as_str();
    if url.starts_with("chrome-extension://") {
        return EXTENSION_ICON.to_string();
    }
    if url.starts_with("file://") {
        return FILE_ICON.to_string();
    }
    if url.starts_with("chrome://") {
        return BROWSER_ICON.to_string();
    }
    match &tab.fav_icon_url {
        Some(icon) => icon.clone(),
        None if url.starts_with("http") => {
            let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
            format!("chrome://favicon/size/16@2x/{}", encoded)
        }
        None => GLOBE_ICON.to_string(),
    }
}

/// Keep tabs whose URL contains `query` (case-insensitive), dropping windows
/// left empty. An empty query keeps everything.
pub fn filter_by_url(windows: &[WindowSnapshot], query: &str) -> Vec<WindowSnapshot> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return windows.to_vec();
    }

    windows
        .iter()
        .filter_map(|window| {
            let tabs: Vec<TabSnapshot> = window
                .tabs
                .iter()
                .filter(|tab| tab.url.to_lowercase().contains(&query))
                .cloned()
                .collect();
            (!tabs.is_empty()).then(|| WindowSnapshot {
                tabs,
                ..window.clone()
            })
        })
        .collect()
}
