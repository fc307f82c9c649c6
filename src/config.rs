/// Runtime settings shared by the background worker and the UI pages

/// Keyboard command (see `manifest.json`) that opens the manager page
pub const OPEN_MANAGER_COMMAND: &str = "open-manager";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Quiet period before a coalesced `state-changed` push goes out
    pub debounce_ms: u32,
    /// Longest accepted `action` name, in characters
    pub max_action_len: usize,
    /// Extension-relative path of the full-page manager
    pub manager_page: &'static str,
    /// How long a toast stays up in the manager
    pub toast_ms: u32,
    pub log_level: log::Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debounce_ms: 300,
            max_action_len: 100,
            manager_page: "manager.html",
            toast_ms: 3000,
            log_level: log::Level::Info,
        }
    }
}
