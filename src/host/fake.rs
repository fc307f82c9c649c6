//! In-memory `BrowserHost` following Chrome's window/tab semantics

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use super::{APPEND_INDEX, BrowserHost, CreateWindow, HostTab, HostWindow};
use crate::error::HostError;
use crate::snapshot::{TabId, WindowId};

#[derive(Default)]
struct State {
    windows: Vec<HostWindow>,
    next_window_id: WindowId,
    next_tab_id: TabId,
    calls: Vec<String>,
    failing: Vec<&'static str>,
}

impl State {
    fn record(&mut self, call: String, method: &'static str) -> Result<(), HostError> {
        self.calls.push(call);
        if self.failing.contains(&method) {
            return Err(HostError::new(format!("{} failed", method)));
        }
        Ok(())
    }

    fn window_mut(&mut self, window_id: WindowId) -> Result<&mut HostWindow, HostError> {
        self.windows
            .iter_mut()
            .find(|window| window.id == window_id)
            .ok_or_else(|| HostError::new(format!("No window with id: {}.", window_id)))
    }

    fn locate(&self, tab_id: TabId) -> Result<(usize, usize), HostError> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(w, window)| {
                window
                    .tabs
                    .as_ref()?
                    .iter()
                    .position(|tab| tab.id == tab_id)
                    .map(|t| (w, t))
            })
            .ok_or_else(|| HostError::new(format!("No tab with id: {}.", tab_id)))
    }

    fn new_tab(&mut self, window_id: WindowId, url: &str) -> HostTab {
        self.next_tab_id += 1;
        HostTab {
            id: self.next_tab_id,
            window_id,
            index: 0,
            url: Some(url.to_string()),
            title: Some(url.to_string()),
            fav_icon_url: None,
            active: false,
            pinned: false,
            audible: Some(false),
            muted_info: None,
            status: Some("complete".to_string()),
            incognito: false,
            highlighted: false,
            discarded: false,
        }
    }

    fn new_window(&mut self) -> WindowId {
        self.next_window_id += 1;
        let window = HostWindow {
            tabs: Some(Vec::new()),
            ..HostWindow::normal(self.next_window_id)
        };
        self.windows.push(window);
        self.next_window_id
    }

    /// Chrome closes a window once its last tab leaves, and keeps
    /// `index`/`windowId` in step with tab order
    fn settle(&mut self) {
        self.windows
            .retain(|window| window.tabs.as_ref().is_some_and(|tabs| !tabs.is_empty()));
        for window in &mut self.windows {
            let window_id = window.id;
            for (index, tab) in window.tabs.iter_mut().flatten().enumerate() {
                tab.index = index as i64;
                tab.window_id = window_id;
            }
        }
    }

    fn take_tab(&mut self, tab_id: TabId) -> Result<HostTab, HostError> {
        let (w, t) = self.locate(tab_id)?;
        let tabs = self.windows[w].tabs.get_or_insert_with(Vec::new);
        Ok(tabs.remove(t))
    }

    fn insert_tab(&mut self, window_id: WindowId, mut tab: HostTab, index: i64) -> Result<(), HostError> {
        let window = self.window_mut(window_id)?;
        let tabs = window.tabs.get_or_insert_with(Vec::new);
        tab.window_id = window_id;
        if index == APPEND_INDEX || index as usize >= tabs.len() {
            tabs.push(tab);
        } else {
            tabs.insert(index as usize, tab);
        }
        Ok(())
    }

    fn focus(&mut self, window_id: WindowId) -> Result<(), HostError> {
        self.window_mut(window_id)?;
        for window in &mut self.windows {
            window.focused = window.id == window_id;
        }
        Ok(())
    }

    fn activate(&mut self, tab_id: TabId) -> Result<(), HostError> {
        let (w, t) = self.locate(tab_id)?;
        for (index, tab) in self.windows[w].tabs.iter_mut().flatten().enumerate() {
            tab.active = index == t;
        }
        Ok(())
    }
}

/// Shared handle; clones observe the same browser
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Rc<RefCell<State>>,
}

impl FakeHost {
    pub fn new() -> Self {
        let host = FakeHost::default();
        host.state.borrow_mut().next_tab_id = 100;
        host
    }

    /// Adds a normal window holding one tab per URL; the first tab is active
    pub fn add_window(&self, urls: &[&str]) -> WindowId {
        let mut state = self.state.borrow_mut();
        let window_id = state.new_window();
        for url in urls {
            let tab = state.new_tab(window_id, url);
            let _ = state.insert_tab(window_id, tab, APPEND_INDEX);
        }
        if let Ok(window) = state.window_mut(window_id) {
            if let Some(first) = window.tabs.iter_mut().flatten().next() {
                first.active = true;
            }
        }
        state.settle();
        window_id
    }

    /// Adds a window of a type `list-all` must skip
    pub fn add_popup_window(&self, url: &str) -> WindowId {
        let window_id = self.add_window(&[url]);
        if let Ok(window) = self.state.borrow_mut().window_mut(window_id) {
            window.window_type = "popup".to_string();
        }
        window_id
    }

    pub fn tab_ids(&self, window_id: WindowId) -> Vec<TabId> {
        self.window(window_id)
            .map(|window| window.tabs.unwrap_or_default().iter().map(|tab| tab.id).collect())
            .unwrap_or_default()
    }

    pub fn window(&self, window_id: WindowId) -> Option<HostWindow> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|window| window.id == window_id)
            .cloned()
    }

    pub fn tab(&self, tab_id: TabId) -> Option<HostTab> {
        let state = self.state.borrow();
        let (w, t) = state.locate(tab_id).ok()?;
        state.windows[w].tabs.as_ref().map(|tabs| tabs[t].clone())
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|window| window.focused)
            .map(|window| window.id)
    }

    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// Every host call made so far, e.g. `remove_tab(101)`
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Makes every later call to `method` fail after being recorded
    pub fn fail_on(&self, method: &'static str) {
        self.state.borrow_mut().failing.push(method);
    }
}

#[async_trait(?Send)]
impl BrowserHost for FakeHost {
    async fn get_all_windows(&self) -> Result<Vec<HostWindow>, HostError> {
        let mut state = self.state.borrow_mut();
        state.record("get_all_windows()".to_string(), "get_all_windows")?;
        Ok(state
            .windows
            .iter()
            .filter(|window| window.window_type == "normal")
            .cloned()
            .collect())
    }

    async fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("remove_tab({})", tab_id), "remove_tab")?;
        state.take_tab(tab_id)?;
        state.settle();
        Ok(())
    }

    async fn remove_window(&self, window_id: WindowId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("remove_window({})", window_id), "remove_window")?;
        state.window_mut(window_id)?;
        state.windows.retain(|window| window.id != window_id);
        Ok(())
    }

    async fn move_tab(&self, tab_id: TabId, window_id: WindowId, index: i64) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("move_tab({}, {}, {})", tab_id, window_id, index), "move_tab")?;
        state.window_mut(window_id)?;
        let tab = state.take_tab(tab_id)?;
        state.insert_tab(window_id, tab, index)?;
        state.settle();
        Ok(())
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("focus_window({})", window_id), "focus_window")?;
        state.focus(window_id)
    }

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("activate_tab({})", tab_id), "activate_tab")?;
        state.activate(tab_id)
    }

    async fn get_tab(&self, tab_id: TabId) -> Result<HostTab, HostError> {
        self.state
            .borrow_mut()
            .record(format!("get_tab({})", tab_id), "get_tab")?;
        self.tab(tab_id)
            .ok_or_else(|| HostError::new(format!("No tab with id: {}.", tab_id)))
    }

    async fn query_tabs_by_url(&self, url: &str) -> Result<Vec<HostTab>, HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("query_tabs_by_url({})", url), "query_tabs_by_url")?;
        Ok(state
            .windows
            .iter()
            .flat_map(|window| window.tabs.iter().flatten())
            .filter(|tab| tab.url.as_deref() == Some(url))
            .cloned()
            .collect())
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<HostTab, HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("create_tab({}, {})", url, active), "create_tab")?;
        let focused = state.windows.iter().find(|window| window.focused).map(|window| window.id);
        let window_id = match focused {
            Some(window_id) => window_id,
            None => state.new_window(),
        };
        let tab = state.new_tab(window_id, url);
        let tab_id = tab.id;
        state.insert_tab(window_id, tab, APPEND_INDEX)?;
        if active {
            state.activate(tab_id)?;
        }
        state.settle();
        drop(state);
        self.tab(tab_id)
            .ok_or_else(|| HostError::new(format!("No tab with id: {}.", tab_id)))
    }

    async fn create_window(&self, options: CreateWindow) -> Result<HostWindow, HostError> {
        let mut state = self.state.borrow_mut();
        state.record(format!("create_window({:?})", options.tab_id), "create_window")?;
        if let Some(tab_id) = options.tab_id {
            state.locate(tab_id)?;
        }
        let window_id = state.new_window();
        let tab = match options.tab_id {
            Some(tab_id) => state.take_tab(tab_id)?,
            None => {
                let url = options.url.as_deref().unwrap_or("chrome://newtab/");
                state.new_tab(window_id, url)
            }
        };
        let tab_id = tab.id;
        state.insert_tab(window_id, tab, APPEND_INDEX)?;
        state.activate(tab_id)?;
        if options.focused {
            state.focus(window_id)?;
        }
        state.settle();
        state
            .windows
            .iter()
            .find(|window| window.id == window_id)
            .cloned()
            .ok_or_else(|| HostError::new(format!("No window with id: {}.", window_id)))
    }
}
