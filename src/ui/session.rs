/// Per-surface state that never leaves the page
use std::collections::BTreeSet;
use std::rc::Rc;

use yew::Reducible;

use crate::domain::filter_by_url;
use crate::snapshot::{TabId, WindowId, WindowSnapshot};
use crate::timer::Scheduler;

/// Lifecycle of a surface's snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Content,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> ViewMode {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// The tab being dragged and the window it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub tab_id: TabId,
    pub window_id: WindowId,
}

/// View settings, selection and drag state of one manager page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerSession {
    pub view_mode: ViewMode,
    pub compact: bool,
    pub group_by_domain: bool,
    pub selected: BTreeSet<TabId>,
    pub drag: Option<DragPayload>,
    pub filter: String,
}

/// Changes a manager page makes to its session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    ToggleViewMode,
    ToggleCompact,
    ToggleGrouping,
    Select(TabId, bool),
    ClearSelection,
    /// Tab ids present in the latest snapshot
    Prune(Vec<TabId>),
    BeginDrag(TabId, WindowId),
    EndDrag,
    SetFilter(String),
}

impl Reducible for ManagerSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: SessionAction) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

impl ManagerSession {
    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::ToggleViewMode => self.view_mode = self.view_mode.toggled(),
            SessionAction::ToggleCompact => self.compact = !self.compact,
            SessionAction::ToggleGrouping => self.group_by_domain = !self.group_by_domain,
            SessionAction::Select(tab_id, selected) => self.set_selected(tab_id, selected),
            SessionAction::ClearSelection => self.selected.clear(),
            SessionAction::Prune(live) => self.selected.retain(|tab_id| live.contains(tab_id)),
            SessionAction::BeginDrag(tab_id, window_id) => self.begin_drag(tab_id, window_id),
            SessionAction::EndDrag => {
                self.end_drag();
            }
            SessionAction::SetFilter(filter) => self.filter = filter,
        }
    }

    pub fn set_selected(&mut self, tab_id: TabId, selected: bool) {
        if selected {
            self.selected.insert(tab_id);
        } else {
            self.selected.remove(&tab_id);
        }
    }

    pub fn is_selected(&self, tab_id: TabId) -> bool {
        self.selected.contains(&tab_id)
    }

    pub fn selection(&self) -> Vec<TabId> {
        self.selected.iter().copied().collect()
    }

    pub fn begin_drag(&mut self, tab_id: TabId, window_id: WindowId) {
        self.drag = Some(DragPayload { tab_id, window_id });
    }

    pub fn end_drag(&mut self) -> Option<DragPayload> {
        self.drag.take()
    }

    /// The dragged tab, if dropping it on `window_id` would move it
    pub fn drop_target(&self, window_id: WindowId) -> Option<TabId> {
        self.drag
            .filter(|drag| drag.window_id != window_id)
            .map(|drag| drag.tab_id)
    }

    pub fn container_class(&self) -> String {
        let mut classes = vec!["windows-container"];
        classes.push(match self.view_mode {
            ViewMode::Grid => "grid-view",
            ViewMode::List => "list-view",
        });
        if self.compact {
            classes.push("compact-view");
        }
        classes.join(" ")
    }

    /// Windows left after the URL filter, each with its position in the
    /// unfiltered list so numbering survives a search
    pub fn visible_windows(&self, windows: &[WindowSnapshot]) -> Vec<(usize, WindowSnapshot)> {
        windows
            .iter()
            .enumerate()
            .filter_map(|(position, window)| {
                filter_by_url(std::slice::from_ref(window), &self.filter)
                    .pop()
                    .map(|window| (position, window))
            })
            .collect()
    }
}

/// Auto-dismiss timer for the single notice a surface shows at a time
pub struct NoticeTimer<S: Scheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
}

impl<S: Scheduler> NoticeTimer<S> {
    pub fn new(scheduler: S) -> Self {
        NoticeTimer {
            scheduler,
            pending: None,
        }
    }

    /// Run `dismiss` after `delay_ms`, cancelling the previous notice's timer
    pub fn arm(&mut self, delay_ms: u32, dismiss: Box<dyn FnOnce()>) {
        self.disarm();
        self.pending = Some(self.scheduler.schedule(delay_ms, dismiss));
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}
