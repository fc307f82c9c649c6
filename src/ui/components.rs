/// Reusable UI components
use log::debug;
use web_sys::{DataTransfer, DragEvent, HtmlInputElement};
use yew::prelude::*;

use crate::domain::{count_label, display_url, favicon_url};
use crate::js::error_message;
use crate::snapshot::{TabId, TabSnapshot, WindowId};

#[derive(PartialEq, Clone, Copy)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown at the bottom of the manager
#[derive(PartialEq, Clone)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
            kind: NoticeKind::Error,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub notice: Notice,
    pub on_dismiss: Callback<()>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let (class, icon) = match props.notice.kind {
        NoticeKind::Success => ("toast success", "✅"),
        NoticeKind::Error => ("toast error", "❌"),
    };

    html! {
        <div class={class} role="status">
            <span class="toast-icon">{icon}</span>
            <span class="toast-message">{&props.notice.message}</span>
            <button class="toast-close" onclick={props.on_dismiss.reform(|_| ())}>{"✕"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    pub title: AttrValue,
    pub message: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    html! {
        <div class="modal-backdrop">
            <div class="modal" role="dialog">
                <h3 class="modal-title">{&props.title}</h3>
                <p class="modal-message">{&props.message}</p>
                <div class="modal-actions">
                    <button class="modal-btn" onclick={props.on_cancel.reform(|_| ())}>{"Cancel"}</button>
                    <button class="modal-btn danger" onclick={props.on_confirm.reform(|_| ())}>{"Close"}</button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatsProps {
    pub windows: usize,
    pub tabs: usize,
}

#[function_component(Stats)]
pub fn stats(props: &StatsProps) -> Html {
    html! {
        <div class="stats">
            <span class="window-count">{count_label(props.windows, "window")}</span>
            <span class="tab-count">{count_label(props.tabs, "tab")}</span>
        </div>
    }
}

/// Mark a drag as a move. Firefox will not start a drag without data.
pub fn start_tab_drag(transfer: &DataTransfer) {
    transfer.set_effect_allowed("move");
    if let Err(e) = transfer.set_data("text/plain", "") {
        debug!("Failed to set drag data: {}", error_message(&e));
    }
}

#[derive(Properties, PartialEq)]
pub struct TabRowProps {
    pub tab: TabSnapshot,
    pub on_focus: Callback<TabId>,
    pub on_close: Callback<TabId>,
    /// The selection checkbox is only shown when set
    #[prop_or_default]
    pub on_select: Option<Callback<(TabId, bool)>>,
    #[prop_or(false)]
    pub selected: bool,
    #[prop_or_default]
    pub on_drag_start: Option<Callback<(TabId, WindowId)>>,
    #[prop_or_default]
    pub on_drag_end: Option<Callback<()>>,
}

#[function_component(TabRow)]
pub fn tab_row(props: &TabRowProps) -> Html {
    let tab = &props.tab;
    let tab_id = tab.id;
    let window_id = tab.window_id;

    let mut class = classes!("tab-item");
    if tab.active {
        class.push("active");
    }
    if tab.pinned {
        class.push("pinned");
    }
    if props.selected {
        class.push("selected");
    }

    let on_row_click = props.on_focus.reform(move |_: MouseEvent| tab_id);
    let on_focus_click = {
        let on_focus = props.on_focus.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_focus.emit(tab_id);
        })
    };
    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(tab_id);
        })
    };

    let checkbox = props.on_select.as_ref().map(|on_select| {
        let on_select = on_select.clone();
        let on_change = Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_select.emit((tab_id, input.checked()));
            }
        });
        html! {
            <input
                type="checkbox"
                class="tab-checkbox"
                checked={props.selected}
                onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}
                onchange={on_change}
            />
        }
    });

    let draggable = props.on_drag_start.is_some();
    let on_drag_start = props.on_drag_start.clone().map(|on_drag_start| {
        Callback::from(move |e: DragEvent| {
            if let Some(transfer) = e.data_transfer() {
                start_tab_drag(&transfer);
            }
            on_drag_start.emit((tab_id, window_id));
        })
    });
    let on_drag_end = props
        .on_drag_end
        .clone()
        .map(|on_drag_end| on_drag_end.reform(|_: DragEvent| ()));

    let title = if tab.title.is_empty() { "Untitled" } else { tab.title.as_str() };

    html! {
        <div
            class={class}
            draggable={if draggable { "true" } else { "false" }}
            onclick={on_row_click}
            ondragstart={on_drag_start}
            ondragend={on_drag_end}
        >
            {for checkbox}
            <img class="tab-favicon" src={favicon_url(tab)} alt="" />
            <div class="tab-info">
                <div class="tab-title">{title}</div>
                <div class="tab-url">{display_url(&tab.url)}</div>
            </div>
            <div class="tab-indicators">
                if tab.audible {
                    <span class="tab-indicator tab-audible" title="Playing audio">{"🔊"}</span>
                }
                if tab.is_muted() {
                    <span class="tab-indicator tab-muted" title="Muted">{"🔇"}</span>
                }
                if tab.pinned {
                    <span class="tab-indicator tab-pinned" title="Pinned">{"📌"}</span>
                }
            </div>
            <div class="tab-actions">
                <button class="tab-btn focus-tab-btn" title="Focus Tab" onclick={on_focus_click}>{"👁"}</button>
                <button class="tab-btn close-tab-btn" title="Close Tab" onclick={on_close_click}>{"✕"}</button>
            </div>
        </div>
    }
}
