/// Full-page manager: every window as a card, with selection, grouping and
/// drag and drop between windows
use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use crate::config::Config;
use crate::domain::{count_label, group_by_domain, window_title};
use crate::gather::{move_tabs_to_new_window, open_blank_window};
use crate::host::ChromeHost;
use crate::protocol::Action;
use crate::snapshot::{TabId, TabSnapshot, WindowId, WindowSnapshot, total_tabs};
use crate::timer::BrowserTimers;
use crate::ui::client::{self, PushSubscription};
use crate::ui::components::{ConfirmDialog, Notice, NoticeBanner, Stats, TabRow};
use crate::ui::session::{LoadState, ManagerSession, NoticeTimer, SessionAction, ViewMode};
use crate::ui::{restore_scroll, scroll_offset};

/// Where a dragged tab is currently hovering
#[derive(Clone, Copy, PartialEq)]
enum DropHover {
    Window(WindowId),
    NewWindow,
}

#[function_component(Manager)]
pub fn manager() -> Html {
    let config = use_memo((), |_| Config::default());
    let session = use_reducer(ManagerSession::default);
    let state = use_state(|| LoadState::Loading);
    let windows = use_state(Vec::<WindowSnapshot>::new);
    let notice = use_state(|| None::<Notice>);
    let pending_close = use_state(|| None::<WindowId>);
    let hover = use_state(|| None::<DropHover>);
    let toast_timer = use_mut_ref(|| NoticeTimer::new(BrowserTimers));
    let pending_scroll: Rc<RefCell<Option<f64>>> = use_mut_ref(|| None);

    // `true` keeps the page where it is instead of flashing the spinner
    let load = {
        let state = state.clone();
        let windows = windows.clone();
        let session = session.clone();
        let pending_scroll = pending_scroll.clone();

        Callback::from(move |preserve_scroll: bool| {
            let state = state.clone();
            let windows = windows.clone();
            let session = session.clone();
            let pending_scroll = pending_scroll.clone();

            let offset = if preserve_scroll {
                Some(scroll_offset())
            } else {
                state.set(LoadState::Loading);
                None
            };

            spawn_local(async move {
                match client::list_all().await {
                    Ok(snapshot) => {
                        let live: Vec<TabId> = snapshot
                            .iter()
                            .flat_map(|window| window.tabs.iter().map(|tab| tab.id))
                            .collect();
                        session.dispatch(SessionAction::Prune(live));
                        *pending_scroll.borrow_mut() = offset.filter(|offset| *offset > 0.0);
                        windows.set(snapshot);
                        state.set(LoadState::Content);
                    }
                    Err(e) => {
                        error!("Failed to load windows: {}", e);
                        state.set(LoadState::Error(e));
                    }
                }
            });
        })
    };

    {
        let load = load.clone();
        use_effect_with((), move |_| {
            load.emit(false);
            let subscription = PushSubscription::new(move |push| {
                debug!("Manager refreshing after {:?}", push);
                load.emit(true);
            });
            move || drop(subscription)
        });
    }

    // Put the page back where it was once the new snapshot is on screen
    {
        let pending_scroll = pending_scroll.clone();
        use_effect(move || {
            if let Some(offset) = pending_scroll.borrow_mut().take() {
                restore_scroll(offset);
            }
        });
    }

    let show_notice = {
        let notice = notice.clone();
        let toast_timer = toast_timer.clone();
        let toast_ms = config.toast_ms;

        Callback::from(move |next: Notice| {
            notice.set(Some(next));
            let notice = notice.clone();
            toast_timer
                .borrow_mut()
                .arm(toast_ms, Box::new(move || notice.set(None)));
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        let toast_timer = toast_timer.clone();
        Callback::from(move |_: ()| {
            toast_timer.borrow_mut().disarm();
            notice.set(None);
        })
    };

    // Router requests: toast the outcome and refresh in place on success
    let run = {
        let load = load.clone();
        let show_notice = show_notice.clone();
        move |action: Action, success: &'static str, failure: &'static str| {
            let load = load.clone();
            let show_notice = show_notice.clone();
            spawn_local(async move {
                match client::perform(action).await {
                    Ok(()) => {
                        show_notice.emit(Notice::success(success));
                        load.emit(true);
                    }
                    Err(e) => {
                        error!("{}: {}", failure, e);
                        show_notice.emit(Notice::error(failure));
                    }
                }
            });
        }
    };

    // Moves that need a new window go straight to the browser
    let gather = {
        let load = load.clone();
        let show_notice = show_notice.clone();
        let session = session.clone();
        move |tab_ids: Vec<TabId>, success: String, failure: String, clear_selection: bool| {
            let load = load.clone();
            let show_notice = show_notice.clone();
            let session = session.clone();
            spawn_local(async move {
                match move_tabs_to_new_window(&ChromeHost, &tab_ids).await {
                    Ok(_) => {
                        if clear_selection {
                            session.dispatch(SessionAction::ClearSelection);
                        }
                        show_notice.emit(Notice::success(success));
                        load.emit(true);
                    }
                    Err(e) => {
                        error!("{}: {}", failure, e);
                        show_notice.emit(Notice::error(failure));
                    }
                }
            });
        }
    };

    let on_focus_tab = {
        let run = run.clone();
        Callback::from(move |tab_id: TabId| run(Action::FocusTab { tab_id }, "Tab focused", "Failed to focus tab"))
    };

    let on_close_tab = {
        let run = run.clone();
        Callback::from(move |tab_id: TabId| run(Action::CloseTab { tab_id }, "Tab closed", "Failed to close tab"))
    };

    let on_focus_window = {
        let run = run.clone();
        Callback::from(move |window_id: WindowId| {
            run(Action::FocusWindow { window_id }, "Window focused", "Failed to focus window")
        })
    };

    let on_confirm_close = {
        let run = run.clone();
        let pending_close = pending_close.clone();
        Callback::from(move |_: ()| {
            if let Some(window_id) = *pending_close {
                run(Action::CloseWindow { window_id }, "Window closed", "Failed to close window");
            }
            pending_close.set(None);
        })
    };

    let on_cancel_close = {
        let pending_close = pending_close.clone();
        Callback::from(move |_: ()| pending_close.set(None))
    };

    let on_new_window = {
        let load = load.clone();
        let show_notice = show_notice.clone();
        Callback::from(move |_| {
            let load = load.clone();
            let show_notice = show_notice.clone();
            spawn_local(async move {
                match open_blank_window(&ChromeHost).await {
                    Ok(_) => {
                        show_notice.emit(Notice::success("New window created"));
                        load.emit(true);
                    }
                    Err(e) => {
                        error!("Failed to create new window: {}", e);
                        show_notice.emit(Notice::error("Failed to create new window"));
                    }
                }
            });
        })
    };

    let on_send_selected = {
        let gather = gather.clone();
        let session = session.clone();
        let show_notice = show_notice.clone();
        Callback::from(move |_| {
            let tab_ids = session.selection();
            if tab_ids.is_empty() {
                show_notice.emit(Notice::error("No tabs selected"));
                return;
            }
            let success = format!("Moved {} to new window", count_label(tab_ids.len(), "tab"));
            gather(tab_ids, success, "Failed to move tabs to new window".to_string(), true);
        })
    };

    let on_move_domain = {
        let gather = gather.clone();
        Callback::from(move |(domain, tab_ids): (String, Vec<TabId>)| {
            if tab_ids.is_empty() {
                return;
            }
            let noun = if tab_ids.len() == 1 { "tab" } else { "tabs" };
            let success = format!("Moved {} {} {} to new window", tab_ids.len(), domain, noun);
            gather(tab_ids, success, format!("Failed to move {} tabs", domain), false);
        })
    };

    let on_select = {
        let session = session.clone();
        Callback::from(move |(tab_id, selected): (TabId, bool)| {
            session.dispatch(SessionAction::Select(tab_id, selected))
        })
    };

    let on_drag_start = {
        let session = session.clone();
        Callback::from(move |(tab_id, window_id): (TabId, WindowId)| {
            session.dispatch(SessionAction::BeginDrag(tab_id, window_id))
        })
    };

    let on_drag_end = {
        let session = session.clone();
        let hover = hover.clone();
        Callback::from(move |_: ()| {
            session.dispatch(SessionAction::EndDrag);
            hover.set(None);
        })
    };

    let on_search = {
        let session = session.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                session.dispatch(SessionAction::SetFilter(input.value()));
            }
        })
    };

    let on_toggle_view = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::ToggleViewMode))
    };

    let on_toggle_compact = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::ToggleCompact))
    };

    let on_toggle_grouping = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::ToggleGrouping))
    };

    let on_refresh = load.reform(|_: MouseEvent| false);

    // Drop zone for "new window"
    let drop_zone = session.drag.map(|drag| {
        let on_drag_over = {
            let hover = hover.clone();
            Callback::from(move |e: DragEvent| {
                e.prevent_default();
                hover.set(Some(DropHover::NewWindow));
            })
        };
        let on_drag_leave = {
            let hover = hover.clone();
            Callback::from(move |_: DragEvent| hover.set(None))
        };
        let on_drop = {
            let gather = gather.clone();
            let hover = hover.clone();
            Callback::from(move |e: DragEvent| {
                e.prevent_default();
                hover.set(None);
                gather(
                    vec![drag.tab_id],
                    "New window created".to_string(),
                    "Failed to create new window".to_string(),
                    false,
                );
            })
        };

        let mut class = classes!("drop-zone");
        if *hover == Some(DropHover::NewWindow) {
            class.push("drag-over");
        }
        html! {
            <div class={class} ondragover={on_drag_over} ondragleave={on_drag_leave} ondrop={on_drop}>
                {"Drop here to open in a new window"}
            </div>
        }
    });

    let tab_row = |tab: &TabSnapshot| {
        html! {
            <TabRow
                key={tab.id}
                tab={tab.clone()}
                on_focus={on_focus_tab.clone()}
                on_close={on_close_tab.clone()}
                on_select={Some(on_select.clone())}
                selected={session.is_selected(tab.id)}
                on_drag_start={Some(on_drag_start.clone())}
                on_drag_end={Some(on_drag_end.clone())}
            />
        }
    };

    let window_card = |position: usize, window: &WindowSnapshot| {
        let window_id = window.id;

        let on_drag_over = {
            let hover = hover.clone();
            let accepts = session.drop_target(window_id).is_some();
            Callback::from(move |e: DragEvent| {
                if accepts {
                    e.prevent_default();
                    hover.set(Some(DropHover::Window(window_id)));
                }
            })
        };
        let on_drag_leave = {
            let hover = hover.clone();
            Callback::from(move |_: DragEvent| hover.set(None))
        };
        let on_drop = {
            let run = run.clone();
            let hover = hover.clone();
            let target = session.drop_target(window_id);
            Callback::from(move |e: DragEvent| {
                e.prevent_default();
                hover.set(None);
                if let Some(tab_id) = target {
                    run(
                        Action::MoveTab { tab_id, window_id, index: None },
                        "Tab moved",
                        "Failed to move tab",
                    );
                }
            })
        };
        let on_close = {
            let pending_close = pending_close.clone();
            Callback::from(move |_| pending_close.set(Some(window_id)))
        };

        let mut class = classes!("window-card");
        if window.focused {
            class.push("window-focused");
        }
        if *hover == Some(DropHover::Window(window_id)) {
            class.push("drag-over");
        }

        let body = if session.group_by_domain {
            html! {
                <>{for group_by_domain(&window.tabs).into_iter().map(|group| {
                    let label = format!("{} ({})", group.domain, count_label(group.tabs.len(), "tab"));
                    let payload = (group.domain.clone(), group.tab_ids());
                    html! {
                        <div class="domain-group" key={group.domain.clone()}>
                            <div class="domain-header">
                                <span class="domain-name">{label}</span>
                                <Button
                                    size={ButtonSize::Small}
                                    variant={ButtonVariant::Secondary}
                                    onclick={on_move_domain.reform(move |_| payload.clone())}
                                >
                                    {"Move to new window"}
                                </Button>
                            </div>
                            {for group.tabs.iter().map(|tab| tab_row(tab))}
                        </div>
                    }
                })}</>
            }
        } else {
            html! { <>{for window.tabs.iter().map(|tab| tab_row(tab))}</> }
        };

        html! {
            <div
                class={class}
                key={window_id}
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
            >
                <div class="window-header">
                    <span class="window-title">{window_title(window, position)}</span>
                    <span class="window-tab-count">{count_label(window.tabs.len(), "tab")}</span>
                    <div class="window-actions">
                        <Button
                            size={ButtonSize::Small}
                            variant={ButtonVariant::Secondary}
                            onclick={on_focus_window.reform(move |_| window_id)}
                        >
                            {"Focus"}
                        </Button>
                        <Button size={ButtonSize::Small} variant={ButtonVariant::Danger} onclick={on_close}>
                            {"Close"}
                        </Button>
                    </div>
                </div>
                <div class="tabs-list">
                    {body}
                </div>
            </div>
        }
    };

    let confirm = pending_close.map(|window_id| {
        let tabs = windows
            .iter()
            .find(|window| window.id == window_id)
            .map(|window| window.tabs.len())
            .unwrap_or(0);
        let message = format!(
            "Are you sure you want to close this window? {} will be closed.",
            count_label(tabs, "tab")
        );
        html! {
            <ConfirmDialog
                title="Close Window"
                message={message}
                on_confirm={on_confirm_close.clone()}
                on_cancel={on_cancel_close.clone()}
            />
        }
    });

    let view_label = match session.view_mode {
        ViewMode::Grid => "List View",
        ViewMode::List => "Grid View",
    };
    let compact_label = if session.compact { "Normal View" } else { "Compact View" };
    let grouping_label = if session.group_by_domain { "Ungroup" } else { "Group by Domain" };
    let visible = session.visible_windows(&windows);

    html! {
        <div class="manager">
            <header class="manager-header">
                <h1 class="manager-title">{"Window & Tab Manager"}</h1>
                <Stats windows={windows.len()} tabs={total_tabs(&windows)} />
                <div class="header-actions">
                    <input
                        type="search"
                        class="search-bar"
                        placeholder="Search tabs by URL..."
                        value={session.filter.clone()}
                        oninput={on_search}
                    />
                    <Button onclick={on_refresh} variant={ButtonVariant::Secondary}>{"Refresh"}</Button>
                    <Button onclick={on_new_window} variant={ButtonVariant::Secondary}>{"New Window"}</Button>
                    <Button onclick={on_toggle_view} variant={ButtonVariant::Secondary}>{view_label}</Button>
                    <Button onclick={on_toggle_compact} variant={ButtonVariant::Secondary}>{compact_label}</Button>
                    <Button onclick={on_toggle_grouping} variant={ButtonVariant::Secondary}>{grouping_label}</Button>
                    if !session.selected.is_empty() {
                        <Button onclick={on_send_selected} variant={ButtonVariant::Primary}>
                            {format!("Send {} to New Window", count_label(session.selected.len(), "tab"))}
                        </Button>
                    }
                </div>
            </header>

            {match &*state {
                LoadState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading windows..."}</p>
                    </div>
                },
                LoadState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Failed to load windows"} inline={true}>
                            {err.clone()}
                        </Alert>
                        <Button onclick={load.reform(|_: MouseEvent| false)} variant={ButtonVariant::Secondary}>
                            {"Retry"}
                        </Button>
                    </div>
                },
                LoadState::Content if visible.is_empty() => html! {
                    <p class="no-windows">
                        {if session.filter.trim().is_empty() { "No windows found" } else { "No tabs match your search" }}
                    </p>
                },
                LoadState::Content => html! {
                    <div class={session.container_class()}>
                        {for visible.iter().map(|(position, window)| window_card(*position, window))}
                    </div>
                },
            }}

            {for drop_zone}
            {for confirm}

            if let Some(notice) = (*notice).clone() {
                <NoticeBanner notice={notice} on_dismiss={on_dismiss} />
            }
        </div>
    }
}
