/// Toolbar popup: every window at a glance, with focus and close shortcuts
use log::{debug, error};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::commands::open_manager;
use crate::config::Config;
use crate::domain::window_title;
use crate::host::ChromeHost;
use crate::protocol::Action;
use crate::snapshot::{TabId, WindowId, WindowSnapshot, total_tabs};
use crate::ui::client::{self, PushSubscription};
use crate::ui::components::{Notice, NoticeBanner, Stats, TabRow};
use crate::timer::BrowserTimers;
use crate::ui::session::{LoadState, NoticeTimer};

#[function_component(Popup)]
pub fn popup() -> Html {
    let state = use_state(|| LoadState::Loading);
    let windows = use_state(Vec::<WindowSnapshot>::new);
    let notice = use_state(|| None::<Notice>);
    let notice_timer = use_mut_ref(|| NoticeTimer::new(BrowserTimers));

    let reload = {
        let state = state.clone();
        let windows = windows.clone();

        Callback::from(move |_: ()| {
            let state = state.clone();
            let windows = windows.clone();

            state.set(LoadState::Loading);

            spawn_local(async move {
                match client::list_all().await {
                    Ok(snapshot) => {
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

    // Load on mount and again on every push from the background
    {
        let reload = reload.clone();
        use_effect_with((), move |_| {
            reload.emit(());
            let subscription = PushSubscription::new(move |push| {
                debug!("Popup refreshing after {:?}", push);
                reload.emit(());
            });
            move || drop(subscription)
        });
    }

    let show_notice = {
        let notice = notice.clone();
        let notice_timer = notice_timer.clone();
        let toast_ms = Config::default().toast_ms;

        Callback::from(move |next: Notice| {
            notice.set(Some(next));
            let notice = notice.clone();
            notice_timer
                .borrow_mut()
                .arm(toast_ms, Box::new(move || notice.set(None)));
        })
    };

    // Focus requests close the popup once they land
    let run_focus = {
        let show_notice = show_notice.clone();
        move |action: Action, failure: &'static str| {
            let show_notice = show_notice.clone();
            spawn_local(async move {
                match client::perform(action).await {
                    Ok(()) => client::close_surface(),
                    Err(e) => {
                        error!("{}: {}", failure, e);
                        show_notice.emit(Notice::error(failure));
                    }
                }
            });
        }
    };

    let run_close = {
        let show_notice = show_notice.clone();
        let reload = reload.clone();
        move |action: Action, failure: &'static str| {
            let show_notice = show_notice.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match client::perform(action).await {
                    Ok(()) => reload.emit(()),
                    Err(e) => {
                        error!("{}: {}", failure, e);
                        show_notice.emit(Notice::error(failure));
                    }
                }
            });
        }
    };

    let on_focus_tab = {
        let run_focus = run_focus.clone();
        Callback::from(move |tab_id: TabId| run_focus(Action::FocusTab { tab_id }, "Failed to focus tab"))
    };

    let on_close_tab = {
        let run_close = run_close.clone();
        Callback::from(move |tab_id: TabId| run_close(Action::CloseTab { tab_id }, "Failed to close tab"))
    };

    let on_focus_window = {
        let run_focus = run_focus.clone();
        Callback::from(move |window_id: WindowId| {
            run_focus(Action::FocusWindow { window_id }, "Failed to focus window")
        })
    };

    let on_close_window = {
        let run_close = run_close.clone();
        Callback::from(move |window_id: WindowId| {
            run_close(Action::CloseWindow { window_id }, "Failed to close window")
        })
    };

    let on_open_manager = {
        let show_notice = show_notice.clone();
        Callback::from(move |_| {
            let show_notice = show_notice.clone();
            spawn_local(async move {
                let manager_url = client::page_url(Config::default().manager_page);
                match open_manager(&ChromeHost, &manager_url).await {
                    Ok(_) => client::close_surface(),
                    Err(e) => {
                        error!("Failed to open manager page: {}", e);
                        show_notice.emit(Notice::error("Failed to open manager"));
                    }
                }
            });
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        let notice_timer = notice_timer.clone();
        Callback::from(move |_: ()| {
            notice_timer.borrow_mut().disarm();
            notice.set(None);
        })
    };

    html! {
        <div class="popup">
            <header class="popup-header">
                <h1 class="popup-title">{"Window & Tab Manager"}</h1>
                <Stats windows={windows.len()} tabs={total_tabs(&windows)} />
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
                        <Button onclick={reload.reform(|_| ())} variant={ButtonVariant::Secondary} block={true}>
                            {"Retry"}
                        </Button>
                    </div>
                },
                LoadState::Content if windows.is_empty() => html! {
                    <p class="no-windows">{"No windows found"}</p>
                },
                LoadState::Content => html! {
                    <div class="windows-list">
                        {for windows.iter().enumerate().map(|(position, window)| {
                            let window_id = window.id;
                            let mut class = classes!("window-item");
                            if window.focused {
                                class.push("window-focused");
                            }
                            html! {
                                <div class={class} key={window_id}>
                                    <div class="window-header">
                                        <span class="window-title">{window_title(window, position)}</span>
                                        <div class="window-actions">
                                            <Button
                                                size={ButtonSize::Small}
                                                variant={ButtonVariant::Secondary}
                                                onclick={on_focus_window.reform(move |_| window_id)}
                                            >
                                                {"Focus"}
                                            </Button>
                                            <Button
                                                size={ButtonSize::Small}
                                                variant={ButtonVariant::Danger}
                                                onclick={on_close_window.reform(move |_| window_id)}
                                            >
                                                {"Close"}
                                            </Button>
                                        </div>
                                    </div>
                                    <div class="tabs-list">
                                        {for window.tabs.iter().map(|tab| html! {
                                            <TabRow
                                                key={tab.id}
                                                tab={tab.clone()}
                                                on_focus={on_focus_tab.clone()}
                                                on_close={on_close_tab.clone()}
                                            />
                                        })}
                                    </div>
                                </div>
                            }
                        })}
                    </div>
                },
            }}

            if let Some(notice) = (*notice).clone() {
                <NoticeBanner notice={notice} on_dismiss={on_dismiss} />
            }

            <footer class="footer-popup">
                <Button onclick={on_open_manager} variant={ButtonVariant::Primary} block={true}>
                    {"Open Full Manager"}
                </Button>
            </footer>
        </div>
    }
}
