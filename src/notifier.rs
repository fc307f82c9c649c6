//! Turns browser lifecycle events into pushes for the UI surfaces
//!
//! Create/remove storms (session restore, closing a window full of tabs) are
//! coalesced into a single `state-changed` push once things go quiet. Moves,
//! attaches and detaches are pushed as they happen since they carry the new
//! position the UI needs right away.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use crate::config::Config;
use crate::protocol::{AttachInfo, DetachInfo, ImmediateData, ImmediateKind, MoveInfo, Push};
use crate::snapshot::TabId;
use crate::timer::Scheduler;

/// Fields of `chrome.tabs.onUpdated`'s `changeInfo` that matter here
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TabChangeInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A window/tab lifecycle event, as forwarded by the background bridge
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HostEvent {
    WindowCreated,
    WindowRemoved,
    TabCreated,
    TabRemoved,
    TabUpdated {
        #[serde(rename = "changeInfo", default)]
        change_info: TabChangeInfo,
    },
    TabMoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "moveInfo")]
        move_info: MoveInfo,
    },
    TabAttached {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "attachInfo")]
        attach_info: AttachInfo,
    },
    TabDetached {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "detachInfo")]
        detach_info: DetachInfo,
    },
}

/// How an event reaches the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Debounced,
    Immediate(Push),
    Ignored,
}

impl HostEvent {
    pub fn delivery(self) -> Delivery {
        match self {
            HostEvent::WindowCreated
            | HostEvent::WindowRemoved
            | HostEvent::TabCreated
            | HostEvent::TabRemoved => Delivery::Debounced,
            HostEvent::TabUpdated { change_info } => {
                let changed = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
                if changed(&change_info.url) || changed(&change_info.title) {
                    Delivery::Debounced
                } else {
                    Delivery::Ignored
                }
            }
            HostEvent::TabMoved { tab_id, move_info } => Delivery::Immediate(Push::StateChangedImmediate {
                event_type: ImmediateKind::TabMoved,
                data: ImmediateData::Moved { tab_id, move_info },
            }),
            HostEvent::TabAttached { tab_id, attach_info } => {
                Delivery::Immediate(Push::StateChangedImmediate {
                    event_type: ImmediateKind::TabAttached,
                    data: ImmediateData::Attached { tab_id, attach_info },
                })
            }
            HostEvent::TabDetached { tab_id, detach_info } => {
                Delivery::Immediate(Push::StateChangedImmediate {
                    event_type: ImmediateKind::TabDetached,
                    data: ImmediateData::Detached { tab_id, detach_info },
                })
            }
        }
    }
}

/// Where pushes go. Delivery is fire-and-forget: nobody listening is fine.
pub trait PushSink {
    fn push(&self, push: Push);
}

pub struct ChangeNotifier<S: Scheduler, P> {
    scheduler: S,
    sink: Rc<P>,
    delay_ms: u32,
    /// The one pending debounced push, if any
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler, P: PushSink + 'static> ChangeNotifier<S, P> {
    pub fn new(scheduler: S, sink: P, config: &Config) -> Self {
        ChangeNotifier {
            scheduler,
            sink: Rc::new(sink),
            delay_ms: config.debounce_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn observe(&self, event: HostEvent) {
        match event.delivery() {
            Delivery::Debounced => self.schedule_refresh(),
            Delivery::Immediate(push) => {
                debug!("Pushing {:?}", push);
                self.sink.push(push);
            }
            Delivery::Ignored => {}
        }
    }

    /// (Re)start the quiet-period timer, replacing any pending one
    pub fn schedule_refresh(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.scheduler.cancel(handle);
        }

        let sink = self.sink.clone();
        let handle = self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                debug!("Pushing state-changed");
                sink.push(Push::StateChanged);
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::manual::ManualScheduler;

    #[derive(Clone, Default)]
    struct RecordingSink {
        pushes: Rc<RefCell<Vec<Push>>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.pushes.borrow().len()
        }
    }

    impl PushSink for RecordingSink {
        fn push(&self, push: Push) {
            self.pushes.borrow_mut().push(push);
        }
    }

    fn notifier() -> (ChangeNotifier<ManualScheduler, RecordingSink>, ManualScheduler, RecordingSink) {
        let scheduler = ManualScheduler::new();
        let sink = RecordingSink::default();
        let notifier = ChangeNotifier::new(scheduler.clone(), sink.clone(), &Config::default());
        (notifier, scheduler, sink)
    }

    fn moved(tab_id: TabId) -> HostEvent {
        HostEvent::TabMoved {
            tab_id,
            move_info: MoveInfo {
                window_id: 1,
                from_index: 0,
                to_index: 3,
            },
        }
    }

    #[test]
    fn test_burst_coalesces_into_one_push() {
        let (notifier, scheduler, sink) = notifier();

        for event in [
            HostEvent::WindowCreated,
            HostEvent::TabCreated,
            HostEvent::TabCreated,
            HostEvent::TabRemoved,
            HostEvent::WindowRemoved,
        ] {
            notifier.observe(event);
            scheduler.advance(299);
        }
        assert_eq!(sink.count(), 0);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(1);
        assert_eq!(*sink.pushes.borrow(), vec![Push::StateChanged]);

        scheduler.advance(10_000);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_spaced_events_push_each_time() {
        let (notifier, scheduler, sink) = notifier();

        for _ in 0..3 {
            notifier.observe(HostEvent::TabCreated);
            scheduler.advance(300);
        }

        assert_eq!(sink.count(), 3);
        assert!(sink.pushes.borrow().iter().all(|push| *push == Push::StateChanged));
    }

    #[test]
    fn test_tab_updates_only_count_for_url_or_title() {
        let (notifier, scheduler, sink) = notifier();

        notifier.observe(HostEvent::TabUpdated {
            change_info: TabChangeInfo {
                status: Some("loading".to_string()),
                ..TabChangeInfo::default()
            },
        });
        notifier.observe(HostEvent::TabUpdated {
            change_info: TabChangeInfo {
                title: Some(String::new()),
                ..TabChangeInfo::default()
            },
        });
        scheduler.advance(1_000);
        assert_eq!(sink.count(), 0);

        notifier.observe(HostEvent::TabUpdated {
            change_info: TabChangeInfo {
                title: Some("Inbox (3)".to_string()),
                ..TabChangeInfo::default()
            },
        });
        scheduler.advance(300);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_immediate_events_bypass_debounce() {
        let (notifier, scheduler, sink) = notifier();

        notifier.observe(moved(5));
        notifier.observe(moved(5));
        notifier.observe(HostEvent::TabDetached {
            tab_id: 6,
            detach_info: DetachInfo {
                old_window_id: 1,
                old_position: 2,
            },
        });
        notifier.observe(HostEvent::TabAttached {
            tab_id: 6,
            attach_info: AttachInfo {
                new_window_id: 2,
                new_position: 0,
            },
        });

        assert_eq!(sink.count(), 4);
        assert_eq!(scheduler.pending(), 0);

        let kinds: Vec<ImmediateKind> = sink
            .pushes
            .borrow()
            .iter()
            .filter_map(|push| match push {
                Push::StateChangedImmediate { event_type, .. } => Some(*event_type),
                Push::StateChanged => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ImmediateKind::TabMoved,
                ImmediateKind::TabMoved,
                ImmediateKind::TabDetached,
                ImmediateKind::TabAttached
            ]
        );
    }

    #[test]
    fn test_immediate_events_leave_pending_refresh_alone() {
        let (notifier, scheduler, sink) = notifier();

        notifier.observe(HostEvent::TabCreated);
        scheduler.advance(200);
        notifier.observe(moved(7));
        scheduler.advance(100);

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.pushes.borrow()[1], Push::StateChanged);
    }

    #[test]
    fn test_event_from_bridge_json() {
        let event: HostEvent = serde_json::from_value(serde_json::json!({
            "kind": "tab-moved",
            "tabId": 12,
            "moveInfo": { "windowId": 3, "fromIndex": 0, "toIndex": 4 }
        }))
        .unwrap();
        assert_eq!(
            event,
            HostEvent::TabMoved {
                tab_id: 12,
                move_info: MoveInfo {
                    window_id: 3,
                    from_index: 0,
                    to_index: 4
                }
            }
        );

        let event: HostEvent = serde_json::from_value(serde_json::json!({
            "kind": "tab-updated",
            "changeInfo": { "url": "https://example.com", "audible": true }
        }))
        .unwrap();
        assert_eq!(event.delivery(), Delivery::Debounced);

        let event: HostEvent =
            serde_json::from_value(serde_json::json!({ "kind": "window-removed", "windowId": 4 })).unwrap();
        assert_eq!(event, HostEvent::WindowRemoved);
    }
}
