/// One-shot timers
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/timers.js")]
extern "C" {
    fn setTimer(delay_ms: u32, callback: &Closure<dyn FnMut()>) -> f64;

    fn clearTimer(id: f64);
}

/// Something that can run a task later and take it back before it runs
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;

    /// Cancelling a task that already ran does nothing
    fn cancel(&self, handle: Self::Handle);
}

/// `setTimeout` in whatever global scope the code runs in (page or worker)
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimers;

/// A pending `setTimeout`; dropping it clears the timer
pub struct TimerHandle {
    id: f64,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        clearTimer(self.id);
    }
}

impl Scheduler for BrowserTimers {
    type Handle = TimerHandle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        let callback = Closure::once(task);
        let id = setTimer(delay_ms, &callback);
        TimerHandle {
            id,
            _callback: callback,
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        drop(handle);
    }
}
