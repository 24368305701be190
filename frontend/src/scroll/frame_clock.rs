//! One per-frame heartbeat shared by the smooth scroll engine and the scroll
//! triggers, so both advance in the same frame and stop together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Subscribers run grouped by phase, in declaration order of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FramePhase {
    Scroll,
    Triggers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub time_ms: f64,
    pub delta_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type FrameCallback = Box<dyn FnMut(FrameTick)>;

struct Subscriber {
    id: SubscriptionId,
    phase: FramePhase,
    // Taken out while it runs so the callback may (un)subscribe.
    callback: Option<FrameCallback>,
}

#[derive(Default)]
struct ClockInner {
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
    last_time: Cell<Option<f64>>,
}

#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<ClockInner>,
}

impl PartialEq for FrameClock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        phase: FramePhase,
        callback: impl FnMut(FrameTick) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let mut subscribers = self.inner.subscribers.borrow_mut();
        let at = subscribers
            .iter()
            .position(|s| s.phase > phase)
            .unwrap_or(subscribers.len());
        subscribers.insert(
            at,
            Subscriber {
                id,
                phase,
                callback: Some(Box::new(callback)),
            },
        );
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Advances one frame. `time_ms` is the host's monotonic frame timestamp.
    pub fn tick(&self, time_ms: f64) {
        let delta_ms = match self.inner.last_time.replace(Some(time_ms)) {
            Some(last) => (time_ms - last).max(0.0),
            None => 0.0,
        };
        let tick = FrameTick { time_ms, delta_ms };

        let order: Vec<SubscriptionId> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| s.id)
            .collect();

        for id in order {
            let callback = self
                .inner
                .subscribers
                .borrow_mut()
                .iter_mut()
                .find(|s| s.id == id)
                .and_then(|s| s.callback.take());

            let Some(mut callback) = callback else {
                continue;
            };
            callback(tick);

            // Only put it back if nobody unsubscribed it meanwhile.
            if let Some(slot) = self
                .inner
                .subscribers
                .borrow_mut()
                .iter_mut()
                .find(|s| s.id == id)
            {
                slot.callback = Some(callback);
            }
        }
    }
}

/// Drives a [`FrameClock`] from `requestAnimationFrame` until stopped.
pub struct RafLoop {
    window: web_sys::Window,
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl RafLoop {
    pub fn start(clock: FrameClock) -> Option<Self> {
        let window = web_sys::window()?;
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let frame = {
            let window = window.clone();
            let running = running.clone();
            let pending = pending.clone();
            let callback = callback.clone();
            Closure::wrap(Box::new(move |time: f64| {
                pending.set(None);
                if !running.get() {
                    return;
                }
                clock.tick(time);
                if !running.get() {
                    return;
                }
                if let Some(cb) = callback.borrow().as_ref() {
                    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        Ok(id) => pending.set(Some(id)),
                        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        };

        let first = window
            .request_animation_frame(frame.as_ref().unchecked_ref())
            .ok()?;
        pending.set(Some(first));
        *callback.borrow_mut() = Some(frame);

        Some(Self {
            window,
            running,
            pending,
            callback,
        })
    }

    pub fn stop(&mut self) {
        self.running.set(false);
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure -> Rc -> closure cycle.
        self.callback.borrow_mut().take();
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_zero_on_first_tick_then_elapsed_time() {
        let clock = FrameClock::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        clock.subscribe(FramePhase::Scroll, move |t| sink.borrow_mut().push(t.delta_ms));

        clock.tick(1000.0);
        clock.tick(1016.0);
        clock.tick(1048.5);

        assert_eq!(*seen.borrow(), vec![0.0, 16.0, 32.5]);
    }

    #[test]
    fn scroll_phase_runs_before_triggers_regardless_of_subscription_order() {
        let clock = FrameClock::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        clock.subscribe(FramePhase::Triggers, move |_| o.borrow_mut().push("triggers-a"));
        let o = order.clone();
        clock.subscribe(FramePhase::Scroll, move |_| o.borrow_mut().push("scroll"));
        let o = order.clone();
        clock.subscribe(FramePhase::Triggers, move |_| o.borrow_mut().push("triggers-b"));

        clock.tick(0.0);
        assert_eq!(*order.borrow(), vec!["scroll", "triggers-a", "triggers-b"]);
    }

    #[test]
    fn unsubscribe_returns_count_to_zero() {
        let clock = FrameClock::new();
        let a = clock.subscribe(FramePhase::Scroll, |_| {});
        let b = clock.subscribe(FramePhase::Triggers, |_| {});
        assert_eq!(clock.subscriber_count(), 2);

        assert!(clock.unsubscribe(a));
        assert!(!clock.unsubscribe(a));
        assert!(clock.unsubscribe(b));
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn callback_can_unsubscribe_itself_mid_tick() {
        let clock = FrameClock::new();
        let calls = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let c = calls.clone();
        let id_slot = own_id.clone();
        let handle = clock.clone();
        let id = clock.subscribe(FramePhase::Scroll, move |_| {
            c.set(c.get() + 1);
            if let Some(id) = id_slot.get() {
                handle.unsubscribe(id);
            }
        });
        own_id.set(Some(id));

        clock.tick(0.0);
        clock.tick(16.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_added_during_tick_starts_next_frame() {
        let clock = FrameClock::new();
        let late_calls = Rc::new(Cell::new(0));

        let handle = clock.clone();
        let late = late_calls.clone();
        let added = Rc::new(Cell::new(false));
        clock.subscribe(FramePhase::Scroll, move |_| {
            if !added.replace(true) {
                let late = late.clone();
                handle.subscribe(FramePhase::Triggers, move |_| late.set(late.get() + 1));
            }
        });

        clock.tick(0.0);
        assert_eq!(late_calls.get(), 0);
        clock.tick(16.0);
        assert_eq!(late_calls.get(), 1);
    }
}
