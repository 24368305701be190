use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::frame_clock::{FrameClock, FramePhase, SubscriptionId};
use super::smooth_scroll::{InputSource, SmoothScroll, SmoothScrollOptions};
use super::triggers::{ScrollTrigger, TriggerId, TriggerRegistry};

pub const ROOT_CLASS: &str = "lenis";
pub const SMOOTH_CLASS: &str = "lenis-smooth";
pub const STOPPED_CLASS: &str = "lenis-stopped";

/// Ids of the landing page sections, usable as scroll targets.
pub mod section_ids {
    pub const HERO: &str = "hero";
    pub const PHILOSOPHY: &str = "philosophy";
    pub const TRANSFORMATION: &str = "transformation";
    pub const DIAGNOSTIC: &str = "diagnostic";
    pub const ROADMAP: &str = "roadmap";
    pub const CONTACT: &str = "contact";
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    Element(web_sys::Element),
    Selector(String),
    Pixels(f64),
}

impl From<&str> for ScrollTarget {
    fn from(selector: &str) -> Self {
        ScrollTarget::Selector(normalize_selector(selector))
    }
}

impl From<f64> for ScrollTarget {
    fn from(y: f64) -> Self {
        ScrollTarget::Pixels(y)
    }
}

impl From<web_sys::Element> for ScrollTarget {
    fn from(element: web_sys::Element) -> Self {
        ScrollTarget::Element(element)
    }
}

/// A bare section id ("contact") becomes "#contact"; anything that already
/// looks like a selector is kept.
pub fn normalize_selector(selector: &str) -> String {
    let selector = selector.trim();
    let is_plain_id = !selector.is_empty()
        && selector
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if is_plain_id {
        format!("#{}", selector)
    } else {
        selector.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollToOptions {
    pub offset: f64,
    pub duration_secs: Option<f64>,
    pub immediate: bool,
    /// Scroll even while locked.
    pub force: bool,
}

/// Absolute document-space box of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f64,
    pub height: f64,
}

/// What the controller needs from the page it scrolls.
pub trait ScrollHost {
    fn scroll_y(&self) -> f64;
    /// Largest reachable scroll offset.
    fn scroll_limit(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn apply_scroll(&self, y: f64);
    /// `None` for [`ScrollTarget::Pixels`] and for selectors with no match.
    fn measure(&self, target: &ScrollTarget) -> Option<ElementBox>;
    fn set_root_class(&self, class: &str, enabled: bool);
}

struct ControllerInner {
    clock: FrameClock,
    host: Rc<dyn ScrollHost>,
    engine: RefCell<SmoothScroll>,
    triggers: RefCell<TriggerRegistry>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
    last_limit: Cell<f64>,
    needs_refresh: Cell<bool>,
    destroyed: Cell<bool>,
}

/// Smooth scrolling plus scroll triggers, both advanced by one [`FrameClock`].
#[derive(Clone)]
pub struct ScrollController {
    inner: Rc<ControllerInner>,
}

impl PartialEq for ScrollController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ScrollController {
    pub fn new(clock: FrameClock, host: Rc<dyn ScrollHost>, options: SmoothScrollOptions) -> Self {
        let limit = host.scroll_limit();
        let engine = SmoothScroll::new(options, host.scroll_y(), limit);
        let inner = Rc::new(ControllerInner {
            clock: clock.clone(),
            host: host.clone(),
            engine: RefCell::new(engine),
            triggers: RefCell::new(TriggerRegistry::new()),
            subscriptions: RefCell::new(Vec::new()),
            last_limit: Cell::new(limit),
            needs_refresh: Cell::new(false),
            destroyed: Cell::new(false),
        });

        let weak: Weak<ControllerInner> = Rc::downgrade(&inner);
        let scroll_sub = clock.subscribe(FramePhase::Scroll, move |tick| {
            if let Some(inner) = weak.upgrade() {
                inner.step_scroll(tick.delta_ms);
            }
        });
        let weak: Weak<ControllerInner> = Rc::downgrade(&inner);
        let trigger_sub = clock.subscribe(FramePhase::Triggers, move |tick| {
            if let Some(inner) = weak.upgrade() {
                inner.step_triggers(tick.delta_ms);
            }
        });
        inner.subscriptions.borrow_mut().extend([scroll_sub, trigger_sub]);

        host.set_root_class(ROOT_CLASS, true);
        host.set_root_class(SMOOTH_CLASS, true);
        log::debug!("Smooth scroll initialized");

        Self { inner }
    }

    pub fn clock(&self) -> FrameClock {
        self.inner.clock.clone()
    }

    /// Releases the scroll lock. No-op when not locked.
    pub fn start(&self) {
        if self.inner.destroyed.get() {
            return;
        }
        if self.inner.engine.borrow_mut().start() {
            self.inner.host.set_root_class(STOPPED_CLASS, false);
        }
    }

    /// Freezes the current position and locks scrolling. Idempotent.
    pub fn stop(&self) {
        if self.inner.destroyed.get() {
            return;
        }
        if self.inner.engine.borrow_mut().stop() {
            self.inner.host.set_root_class(STOPPED_CLASS, true);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.inner.engine.borrow().is_stopped()
    }

    pub fn scroll_y(&self) -> f64 {
        self.inner.engine.borrow().position()
    }

    pub fn viewport_height(&self) -> f64 {
        self.inner.host.viewport_height()
    }

    pub fn measure(&self, target: &ScrollTarget) -> Option<ElementBox> {
        self.inner.host.measure(target)
    }

    /// Returns whether a scroll was started.
    pub fn scroll_to(&self, target: impl Into<ScrollTarget>, options: ScrollToOptions) -> bool {
        if self.inner.destroyed.get() {
            return false;
        }
        let target = target.into();
        let base = match &target {
            ScrollTarget::Pixels(y) => *y,
            other => match self.inner.host.measure(other) {
                Some(rect) => rect.top,
                None => {
                    log::warn!("Scroll target {:?} not found", other);
                    return false;
                }
            },
        };

        let mut engine = self.inner.engine.borrow_mut();
        let started = engine.scroll_to(
            base + options.offset,
            options.duration_secs,
            options.immediate,
            options.force,
        );
        if !started {
            log::debug!("Ignoring scroll_to while scroll is locked");
            return false;
        }
        if options.immediate {
            let y = engine.position();
            drop(engine);
            self.inner.host.apply_scroll(y);
        }
        true
    }

    pub fn scroll_to_top(&self) -> bool {
        self.scroll_to(0.0, ScrollToOptions::default())
    }

    /// Feeds a wheel/touch delta. Returns whether the native scroll should be
    /// prevented.
    pub fn on_input(&self, delta: f64, source: InputSource) -> bool {
        if self.inner.destroyed.get() {
            return false;
        }
        let mut engine = self.inner.engine.borrow_mut();
        engine.set_limit(self.inner.host.scroll_limit());
        if !engine.is_animating() {
            engine.sync_native(self.inner.host.scroll_y());
        }
        engine.on_input(delta, source)
    }

    pub fn add_trigger(&self, trigger: ScrollTrigger) -> TriggerId {
        self.inner.triggers.borrow_mut().add(trigger)
    }

    pub fn remove_trigger(&self, id: TriggerId) {
        self.inner.triggers.borrow_mut().remove(id);
    }

    /// Re-measures trigger bounds on the next frame.
    pub fn refresh(&self) {
        self.inner.needs_refresh.set(true);
    }

    /// Unsubscribes from the frame clock, drops all triggers and clears the
    /// host classes. Later calls on this controller are no-ops.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        for id in self.inner.subscriptions.borrow_mut().drain(..) {
            self.inner.clock.unsubscribe(id);
        }
        self.inner.triggers.borrow_mut().clear();
        for class in [ROOT_CLASS, SMOOTH_CLASS, STOPPED_CLASS] {
            self.inner.host.set_root_class(class, false);
        }
        log::debug!("Smooth scroll destroyed");
    }
}

impl ControllerInner {
    fn step_scroll(&self, delta_ms: f64) {
        let limit = self.host.scroll_limit();
        // A new document height means sections moved.
        if (limit - self.last_limit.replace(limit)).abs() > 0.5 {
            self.needs_refresh.set(true);
        }

        let mut engine = self.engine.borrow_mut();
        engine.set_limit(limit);
        if !engine.is_animating() {
            engine.sync_native(self.host.scroll_y());
            return;
        }
        if let Some(y) = engine.advance(delta_ms) {
            drop(engine);
            self.host.apply_scroll(y);
        }
    }

    fn step_triggers(&self, delta_ms: f64) {
        if self.needs_refresh.replace(false) {
            self.triggers.borrow_mut().refresh();
        }
        let y = self.engine.borrow().position();
        let events = self.triggers.borrow_mut().update(y, delta_ms);
        for event in events {
            event.fire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeHost {
        y: Cell<f64>,
        limit: Cell<f64>,
        classes: RefCell<Vec<String>>,
        class_writes: Cell<usize>,
        elements: HashMap<String, ElementBox>,
    }

    impl FakeHost {
        fn with_sections() -> Self {
            let mut elements = HashMap::new();
            elements.insert("#contact".to_string(), ElementBox { top: 3000.0, height: 800.0 });
            elements.insert("#roadmap".to_string(), ElementBox { top: 2000.0, height: 900.0 });
            Self {
                elements,
                limit: Cell::new(5000.0),
                ..Default::default()
            }
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.borrow().iter().any(|c| c == class)
        }
    }

    impl ScrollHost for FakeHost {
        fn scroll_y(&self) -> f64 {
            self.y.get()
        }

        fn scroll_limit(&self) -> f64 {
            self.limit.get()
        }

        fn viewport_height(&self) -> f64 {
            1000.0
        }

        fn apply_scroll(&self, y: f64) {
            self.y.set(y);
        }

        fn measure(&self, target: &ScrollTarget) -> Option<ElementBox> {
            match target {
                ScrollTarget::Selector(s) => self.elements.get(s).copied(),
                _ => None,
            }
        }

        fn set_root_class(&self, class: &str, enabled: bool) {
            self.class_writes.set(self.class_writes.get() + 1);
            let mut classes = self.classes.borrow_mut();
            classes.retain(|c| c != class);
            if enabled {
                classes.push(class.to_string());
            }
        }
    }

    fn setup() -> (FrameClock, Rc<FakeHost>, ScrollController) {
        let clock = FrameClock::new();
        let host = Rc::new(FakeHost::with_sections());
        let controller = ScrollController::new(clock.clone(), host.clone(), SmoothScrollOptions::default());
        (clock, host, controller)
    }

    fn run_frames(clock: &FrameClock, from_ms: f64, frames: usize) -> f64 {
        let mut t = from_ms;
        for _ in 0..frames {
            clock.tick(t);
            t += 16.0;
        }
        t
    }

    #[test]
    fn stop_twice_applies_lock_class_once_and_start_restores() {
        let (_clock, host, controller) = setup();
        let writes_before = host.class_writes.get();

        controller.stop();
        controller.stop();
        assert!(controller.is_locked());
        assert!(host.has_class(STOPPED_CLASS));
        assert_eq!(host.class_writes.get(), writes_before + 1);

        controller.start();
        assert!(!controller.is_locked());
        assert!(!host.has_class(STOPPED_CLASS));

        assert!(controller.on_input(500.0, InputSource::Wheel));
    }

    #[test]
    fn scroll_to_selector_eases_to_element_top_plus_offset() {
        let (clock, host, controller) = setup();
        let opts = ScrollToOptions {
            offset: -80.0,
            ..Default::default()
        };

        assert!(controller.scroll_to("contact", opts));
        run_frames(&clock, 0.0, 100);
        assert_eq!(host.scroll_y(), 2920.0);
    }

    #[test]
    fn unknown_selector_is_a_no_op() {
        let (clock, host, controller) = setup();
        assert!(!controller.scroll_to("#missing", ScrollToOptions::default()));
        run_frames(&clock, 0.0, 10);
        assert_eq!(host.scroll_y(), 0.0);
    }

    #[test]
    fn scroll_to_is_ignored_while_locked_unless_forced() {
        let (_clock, host, controller) = setup();
        controller.stop();

        assert!(!controller.scroll_to(1200.0, ScrollToOptions::default()));

        let forced = ScrollToOptions {
            immediate: true,
            force: true,
            ..Default::default()
        };
        assert!(controller.scroll_to(1200.0, forced));
        assert_eq!(host.scroll_y(), 1200.0);
    }

    #[test]
    fn triggers_see_the_position_from_the_same_frame() {
        let (clock, host, controller) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        controller.add_trigger(ScrollTrigger::new(0.0, 5000.0).on_update(move |p| s.borrow_mut().push(p * 5000.0)));

        controller.scroll_to(2000.0, ScrollToOptions::default());
        run_frames(&clock, 0.0, 10);

        let last_seen = *seen.borrow().last().unwrap();
        assert!((last_seen - host.scroll_y()).abs() < 1e-6);
    }

    #[test]
    fn locked_scroll_freezes_triggers_too() {
        let (clock, _host, controller) = setup();
        let updates = Rc::new(Cell::new(0));
        let u = updates.clone();
        controller.add_trigger(ScrollTrigger::new(0.0, 5000.0).on_update(move |_| u.set(u.get() + 1)));

        controller.scroll_to(3000.0, ScrollToOptions::default());
        let t = run_frames(&clock, 0.0, 5);
        controller.stop();
        let frozen = updates.get();
        run_frames(&clock, t, 20);
        assert_eq!(updates.get(), frozen);
    }

    #[test]
    fn native_scroll_is_picked_up_when_idle() {
        let (clock, host, controller) = setup();
        host.y.set(750.0);
        clock.tick(0.0);
        assert_eq!(controller.scroll_y(), 750.0);
    }

    #[test]
    fn destroy_releases_every_frame_subscription() {
        let (clock, host, controller) = setup();
        controller.add_trigger(ScrollTrigger::new(0.0, 100.0));
        assert_eq!(clock.subscriber_count(), 2);

        controller.destroy();
        controller.destroy();

        assert_eq!(clock.subscriber_count(), 0);
        assert!(host.classes.borrow().is_empty());
        assert!(!controller.scroll_to(100.0, ScrollToOptions::default()));
    }

    #[test]
    fn trigger_callback_may_remove_its_own_trigger() {
        let (clock, _host, controller) = setup();
        let slot: Rc<Cell<Option<TriggerId>>> = Rc::new(Cell::new(None));
        let handle = controller.clone();
        let s = slot.clone();
        let id = controller.add_trigger(ScrollTrigger::new(0.0, 100.0).on_enter(move || {
            if let Some(id) = s.get() {
                handle.remove_trigger(id);
            }
        }));
        slot.set(Some(id));

        run_frames(&clock, 0.0, 2);
        assert_eq!(controller.inner.triggers.borrow().len(), 0);
    }

    #[test]
    fn document_growth_remeasures_triggers() {
        let (clock, host, controller) = setup();
        let measured = Rc::new(Cell::new(0));
        let m = measured.clone();
        controller.add_trigger(ScrollTrigger::measured(move || {
            m.set(m.get() + 1);
            Some((0.0, 100.0))
        }));
        let after_add = measured.get();

        clock.tick(0.0);
        assert_eq!(measured.get(), after_add);

        host.limit.set(6000.0);
        clock.tick(16.0);
        assert_eq!(measured.get(), after_add + 1);

        controller.refresh();
        clock.tick(32.0);
        assert_eq!(measured.get(), after_add + 2);
    }

    #[test]
    fn bare_ids_are_normalized_to_selectors() {
        assert_eq!(normalize_selector("contact"), "#contact");
        assert_eq!(normalize_selector("#contact"), "#contact");
        assert_eq!(normalize_selector(".card"), ".card");
        assert_eq!(normalize_selector("section[data-x]"), "section[data-x]");
    }
}
