//! Scroll-position triggers: enter/leave notifications and (optionally
//! smoothed) progress through a pixel range of the page.

use std::cell::RefCell;
use std::rc::Rc;

type Action = Rc<RefCell<dyn FnMut()>>;
type ProgressAction = Rc<RefCell<dyn FnMut(f64)>>;
type Measure = Rc<dyn Fn() -> Option<(f64, f64)>>;

// Below this the scrubbed progress snaps to the raw value.
const SCRUB_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(u64);

/// Scroll offset at which an element's top reaches `fraction` of the
/// viewport height, measured from the viewport top ("top 80%" is 0.8).
pub fn viewport_start(element_top: f64, viewport_height: f64, fraction: f64) -> f64 {
    element_top - viewport_height * fraction
}

pub fn progress_between(y: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if y >= start { 1.0 } else { 0.0 };
    }
    ((y - start) / (end - start)).clamp(0.0, 1.0)
}

pub struct ScrollTrigger {
    start: f64,
    end: f64,
    measure: Option<Measure>,
    once: bool,
    scrub_secs: Option<f64>,
    on_enter: Option<Action>,
    on_leave: Option<Action>,
    on_update: Option<ProgressAction>,
}

impl ScrollTrigger {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            measure: None,
            once: false,
            scrub_secs: None,
            on_enter: None,
            on_leave: None,
            on_update: None,
        }
    }

    /// Bounds recomputed by `measure` whenever the registry is refreshed.
    /// Until the first successful measurement the trigger never activates.
    pub fn measured(measure: impl Fn() -> Option<(f64, f64)> + 'static) -> Self {
        let (start, end) = measure().unwrap_or((f64::INFINITY, f64::INFINITY));
        Self {
            measure: Some(Rc::new(measure)),
            ..Self::new(start, end)
        }
    }

    /// Removed after the first enter.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Progress follows the scroll position with a lag of `secs`.
    pub fn scrub(mut self, secs: f64) -> Self {
        self.scrub_secs = Some(secs);
        self
    }

    pub fn on_enter(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_enter = Some(Rc::new(RefCell::new(f)));
        self
    }

    pub fn on_leave(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_leave = Some(Rc::new(RefCell::new(f)));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_update = Some(Rc::new(RefCell::new(f)));
        self
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.start && y <= self.end
    }
}

/// A callback collected during [`TriggerRegistry::update`], fired by the
/// caller once the registry is no longer borrowed.
pub enum TriggerEvent {
    Enter(Action),
    Leave(Action),
    Update(ProgressAction, f64),
}

impl TriggerEvent {
    pub fn fire(self) {
        match self {
            TriggerEvent::Enter(f) | TriggerEvent::Leave(f) => (*f.borrow_mut())(),
            TriggerEvent::Update(f, progress) => (*f.borrow_mut())(progress),
        }
    }
}

struct Entry {
    id: TriggerId,
    trigger: ScrollTrigger,
    active: bool,
    progress: Option<f64>,
}

#[derive(Default)]
pub struct TriggerRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, trigger: ScrollTrigger) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            trigger,
            active: false,
            progress: None,
        });
        id
    }

    pub fn remove(&mut self, id: TriggerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-measures triggers created with [`ScrollTrigger::measured`].
    pub fn refresh(&mut self) {
        for entry in &mut self.entries {
            let Some(measure) = &entry.trigger.measure else {
                continue;
            };
            if let Some((start, end)) = measure() {
                entry.trigger.start = start;
                entry.trigger.end = end;
            }
        }
    }

    /// Evaluates every trigger against scroll offset `y`.
    pub fn update(&mut self, y: f64, delta_ms: f64) -> Vec<TriggerEvent> {
        let mut events = Vec::new();
        let mut finished = Vec::new();

        for entry in &mut self.entries {
            let trigger = &entry.trigger;
            let inside = trigger.contains(y);

            if inside && !entry.active {
                entry.active = true;
                if let Some(f) = &trigger.on_enter {
                    events.push(TriggerEvent::Enter(f.clone()));
                }
                if trigger.once {
                    finished.push(entry.id);
                }
            } else if !inside && entry.active {
                entry.active = false;
                if let Some(f) = &trigger.on_leave {
                    events.push(TriggerEvent::Leave(f.clone()));
                }
            }

            let Some(on_update) = &trigger.on_update else {
                continue;
            };
            let raw = progress_between(y, trigger.start, trigger.end);
            let next = match (entry.progress, trigger.scrub_secs) {
                (Some(current), Some(lag)) if lag > 0.0 => {
                    let step = (delta_ms / (lag * 1000.0)).clamp(0.0, 1.0);
                    let eased = current + (raw - current) * step;
                    if (raw - eased).abs() < SCRUB_EPSILON {
                        raw
                    } else {
                        eased
                    }
                }
                _ => raw,
            };
            if entry.progress != Some(next) {
                entry.progress = Some(next);
                events.push(TriggerEvent::Update(on_update.clone(), next));
            }
        }

        if !finished.is_empty() {
            self.entries.retain(|e| !finished.contains(&e.id));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fire_all(events: Vec<TriggerEvent>) {
        for e in events {
            e.fire();
        }
    }

    #[test]
    fn progress_is_clamped_fraction_of_range() {
        assert_eq!(progress_between(50.0, 100.0, 300.0), 0.0);
        assert_eq!(progress_between(200.0, 100.0, 300.0), 0.5);
        assert_eq!(progress_between(900.0, 100.0, 300.0), 1.0);
        assert_eq!(progress_between(100.0, 100.0, 100.0), 1.0);
    }

    #[test]
    fn viewport_start_places_element_top_at_fraction_of_viewport() {
        assert_eq!(viewport_start(2000.0, 1000.0, 0.8), 1200.0);
        assert_eq!(viewport_start(2000.0, 1000.0, 0.0), 2000.0);
    }

    #[test]
    fn enter_and_leave_fire_on_transitions_only() {
        let mut registry = TriggerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (enter, leave) = (log.clone(), log.clone());
        registry.add(
            ScrollTrigger::new(100.0, 200.0)
                .on_enter(move || enter.borrow_mut().push("enter"))
                .on_leave(move || leave.borrow_mut().push("leave")),
        );

        for y in [0.0, 150.0, 160.0, 250.0, 260.0, 120.0] {
            fire_all(registry.update(y, 16.0));
        }
        assert_eq!(*log.borrow(), vec!["enter", "leave", "enter"]);
    }

    #[test]
    fn once_trigger_is_removed_after_first_enter() {
        let mut registry = TriggerRegistry::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        registry.add(ScrollTrigger::new(500.0, f64::INFINITY).once().on_enter(move || c.set(c.get() + 1)));

        fire_all(registry.update(0.0, 16.0));
        assert_eq!(registry.len(), 1);
        fire_all(registry.update(600.0, 16.0));
        fire_all(registry.update(0.0, 16.0));
        fire_all(registry.update(700.0, 16.0));

        assert_eq!(count.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn update_reports_raw_progress_without_scrub() {
        let mut registry = TriggerRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        registry.add(ScrollTrigger::new(0.0, 1000.0).on_update(move |p| s.borrow_mut().push(p)));

        fire_all(registry.update(250.0, 16.0));
        fire_all(registry.update(250.0, 16.0));
        fire_all(registry.update(1000.0, 16.0));

        assert_eq!(*seen.borrow(), vec![0.25, 1.0]);
    }

    #[test]
    fn scrubbed_progress_lags_and_converges() {
        let mut registry = TriggerRegistry::new();
        let last = Rc::new(Cell::new(0.0));
        let l = last.clone();
        registry.add(
            ScrollTrigger::new(0.0, 1000.0)
                .scrub(1.0)
                .on_update(move |p| l.set(p)),
        );

        fire_all(registry.update(0.0, 0.0));
        fire_all(registry.update(1000.0, 100.0));
        let after_one_frame = last.get();
        assert!(after_one_frame > 0.0 && after_one_frame < 0.2);

        for _ in 0..200 {
            fire_all(registry.update(1000.0, 100.0));
        }
        assert_eq!(last.get(), 1.0);
    }

    #[test]
    fn measured_bounds_follow_layout_on_refresh() {
        let top = Rc::new(Cell::new(1000.0));
        let t = top.clone();
        let entered = Rc::new(Cell::new(false));
        let e = entered.clone();

        let mut registry = TriggerRegistry::new();
        registry.add(
            ScrollTrigger::measured(move || Some((t.get(), t.get() + 500.0)))
                .on_enter(move || e.set(true)),
        );

        fire_all(registry.update(600.0, 16.0));
        assert!(!entered.get());

        top.set(400.0);
        fire_all(registry.update(600.0, 16.0));
        assert!(!entered.get(), "bounds only change on refresh");

        registry.refresh();
        fire_all(registry.update(600.0, 16.0));
        assert!(entered.get());
    }

    #[test]
    fn unmeasurable_trigger_stays_inactive() {
        let mut registry = TriggerRegistry::new();
        let entered = Rc::new(Cell::new(false));
        let e = entered.clone();
        registry.add(ScrollTrigger::measured(|| None).on_enter(move || e.set(true)));

        registry.refresh();
        fire_all(registry.update(1e9, 16.0));
        assert!(!entered.get());
    }

    #[test]
    fn removed_trigger_no_longer_fires() {
        let mut registry = TriggerRegistry::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = registry.add(ScrollTrigger::new(0.0, 100.0).on_enter(move || c.set(c.get() + 1)));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        fire_all(registry.update(50.0, 16.0));
        assert_eq!(count.get(), 0);
    }
}
