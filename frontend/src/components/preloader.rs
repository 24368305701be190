use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::media::use_reduced_motion;
use crate::scroll::controller::ScrollController;
use crate::scroll::provider::use_scroll;

pub const WORDS: [&str; 3] = ["КОНТРОЛЬ", "ТРАНСФОРМАЦИЯ", "СВОБОДА"];

pub const MIN_DISPLAY_MS: u32 = 2500;
pub const SAFETY_TIMEOUT_MS: u32 = 5000;
pub const FADE_MS: u32 = 500;
pub const REDUCED_MOTION_DELAY_MS: u32 = 1000;
/// (word index, ms after mount) for every word change after the first.
pub const PHASE_SCHEDULE: [(usize, u32); 2] = [(1, 1500), (2, 2700)];
pub const TIMELINE_END_MS: u32 = 3300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderState {
    Running(usize),
    FadingOut,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    Timeline,
    SafetyTimeout,
}

/// Yields `true` exactly once.
#[derive(Debug, Default)]
pub struct CompletionToken {
    spent: bool,
}

impl CompletionToken {
    pub fn take(&mut self) -> bool {
        !std::mem::replace(&mut self.spent, true)
    }
}

/// Timing rules of the intro overlay, free of any timers.
#[derive(Debug)]
pub struct PreloaderMachine {
    state: PreloaderState,
    started_at_ms: f64,
    trigger: CompletionToken,
    completion: CompletionToken,
}

impl PreloaderMachine {
    pub fn start(now_ms: f64, reduced_motion: bool) -> Self {
        let first = if reduced_motion { WORDS.len() - 1 } else { 0 };
        Self {
            state: PreloaderState::Running(first),
            started_at_ms: now_ms,
            trigger: CompletionToken::default(),
            completion: CompletionToken::default(),
        }
    }

    pub fn state(&self) -> PreloaderState {
        self.state
    }

    pub fn advance_phase(&mut self, index: usize) -> bool {
        match self.state {
            PreloaderState::Running(current) if index > current && index < WORDS.len() => {
                self.state = PreloaderState::Running(index);
                true
            }
            _ => false,
        }
    }

    /// First trigger wins. Returns how long to keep showing the overlay
    /// before fading, or `None` if completion was already triggered.
    pub fn trigger_completion(&mut self, now_ms: f64, source: CompletionSource) -> Option<u32> {
        if !self.trigger.take() {
            return None;
        }
        if source == CompletionSource::SafetyTimeout {
            log::warn!("Preloader timeline did not finish, completing via safety timeout");
        }
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        Some((f64::from(MIN_DISPLAY_MS) - elapsed).max(0.0).ceil() as u32)
    }

    pub fn begin_fade(&mut self) -> bool {
        if matches!(self.state, PreloaderState::Running(_)) {
            self.state = PreloaderState::FadingOut;
            true
        } else {
            false
        }
    }

    /// Returns `true` once, when the caller should fire its completion hook.
    pub fn finish(&mut self) -> bool {
        if self.state != PreloaderState::FadingOut || !self.completion.take() {
            return false;
        }
        self.state = PreloaderState::Complete;
        true
    }
}

pub fn word_for(state: PreloaderState) -> &'static str {
    match state {
        PreloaderState::Running(i) => WORDS[i.min(WORDS.len() - 1)],
        _ => WORDS[WORDS.len() - 1],
    }
}

fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

/// Mutable side of a mounted preloader, shared by its timers.
struct Runtime {
    machine: RefCell<PreloaderMachine>,
    timers: RefCell<Vec<Timeout>>,
    view: UseStateSetter<PreloaderState>,
    scroll: Option<ScrollController>,
    on_complete: Callback<()>,
}

impl Runtime {
    fn schedule(self: &Rc<Self>, after_ms: u32, step: fn(&Rc<Runtime>)) {
        let weak: Weak<Runtime> = Rc::downgrade(self);
        let timeout = Timeout::new(after_ms, move || {
            if let Some(runtime) = weak.upgrade() {
                step(&runtime);
            }
        });
        self.timers.borrow_mut().push(timeout);
    }

    fn publish(&self) {
        self.view.set(self.machine.borrow().state());
    }

    fn advance_to(self: &Rc<Self>, index: usize) {
        if self.machine.borrow_mut().advance_phase(index) {
            self.publish();
        }
    }

    fn trigger(self: &Rc<Self>, source: CompletionSource) {
        let hold = self.machine.borrow_mut().trigger_completion(now_ms(), source);
        if let Some(hold) = hold {
            self.schedule(hold, |rt| rt.begin_fade());
        }
    }

    fn begin_fade(self: &Rc<Self>) {
        if self.machine.borrow_mut().begin_fade() {
            self.publish();
            self.schedule(FADE_MS, |rt| rt.finish());
        }
    }

    fn finish(self: &Rc<Self>) {
        if !self.machine.borrow_mut().finish() {
            return;
        }
        self.publish();
        if let Some(scroll) = &self.scroll {
            scroll.start();
        }
        log::info!("Preloader complete");
        // The parent unmounts us in response, which drops the timer that is
        // running this very step; emit after it returns.
        let on_complete = self.on_complete.clone();
        wasm_bindgen_futures::spawn_local(async move { on_complete.emit(()) });
    }
}

#[derive(Properties, PartialEq)]
pub struct PreloaderProps {
    pub on_complete: Callback<()>,
}

/// Full-screen intro. Locks scrolling while shown and calls `on_complete`
/// exactly once when it has faded out.
#[function_component(Preloader)]
pub fn preloader(props: &PreloaderProps) -> Html {
    let reduced_motion = use_reduced_motion();
    let scroll = use_scroll();
    let state = use_state(|| PreloaderState::Running(if reduced_motion { WORDS.len() - 1 } else { 0 }));

    {
        let view = state.setter();
        let on_complete = props.on_complete.clone();
        // Motion preference is read once; a change mid-intro does not restart it.
        use_effect_with_deps(
            move |_| {
                if let Some(scroll) = &scroll {
                    scroll.stop();
                }
                let machine = PreloaderMachine::start(now_ms(), reduced_motion);
                let runtime = Rc::new(Runtime {
                    machine: RefCell::new(machine),
                    timers: RefCell::new(Vec::new()),
                    view,
                    scroll,
                    on_complete,
                });
                runtime.publish();

                if reduced_motion {
                    runtime.schedule(REDUCED_MOTION_DELAY_MS, |rt| rt.trigger(CompletionSource::Timeline));
                } else {
                    for (index, at) in PHASE_SCHEDULE {
                        let weak = Rc::downgrade(&runtime);
                        let timeout = Timeout::new(at, move || {
                            if let Some(rt) = weak.upgrade() {
                                rt.advance_to(index);
                            }
                        });
                        runtime.timers.borrow_mut().push(timeout);
                    }
                    runtime.schedule(TIMELINE_END_MS, |rt| rt.trigger(CompletionSource::Timeline));
                }
                runtime.schedule(SAFETY_TIMEOUT_MS, |rt| rt.trigger(CompletionSource::SafetyTimeout));

                move || {
                    // Dropping the timeouts cancels them.
                    runtime.timers.borrow_mut().clear();
                    if let Some(scroll) = &runtime.scroll {
                        scroll.start();
                    }
                }
            },
            (),
        );
    }

    if *state == PreloaderState::Complete {
        return html! {};
    }
    let word = word_for(*state);
    let fading = *state == PreloaderState::FadingOut;

    html! {
        <div
            class={classes!("preloader", fading.then_some("preloader--fading"), reduced_motion.then_some("preloader--static"))}
            role="status"
            aria-live="polite"
            aria-label="Загрузка"
        >
            <div class="preloader__stroke" aria-hidden="true">
                <svg viewBox="0 0 400 40" preserveAspectRatio="none">
                    <path d="M5 25 C 80 5, 160 35, 240 18 S 360 10, 395 22" />
                </svg>
            </div>
            <span key={word} class="preloader__word">{ word }</span>
            <style>
                {r#"
                    .preloader { position: fixed; inset: 0; z-index: 100; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1.5rem; background: var(--bg); transition: opacity 0.5s ease-in-out; }
                    .preloader--fading { opacity: 0; pointer-events: none; }
                    .preloader__stroke { width: min(24rem, 80vw); }
                    .preloader__stroke path { fill: none; stroke: var(--gold-primary); stroke-width: 6; stroke-linecap: round; stroke-dasharray: 480; stroke-dashoffset: 480; animation: preloader-draw 1.2s ease-out forwards; }
                    .preloader__word { font-family: var(--font-display); font-size: clamp(2rem, 6vw, 4rem); letter-spacing: 0.2em; animation: preloader-word 0.6s ease-out both; }
                    .preloader--static .preloader__stroke path { animation: none; stroke-dashoffset: 0; }
                    .preloader--static .preloader__word { animation: none; }
                    @keyframes preloader-draw { to { stroke-dashoffset: 0; } }
                    @keyframes preloader-word { from { opacity: 0; transform: translateY(16px); } to { opacity: 1; transform: none; } }
                "#}
            </style>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_yields_once() {
        let mut token = CompletionToken::default();
        assert!(token.take());
        assert!(!token.take());
        assert!(!token.take());
    }

    #[test]
    fn words_advance_in_order_only() {
        let mut machine = PreloaderMachine::start(0.0, false);
        assert_eq!(word_for(machine.state()), "КОНТРОЛЬ");
        assert!(machine.advance_phase(1));
        assert_eq!(word_for(machine.state()), "ТРАНСФОРМАЦИЯ");
        assert!(!machine.advance_phase(1));
        assert!(!machine.advance_phase(0));
        assert!(machine.advance_phase(2));
        assert_eq!(word_for(machine.state()), "СВОБОДА");
        assert!(!machine.advance_phase(3));
    }

    #[test]
    fn timeline_end_completes_after_min_display() {
        let mut machine = PreloaderMachine::start(1_000.0, false);
        // Timeline ends at 3300 ms, past the 2500 ms minimum.
        assert_eq!(
            machine.trigger_completion(1_000.0 + f64::from(TIMELINE_END_MS), CompletionSource::Timeline),
            Some(0)
        );
    }

    #[test]
    fn early_trigger_waits_out_the_minimum() {
        let mut machine = PreloaderMachine::start(0.0, false);
        assert_eq!(machine.trigger_completion(1_200.0, CompletionSource::Timeline), Some(1_300));
    }

    #[test]
    fn safety_timeout_is_ignored_after_timeline_completion() {
        let mut machine = PreloaderMachine::start(0.0, false);
        assert!(machine.trigger_completion(3_300.0, CompletionSource::Timeline).is_some());
        assert_eq!(machine.trigger_completion(5_000.0, CompletionSource::SafetyTimeout), None);
    }

    #[test]
    fn safety_timeout_alone_completes_after_fade() {
        let mut machine = PreloaderMachine::start(0.0, false);
        // Timeline never fired.
        let hold = machine.trigger_completion(f64::from(SAFETY_TIMEOUT_MS), CompletionSource::SafetyTimeout);
        assert_eq!(hold, Some(0));
        assert!(machine.begin_fade());
        assert_eq!(machine.state(), PreloaderState::FadingOut);
        assert!(machine.finish());
        assert_eq!(machine.state(), PreloaderState::Complete);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut machine = PreloaderMachine::start(0.0, false);
        machine.trigger_completion(3_300.0, CompletionSource::Timeline);
        machine.trigger_completion(5_000.0, CompletionSource::SafetyTimeout);

        assert!(machine.begin_fade());
        assert!(!machine.begin_fade());

        let fired = (0..3).filter(|_| machine.finish()).count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn finish_before_fade_does_nothing() {
        let mut machine = PreloaderMachine::start(0.0, false);
        assert!(!machine.finish());
        assert_eq!(machine.state(), PreloaderState::Running(0));
    }

    #[test]
    fn reduced_motion_shows_final_word_and_still_honors_minimum() {
        let mut machine = PreloaderMachine::start(0.0, true);
        assert_eq!(machine.state(), PreloaderState::Running(2));
        assert_eq!(word_for(machine.state()), "СВОБОДА");

        let hold = machine.trigger_completion(f64::from(REDUCED_MOTION_DELAY_MS), CompletionSource::Timeline);
        assert_eq!(hold, Some(MIN_DISPLAY_MS - REDUCED_MOTION_DELAY_MS));
    }

    #[test]
    fn overlay_is_visible_at_least_min_display_plus_fade() {
        // Whatever triggers first, fade starts no earlier than MIN_DISPLAY_MS.
        for trigger_at in [0.0, 900.0, 2_499.0, 3_300.0, 5_000.0] {
            let mut machine = PreloaderMachine::start(0.0, false);
            let hold = machine
                .trigger_completion(trigger_at, CompletionSource::Timeline)
                .unwrap();
            let fade_start = trigger_at + f64::from(hold);
            assert!(fade_start >= f64::from(MIN_DISPLAY_MS));
            assert!(fade_start + f64::from(FADE_MS) >= 3_000.0);
        }
    }
}
