//! Live media-query flags: reduced motion, mobile and desktop layouts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MediaQueryList, MediaQueryListEvent};
use yew::prelude::*;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const MOBILE_QUERY: &str = "(max-width: 767px)";
pub const DESKTOP_QUERY: &str = "(min-width: 1024px)";

type Listener = Box<dyn Fn(bool)>;

/// A boolean that notifies its listeners whenever it changes.
#[derive(Clone, Default)]
pub struct MediaQuerySignal {
    value: Rc<Cell<bool>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl MediaQuerySignal {
    pub fn new(initial: bool) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
            listeners: Rc::default(),
        }
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn set(&self, matches: bool) {
        if self.value.replace(matches) == matches {
            return;
        }
        for listener in self.listeners.borrow().iter() {
            listener(matches);
        }
    }

    pub fn subscribe(&self, listener: impl Fn(bool) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }
}

/// Keeps a [`MediaQuerySignal`] in sync with `matchMedia(query)` until dropped.
pub struct MediaQueryWatch {
    signal: MediaQuerySignal,
    list: Option<MediaQueryList>,
    on_change: Option<Closure<dyn FnMut(MediaQueryListEvent)>>,
}

impl MediaQueryWatch {
    pub fn new(query: &str) -> Self {
        let list = match_media(query);
        let signal = MediaQuerySignal::new(list.as_ref().map(|l| l.matches()).unwrap_or(false));

        let on_change = list.as_ref().and_then(|list| {
            let signal = signal.clone();
            let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
                signal.set(event.matches());
            }) as Box<dyn FnMut(MediaQueryListEvent)>);
            match list.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
                Ok(()) => Some(closure),
                Err(e) => {
                    log::warn!("Cannot watch media query: {:?}", e);
                    None
                }
            }
        });

        Self {
            signal,
            list,
            on_change,
        }
    }

    pub fn signal(&self) -> MediaQuerySignal {
        self.signal.clone()
    }
}

impl Drop for MediaQueryWatch {
    fn drop(&mut self) {
        if let (Some(list), Some(closure)) = (&self.list, &self.on_change) {
            let _ = list.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        }
    }
}

fn match_media(query: &str) -> Option<MediaQueryList> {
    web_sys::window()?.match_media(query).ok().flatten()
}

/// Current value of `query`; starts from the synchronous match and follows
/// changes without remounting. `false` when `matchMedia` is unavailable.
#[hook]
pub fn use_media_query(query: &'static str) -> bool {
    let matches = use_state_eq(|| match_media(query).map(|l| l.matches()).unwrap_or(false));

    {
        let matches = matches.clone();
        use_effect_with_deps(
            move |query| {
                let watch = MediaQueryWatch::new(query);
                let signal = watch.signal();
                matches.set(signal.get());
                signal.subscribe(move |value| matches.set(value));
                move || drop(watch)
            },
            query,
        );
    }

    *matches
}

#[hook]
pub fn use_reduced_motion() -> bool {
    use_media_query(REDUCED_MOTION_QUERY)
}

#[hook]
pub fn use_is_mobile() -> bool {
    use_media_query(MOBILE_QUERY)
}

#[hook]
pub fn use_is_desktop() -> bool {
    use_media_query(DESKTOP_QUERY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_notifies_listeners_with_new_value() {
        let signal = MediaQuerySignal::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        signal.subscribe(move |v| s.borrow_mut().push(v));

        signal.set(true);
        assert!(signal.get());
        signal.set(false);
        assert!(!signal.get());

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn setting_the_same_value_is_silent() {
        let signal = MediaQuerySignal::new(true);
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        signal.subscribe(move |_| c.set(c.get() + 1));

        signal.set(true);
        signal.set(true);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn clones_share_state() {
        let signal = MediaQuerySignal::default();
        let other = signal.clone();
        other.set(true);
        assert!(signal.get());
    }
}
