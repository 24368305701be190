use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, EventTarget, Window};

use super::controller::{ElementBox, ScrollHost, ScrollTarget};

/// The browser window as a [`ScrollHost`].
pub struct DomScrollHost {
    window: Window,
    document: Document,
}

impl DomScrollHost {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn resolve(&self, target: &ScrollTarget) -> Option<Element> {
        match target {
            ScrollTarget::Element(element) => Some(element.clone()),
            ScrollTarget::Selector(selector) => self.document.query_selector(selector).ok().flatten(),
            ScrollTarget::Pixels(_) => None,
        }
    }
}

impl ScrollHost for DomScrollHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_limit(&self) -> f64 {
        let height = self
            .document
            .document_element()
            .map(|root| root.scroll_height() as f64)
            .unwrap_or(0.0);
        (height - self.viewport_height()).max(0.0)
    }

    fn viewport_height(&self) -> f64 {
        viewport_height(&self.window)
    }

    fn apply_scroll(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn measure(&self, target: &ScrollTarget) -> Option<ElementBox> {
        let element = self.resolve(target)?;
        let rect = element.get_bounding_client_rect();
        Some(ElementBox {
            top: rect.top() + self.scroll_y(),
            height: rect.height(),
        })
    }

    fn set_root_class(&self, class: &str, enabled: bool) {
        let Some(root) = self.document.document_element() else {
            return;
        };
        let classes = root.class_list();
        let result = if enabled {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        if let Err(e) = result {
            log::warn!("Could not toggle root class {}: {:?}", class, e);
        }
    }
}

pub fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// Whether more than `threshold` (0..=1) of a box spanning
/// `[top, bottom]` in viewport coordinates is visible.
pub fn visible_fraction_reached(top: f64, bottom: f64, viewport_height: f64, threshold: f64) -> bool {
    let height = bottom - top;
    if height <= 0.0 {
        return false;
    }
    let visible = (bottom.min(viewport_height) - top.max(0.0)).max(0.0);
    visible > 0.0 && visible / height > threshold
}

pub fn is_in_viewport(element: &Element, threshold: f64) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let rect = element.get_bounding_client_rect();
    visible_fraction_reached(rect.top(), rect.bottom(), viewport_height(&window), threshold)
}

/// Whether the event started inside a `[data-lenis-prevent]` subtree, which
/// keeps native scrolling (overflowing text areas).
pub fn targets_native_scroll(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest("[data-lenis-prevent]").ok().flatten())
        .is_some()
}

/// An event listener that is removed when dropped.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(web_sys::Event)>);
        let mut options = AddEventListenerOptions::new();
        options.passive(passive);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        ) {
            log::error!("Failed to listen for {}: {:?}", event, e);
            return None;
        }
        Some(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
