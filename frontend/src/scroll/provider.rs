use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{EventTarget, TouchEvent, WheelEvent};
use yew::prelude::*;

use super::controller::{ElementBox, ScrollController, ScrollToOptions};
use super::dom_host::{targets_native_scroll, viewport_height, DomScrollHost, EventListener};
use super::frame_clock::{FrameClock, RafLoop};
use super::smooth_scroll::{wheel_delta_px, InputSource, SmoothScrollOptions};
use super::triggers::{viewport_start, ScrollTrigger};

/// Whether a wheel or touch gesture goes through the smoothing engine.
/// Pinch zoom on trackpads arrives as ctrl+wheel.
fn smooths_input(ctrl_key: bool, native_scroll: bool) -> bool {
    !ctrl_key && !native_scroll
}

/// Frame loop plus the wheel/touch listeners feeding the controller.
struct InputDriver {
    _frames: RafLoop,
    _listeners: Vec<EventListener>,
}

impl InputDriver {
    fn attach(controller: ScrollController) -> Option<Self> {
        let window = web_sys::window()?;
        let frames = RafLoop::start(controller.clock())?;
        let target: &EventTarget = window.as_ref();
        let mut listeners = Vec::new();

        {
            let controller = controller.clone();
            let window = window.clone();
            listeners.extend(EventListener::new(target, "wheel", false, move |event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                if !smooths_input(wheel.ctrl_key(), targets_native_scroll(&event)) {
                    return;
                }
                let delta = wheel_delta_px(wheel.delta_y(), wheel.delta_mode(), viewport_height(&window));
                if controller.on_input(delta, InputSource::Wheel) {
                    event.prevent_default();
                }
            }));
        }

        let last_touch_y: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));
        {
            let last_touch_y = last_touch_y.clone();
            listeners.extend(EventListener::new(target, "touchstart", true, move |event| {
                last_touch_y.set(first_touch_y(&event));
            }));
        }
        {
            let last_touch_y = last_touch_y.clone();
            let controller = controller.clone();
            listeners.extend(EventListener::new(target, "touchmove", false, move |event| {
                let Some(y) = first_touch_y(&event) else {
                    return;
                };
                let Some(previous) = last_touch_y.replace(Some(y)) else {
                    return;
                };
                if !smooths_input(false, targets_native_scroll(&event)) {
                    return;
                }
                if controller.on_input(previous - y, InputSource::Touch) {
                    event.prevent_default();
                }
            }));
        }
        listeners.extend(EventListener::new(target, "touchend", true, move |_| {
            last_touch_y.set(None);
        }));
        listeners.extend(EventListener::new(target, "resize", true, move |_| {
            controller.refresh();
        }));

        Some(Self {
            _frames: frames,
            _listeners: listeners,
        })
    }
}

fn first_touch_y(event: &web_sys::Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(touch.client_y() as f64)
}

#[derive(Properties, PartialEq)]
pub struct SmoothScrollProviderProps {
    pub children: Children,
}

/// Owns the page's [`ScrollController`] and shares it through context.
#[function_component(SmoothScrollProvider)]
pub fn smooth_scroll_provider(props: &SmoothScrollProviderProps) -> Html {
    let controller = use_state(|| {
        DomScrollHost::new().map(|host| {
            ScrollController::new(FrameClock::new(), Rc::new(host), SmoothScrollOptions::default())
        })
    });

    {
        let controller = (*controller).clone();
        use_effect_with_deps(
            move |_| {
                let driver = controller.clone().and_then(InputDriver::attach);
                if driver.is_none() {
                    log::warn!("Smooth scroll unavailable, falling back to native scrolling");
                }
                move || {
                    drop(driver);
                    if let Some(controller) = controller {
                        controller.destroy();
                    }
                }
            },
            (),
        );
    }

    html! {
        <ContextProvider<Option<ScrollController>> context={(*controller).clone()}>
            { for props.children.iter() }
        </ContextProvider<Option<ScrollController>>>
    }
}

/// The page's scroll controller, if smooth scrolling is running.
#[hook]
pub fn use_scroll() -> Option<ScrollController> {
    use_context::<Option<ScrollController>>().flatten()
}

/// Registers the triggers built by `build` while the component is mounted
/// and whenever `deps` change. Does nothing without a scroll controller.
#[hook]
pub fn use_scroll_triggers<D, F>(deps: D, build: F)
where
    D: PartialEq + 'static,
    F: FnOnce(&ScrollController, &D) -> Vec<ScrollTrigger> + 'static,
{
    let scroll = use_scroll();
    use_effect_with_deps(
        move |(scroll, deps)| {
            let registered: Vec<_> = match scroll {
                Some(controller) => build(controller, deps)
                    .into_iter()
                    .map(|trigger| controller.add_trigger(trigger))
                    .collect(),
                None => Vec::new(),
            };
            let scroll = scroll.clone();
            move || {
                if let Some(controller) = scroll {
                    for id in registered {
                        controller.remove_trigger(id);
                    }
                }
            }
        },
        (scroll, deps),
    );
}

/// Document-space box of a mounted node.
pub fn measure_node(node: &NodeRef) -> Option<ElementBox> {
    let element = node.cast::<web_sys::Element>()?;
    let scroll_y = web_sys::window()?.scroll_y().ok()?;
    let rect = element.get_bounding_client_rect();
    Some(ElementBox {
        top: rect.top() + scroll_y,
        height: rect.height(),
    })
}

pub fn set_node_style(node: &NodeRef, style: &str) {
    if let Some(element) = node.cast::<web_sys::Element>() {
        let _ = element.set_attribute("style", style);
    }
}

/// Smoothly scrolls to a section, or jumps natively without a controller.
pub fn scroll_to_section(scroll: Option<&ScrollController>, id: &str) {
    match scroll {
        Some(controller) => {
            controller.scroll_to(id, ScrollToOptions::default());
        }
        None => {
            let element = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(id));
            match element {
                Some(element) => element.scroll_into_view(),
                None => log::warn!("Section #{} not found", id),
            }
        }
    }
}

/// True once the top of `node` has scrolled past `fraction` of the viewport
/// height. Always true when `immediate` is set or smooth scroll is off.
#[hook]
pub fn use_reveal_once(node: NodeRef, fraction: f64, immediate: bool) -> bool {
    let scroll = use_scroll();
    let revealed = use_state_eq(|| immediate || scroll.is_none());

    {
        let revealed = revealed.clone();
        use_scroll_triggers(*revealed, move |_, already| {
            if *already {
                return Vec::new();
            }
            let bounds = move || {
                let vh = viewport_height(&web_sys::window()?);
                measure_node(&node).map(|b| (viewport_start(b.top, vh, fraction), f64::INFINITY))
            };
            vec![ScrollTrigger::measured(bounds).once().on_enter(move || revealed.set(true))]
        });
    }

    immediate || *revealed
}
