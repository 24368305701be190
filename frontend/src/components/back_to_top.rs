use web_sys::{EventTarget, ScrollBehavior};
use yew::prelude::*;

use crate::media::use_reduced_motion;
use crate::scroll::dom_host::{viewport_height, EventListener};
use crate::scroll::provider::use_scroll;

/// Share of the viewport height scrolled before the button shows.
const THRESHOLD: f64 = 0.5;

pub fn past_threshold(scroll_y: f64, viewport_height: f64, threshold: f64) -> bool {
    scroll_y > viewport_height * threshold
}

fn window_past_threshold(window: &web_sys::Window) -> bool {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    past_threshold(scroll_y, viewport_height(window), THRESHOLD)
}

#[function_component(BackToTop)]
pub fn back_to_top() -> Html {
    let visible = use_state_eq(|| false);
    let reduced_motion = use_reduced_motion();
    let scroll = use_scroll();

    {
        let visible = visible.clone();
        use_effect_with_deps(
            move |_| {
                let listener = web_sys::window().and_then(|window| {
                    visible.set(window_past_threshold(&window));
                    let target: EventTarget = window.clone().into();
                    EventListener::new(&target, "scroll", true, move |_| {
                        visible.set(window_past_threshold(&window));
                    })
                });
                move || drop(listener)
            },
            (),
        );
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        if let Some(controller) = scroll.as_ref() {
            controller.scroll_to_top();
            return;
        }
        if let Some(window) = web_sys::window() {
            let mut options = web_sys::ScrollToOptions::new();
            options.top(0.0);
            options.behavior(if reduced_motion { ScrollBehavior::Auto } else { ScrollBehavior::Smooth });
            window.scroll_to_with_scroll_to_options(&options);
        }
    });

    html! {
        <>
            <button
                class={classes!("back-to-top", (*visible).then_some("back-to-top--visible"))}
                aria-label="Scroll to top"
                aria-hidden={(!*visible).to_string()}
                tabindex={if *visible { "0" } else { "-1" }}
                {onclick}
            >
                <svg viewBox="0 0 24 24" width="20" height="20" aria-hidden="true">
                    <path d="M12 19V5M5 12l7-7 7 7" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" />
                </svg>
            </button>
            <style>
                {r#"
                    .back-to-top { position: fixed; right: 1.5rem; bottom: 1.5rem; z-index: 50; width: 3rem; height: 3rem; border: 0; border-radius: 9999px; background: var(--gold-primary); color: #fff; box-shadow: var(--shadow-gold); display: flex; align-items: center; justify-content: center; cursor: pointer; opacity: 0; transform: translateY(20px) scale(0.8); pointer-events: none; transition: opacity 0.3s ease-in-out, transform 0.3s ease-in-out, background 0.3s; }
                    .back-to-top--visible { opacity: 1; transform: none; pointer-events: auto; }
                    .back-to-top--visible:hover { background: var(--gold-muted); transform: scale(1.1); }
                    @media (prefers-reduced-motion: reduce) { .back-to-top, .back-to-top--visible:hover { transition: none; transform: none; } }
                "#}
            </style>
        </>
    }
}
