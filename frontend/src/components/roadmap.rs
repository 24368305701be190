use wasm_bindgen::JsCast;
use web_sys::{EventTarget, KeyboardEvent};
use yew::prelude::*;

use crate::components::section_boundary::use_section_fault;
use crate::media::{use_is_desktop, use_reduced_motion};
use crate::scroll::controller::{section_ids, ScrollController, ScrollTarget, ScrollToOptions};
use crate::scroll::dom_host::{is_in_viewport, viewport_height, EventListener};
use crate::scroll::provider::{measure_node, set_node_style, use_reveal_once, use_scroll, use_scroll_triggers};
use crate::scroll::triggers::ScrollTrigger;

/// Pinned stretch as a multiple of the viewport height.
const PIN_LENGTH: f64 = 2.0;
const NAVIGATION_SECS: f64 = 0.8;
const REVEAL_AT: f64 = 0.8;
const CARD_STAGGER_SECS: f64 = 0.15;
/// Share of the section that must be on screen for arrow keys to navigate.
const KEYBOARD_VISIBILITY: f64 = 0.3;

struct Stage {
    title: &'static str,
    description: &'static str,
}

const STAGES: [Stage; 8] = [
    Stage { title: "Аудит", description: "Глубокий анализ текущей ситуации и постановка целей" },
    Stage { title: "Фундамент", description: "Работа с базовыми установками и убеждениями" },
    Stage { title: "Энергия", description: "Восстановление ресурсного состояния" },
    Stage { title: "Фокус", description: "Определение приоритетов и устранение отвлекающих факторов" },
    Stage { title: "Отношения", description: "Работа с ключевыми связями и коммуникацией" },
    Stage { title: "Привычки", description: "Внедрение новых паттернов поведения" },
    Stage { title: "Интеграция", description: "Закрепление изменений в повседневной жизни" },
    Stage { title: "Выпуск", description: "Подведение итогов и план самостоятельного развития" },
];

/// Stage highlighted at pinned progress `p`, out of `count` stages.
pub fn stage_for_progress(p: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let index = (p.clamp(0.0, 1.0) * count as f64).floor() as usize;
    index.min(count - 1)
}

/// Scroll offset that shows stage `index` within the pinned range.
pub fn scroll_offset_for_stage(start: f64, end: f64, index: usize, count: usize) -> f64 {
    if count < 2 {
        return start;
    }
    let index = index.min(count - 1);
    start + (end - start) * index as f64 / (count - 1) as f64
}

/// Next stage for an arrow key, if it moves anywhere.
fn stage_after_key(key: &str, current: usize, count: usize) -> Option<usize> {
    match key {
        "ArrowLeft" if current > 0 => Some(current - 1),
        "ArrowRight" if current + 1 < count => Some(current + 1),
        _ => None,
    }
}

fn pinned_range(section: &NodeRef) -> Option<(f64, f64)> {
    let vh = viewport_height(&web_sys::window()?);
    measure_node(section).map(|b| (b.top, b.top + vh * PIN_LENGTH))
}

fn navigate_to_stage(controller: &ScrollController, section: &NodeRef, index: usize) {
    let Some((start, end)) = pinned_range(section) else {
        log::warn!("Roadmap range unavailable, cannot navigate to stage {}", index + 1);
        return;
    };
    let target = scroll_offset_for_stage(start, end, index, STAGES.len());
    controller.scroll_to(
        ScrollTarget::Pixels(target),
        ScrollToOptions {
            duration_secs: Some(NAVIGATION_SECS),
            ..Default::default()
        },
    );
}

#[function_component(Roadmap)]
pub fn roadmap() -> Html {
    let reduced_motion = use_reduced_motion();
    let desktop = use_is_desktop();
    let scroll = use_scroll();
    let fault = use_section_fault();
    let pinned = desktop && !reduced_motion;

    let current = use_state_eq(|| 0usize);
    let section_ref = use_node_ref();
    let progress_ref = use_node_ref();
    let list_ref = use_node_ref();
    let list_revealed = use_reveal_once(list_ref.clone(), REVEAL_AT, reduced_motion || desktop);

    {
        let section_ref = section_ref.clone();
        let progress_ref = progress_ref.clone();
        let current = current.clone();
        use_scroll_triggers(pinned, move |_, pinned| {
            set_node_style(&progress_ref, "");
            if !*pinned {
                return Vec::new();
            }
            if section_ref.get().is_none() {
                fault.report("roadmap section not mounted");
                return Vec::new();
            }
            let bounds = move || pinned_range(&section_ref);
            vec![ScrollTrigger::measured(bounds).scrub(1.0).on_update(move |p| {
                set_node_style(&progress_ref, &format!("transform: scaleX({:.4});", p));
                current.set(stage_for_progress(p, STAGES.len()));
            })]
        });
    }

    {
        let section_ref = section_ref.clone();
        let scroll = scroll.clone();
        use_effect_with_deps(
            move |(pinned, current)| {
                let current = *current;
                let listener = match (*pinned, scroll, web_sys::window()) {
                    (true, Some(controller), Some(window)) => {
                        let target: &EventTarget = window.as_ref();
                        EventListener::new(target, "keydown", true, move |event| {
                            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                                return;
                            };
                            let Some(section) = section_ref.cast::<web_sys::Element>() else {
                                return;
                            };
                            if !is_in_viewport(&section, KEYBOARD_VISIBILITY) {
                                return;
                            }
                            if let Some(next) = stage_after_key(&key, current, STAGES.len()) {
                                navigate_to_stage(&controller, &section_ref, next);
                            }
                        })
                    }
                    _ => None,
                };
                move || drop(listener)
            },
            (pinned, *current),
        );
    }

    let stage_click = |index: usize| {
        let scroll = scroll.clone();
        let section_ref = section_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let (true, Some(controller)) = (pinned, scroll.as_ref()) {
                navigate_to_stage(controller, &section_ref, index);
            }
        })
    };

    html! {
        <section
            ref={section_ref.clone()}
            id={section_ids::ROADMAP}
            class={classes!("roadmap", pinned.then_some("roadmap--pinned"))}
        >
            <div class="roadmap__pin">
                <div class="container">
                    <header class="section-header">
                        <h2>{"Дорожная карта программы"}</h2>
                        <p class="section-subtitle">{"8 недель трансформации: пошаговый путь к осознанной жизни"}</p>
                    </header>

                    <div class="roadmap__timeline">
                        <div class="roadmap__track" aria-hidden="true">
                            <div ref={progress_ref} class="roadmap__progress"></div>
                        </div>
                        <div class="roadmap__cards">
                            { for STAGES.iter().enumerate().map(|(i, stage)| {
                                let active = pinned && *current == i;
                                html! {
                                    <button
                                        key={i}
                                        class={classes!("stage-card", active.then_some("stage-card--active"))}
                                        aria-label={format!("Неделя {}: {}", i + 1, stage.title)}
                                        aria-current={active.then_some("step")}
                                        onclick={stage_click(i)}
                                    >
                                        <span class="stage-card__week">{ (i + 1).to_string() }</span>
                                        <h3>{ stage.title }</h3>
                                        <p>{ stage.description }</p>
                                    </button>
                                }
                            }) }
                        </div>
                        <div class="roadmap__dots">
                            { for (0..STAGES.len()).map(|i| html! {
                                <button
                                    key={i}
                                    class={classes!("roadmap__dot", (pinned && *current == i).then_some("roadmap__dot--active"))}
                                    aria-label={format!("Перейти к неделе {}", i + 1)}
                                    onclick={stage_click(i)}
                                />
                            }) }
                        </div>
                    </div>

                    <ol ref={list_ref} class={classes!("roadmap__list", list_revealed.then_some("is-revealed"))}>
                        { for STAGES.iter().enumerate().map(|(i, stage)| html! {
                            <li
                                key={i}
                                class="stage-row"
                                style={format!("transition-delay: {:.2}s;", i as f64 * CARD_STAGGER_SECS)}
                            >
                                <span class="stage-card__week">{ (i + 1).to_string() }</span>
                                <div>
                                    <h3>{ stage.title }</h3>
                                    <p>{ stage.description }</p>
                                </div>
                            </li>
                        }) }
                    </ol>
                </div>
            </div>
            <style>
                {r#"
                    .roadmap { padding: 5rem 0; background: var(--bg); }
                    .roadmap--pinned { padding: 0; height: calc(100vh + 200vh); }
                    .roadmap--pinned .roadmap__pin { position: sticky; top: 0; min-height: 100vh; padding: 6rem 0; }
                    .roadmap__timeline { display: none; position: relative; max-width: 72rem; margin: 0 auto; }
                    .roadmap__track { position: absolute; top: 5rem; left: 0; right: 0; height: 4px; background: rgba(255, 255, 255, 0.3); }
                    .roadmap__progress { height: 100%; background: var(--gold-primary); transform-origin: left; transform: scaleX(0); }
                    .roadmap__cards { display: flex; gap: 1.5rem; justify-content: space-between; }
                    .stage-card { flex: 1; min-width: 0; background: #fff; border: 0; border-radius: 0.5rem; padding: 1.5rem 1rem; box-shadow: var(--shadow-card); cursor: pointer; transition: transform 0.3s, box-shadow 0.3s; text-align: center; }
                    .stage-card--active { transform: scale(1.05); box-shadow: 0 0 0 2px var(--gold-primary), var(--shadow-gold); }
                    .stage-card__week { display: inline-flex; align-items: center; justify-content: center; width: 3rem; height: 3rem; border-radius: 9999px; background: var(--gold-light); color: var(--gold-text); font-family: var(--font-display); font-size: 1.125rem; margin-bottom: 1rem; transition: background 0.3s, color 0.3s; }
                    .stage-card--active .stage-card__week { background: var(--gold-primary); color: #fff; }
                    .stage-card h3, .stage-row h3 { font-family: var(--font-display); font-size: 1.25rem; margin-bottom: 0.75rem; }
                    .stage-card p, .stage-row p { color: var(--text-secondary); font-size: 0.875rem; line-height: 1.6; }
                    .roadmap__dots { display: flex; justify-content: space-between; margin-top: 2rem; }
                    .roadmap__dot { width: 0.75rem; height: 0.75rem; border-radius: 9999px; border: 0; background: rgba(255, 255, 255, 0.5); cursor: pointer; transition: transform 0.3s, background 0.3s; }
                    .roadmap__dot--active { background: var(--gold-primary); transform: scale(1.25); }
                    .roadmap__list { list-style: none; padding: 0; display: flex; flex-direction: column; gap: 1rem; }
                    .stage-row { display: flex; gap: 1rem; background: #fff; border-radius: 0.5rem; padding: 1.25rem; box-shadow: var(--shadow-card); opacity: 0; transform: translateY(30px); transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
                    .stage-row .stage-card__week { flex-shrink: 0; margin-bottom: 0; }
                    .is-revealed .stage-row { opacity: 1; transform: none; }
                    @media (min-width: 1024px) {
                        .roadmap__timeline { display: block; }
                        .roadmap__list { display: none; }
                    }
                "#}
            </style>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_progress() {
        assert_eq!(stage_for_progress(0.0, 8), 0);
        assert_eq!(stage_for_progress(0.124, 8), 0);
        assert_eq!(stage_for_progress(0.125, 8), 1);
        assert_eq!(stage_for_progress(0.5, 8), 4);
        assert_eq!(stage_for_progress(0.99, 8), 7);
    }

    #[test]
    fn full_progress_stays_on_last_stage() {
        assert_eq!(stage_for_progress(1.0, 8), 7);
        assert_eq!(stage_for_progress(1.5, 8), 7);
        assert_eq!(stage_for_progress(-0.2, 8), 0);
    }

    #[test]
    fn stage_offsets_span_the_pinned_range() {
        assert_eq!(scroll_offset_for_stage(1000.0, 2400.0, 0, 8), 1000.0);
        assert_eq!(scroll_offset_for_stage(1000.0, 2400.0, 7, 8), 2400.0);
        assert_eq!(scroll_offset_for_stage(1000.0, 2400.0, 2, 8), 1400.0);
        assert_eq!(scroll_offset_for_stage(1000.0, 2400.0, 12, 8), 2400.0);
        assert_eq!(scroll_offset_for_stage(1000.0, 2400.0, 3, 1), 1000.0);
    }

    #[test]
    fn arrow_keys_stop_at_the_ends() {
        assert_eq!(stage_after_key("ArrowLeft", 0, 8), None);
        assert_eq!(stage_after_key("ArrowLeft", 3, 8), Some(2));
        assert_eq!(stage_after_key("ArrowRight", 3, 8), Some(4));
        assert_eq!(stage_after_key("ArrowRight", 7, 8), None);
        assert_eq!(stage_after_key("Enter", 3, 8), None);
    }
}
