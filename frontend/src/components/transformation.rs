use yew::prelude::*;

use crate::components::section_boundary::use_section_fault;
use crate::media::{use_is_desktop, use_reduced_motion};
use crate::scroll::controller::section_ids;
use crate::scroll::dom_host::viewport_height;
use crate::scroll::provider::{measure_node, set_node_style, use_scroll_triggers};
use crate::scroll::triggers::ScrollTrigger;

/// Length of the pinned stretch, as a multiple of the viewport height.
const PIN_LENGTH: f64 = 1.5;

struct Change {
    area: &'static str,
    after_area: &'static str,
    before: &'static str,
    after: &'static str,
}

const CHANGES: [Change; 3] = [
    Change {
        area: "СЕМЬЯ",
        after_area: "СЕМЬЯ",
        before: "Ранняя смерть матери. Нестабильная, токсичная мачеха. Отсутствие защиты и одиночество в родном доме.",
        after: "Полное отсутствие общения с токсичными людьми. Выстроенные, теплые отношения с отцом. Семья стала местом силы, а не полем битвы.",
    },
    Change {
        area: "ОТНОШЕНИЯ",
        after_area: "ОТНОШЕНИЯ",
        before: "Коллекция фраз, убивающих самооценку («Ты слишком хорошая», «Давай останемся друзьями»). Эмоциональные качели и зависимость.",
        after: "Выбор партнеров из позиции силы. Счастье — это мой внутренний навык, который больше не зависит от наличия кого-то рядом.",
    },
    Change {
        area: "БИЗНЕС",
        after_area: "ДЕЛО ЖИЗНИ",
        before: "Кассовые разрывы, долги, проблемы с налогами. Предательство бизнес-партнера. Рост через надрыв и кризисы.",
        after: "Самый сложный продукт на рынке залогового кредитования. Продано > 100 франшиз. Поток клиентов > 3500 в месяц. Рост через систему и спокойствие.",
    },
];

/// Inline styles for the before column, the after column and the progress
/// bar at scrubbed progress `p`.
#[derive(Debug, PartialEq)]
pub struct TransformationStyles {
    pub before: String,
    pub after: String,
    pub progress: String,
}

pub fn transformation_styles(p: f64) -> TransformationStyles {
    let p = p.clamp(0.0, 1.0);
    TransformationStyles {
        before: format!("filter: blur({:.2}px); opacity: {:.3};", 4.0 * p, 1.0 - 0.5 * p),
        after: format!("transform: scale({:.4});", 1.0 + 0.02 * p),
        progress: format!("transform: scaleY({:.4});", p),
    }
}

#[function_component(Transformation)]
pub fn transformation() -> Html {
    let reduced_motion = use_reduced_motion();
    let desktop = use_is_desktop();
    let fault = use_section_fault();
    let animated = desktop && !reduced_motion;

    let section_ref = use_node_ref();
    let before_ref = use_node_ref();
    let after_ref = use_node_ref();
    let progress_ref = use_node_ref();

    {
        let section_ref = section_ref.clone();
        let before_ref = before_ref.clone();
        let after_ref = after_ref.clone();
        let progress_ref = progress_ref.clone();
        use_scroll_triggers(animated, move |_, animated| {
            for node in [&before_ref, &after_ref, &progress_ref] {
                set_node_style(node, "");
            }
            if !*animated {
                return Vec::new();
            }
            let apply = move |p: f64| {
                let styles = transformation_styles(p);
                set_node_style(&before_ref, &styles.before);
                set_node_style(&after_ref, &styles.after);
                set_node_style(&progress_ref, &styles.progress);
            };
            if section_ref.get().is_none() {
                fault.report("transformation section not mounted");
                return Vec::new();
            }
            let bounds = move || {
                let vh = viewport_height(&web_sys::window()?);
                measure_node(&section_ref).map(|b| (b.top, b.top + vh * PIN_LENGTH))
            };
            vec![ScrollTrigger::measured(bounds).scrub(1.0).on_update(apply)]
        });
    }

    html! {
        <section
            ref={section_ref}
            id={section_ids::TRANSFORMATION}
            class={classes!("transformation", animated.then_some("transformation--pinned"))}
        >
            <div class="transformation__pin">
                <div class="container">
                    <header class="section-header">
                        <h2>{"Я потратила годы, чтобы перестать «бороться» с жизнью. И начать ею наслаждаться."}</h2>
                        <p class="section-subtitle">
                            {"Всё, что есть в этом проекте — это мой личный путь от тяжелых травм и бизнес-войн к состоянию абсолютной устойчивости."}
                        </p>
                    </header>
                    <div class="transformation__table">
                        <div class="transformation__rail" aria-hidden="true">
                            <div ref={progress_ref} class="transformation__progress"></div>
                        </div>
                        <div class="transformation__headers">
                            <span class="transformation__label">{"Было"}</span>
                            <span class="transformation__label transformation__label--after">{"Стало"}</span>
                        </div>
                        <div class="transformation__columns">
                            <div ref={before_ref} class="transformation__column">
                                { for CHANGES.iter().map(|c| html! {
                                    <div class="change-card change-card--before">
                                        <h3>{ c.area }</h3>
                                        <p>{ c.before }</p>
                                    </div>
                                }) }
                            </div>
                            <div ref={after_ref} class="transformation__column">
                                { for CHANGES.iter().map(|c| html! {
                                    <div class="change-card change-card--after">
                                        <h3>{ c.after_area }</h3>
                                        <p>{ c.after }</p>
                                    </div>
                                }) }
                            </div>
                        </div>
                        <blockquote class="transformation__quote">
                            {"«Больше нет необходимости падать на дно, чтобы совершить прорыв. Рост идет через стабильность, а не через кризис»."}
                        </blockquote>
                        <p class="transformation__footer">
                            {"Я смогла изменить свой подход. Значит, сможешь и ты. Я здесь, чтобы сократить твой путь."}
                        </p>
                    </div>
                </div>
            </div>
            <style>
                {r#"
                    .transformation { background: var(--bg-muted); padding: 5rem 0; }
                    .transformation--pinned { padding: 0; height: calc(100vh + 150vh); }
                    .transformation--pinned .transformation__pin { position: sticky; top: 0; min-height: 100vh; padding: 6rem 0; }
                    .transformation__table { position: relative; max-width: 64rem; margin: 0 auto; }
                    .transformation__rail { display: none; position: absolute; left: 50%; top: 0; width: 4px; height: 100%; transform: translateX(-50%); background: rgba(255, 255, 255, 0.3); }
                    .transformation__progress { height: 100%; background: var(--gold-primary); transform-origin: top; transform: scaleY(0); }
                    .transformation__headers, .transformation__columns { display: grid; gap: 1rem; }
                    .transformation__headers { margin-bottom: 2rem; text-align: center; }
                    .transformation__label { font-family: var(--font-display); font-size: 1.5rem; color: var(--text-muted); }
                    .transformation__label--after { color: var(--gold-text); }
                    .transformation__column { display: flex; flex-direction: column; gap: 1rem; will-change: filter, opacity, transform; }
                    .change-card { border-radius: 0.5rem; padding: 1.5rem; text-align: center; }
                    .change-card h3 { font-family: var(--font-display); text-transform: uppercase; margin-bottom: 0.75rem; }
                    .change-card--before { background: rgba(255, 255, 255, 0.5); color: var(--text-secondary); }
                    .change-card--before h3 { color: var(--text-muted); }
                    .change-card--after { background: #fff; box-shadow: var(--shadow-card); font-weight: 500; }
                    .change-card--after h3 { color: var(--gold-text); }
                    @media (min-width: 1024px) {
                        .transformation__rail { display: block; }
                        .transformation__headers, .transformation__columns { grid-template-columns: 1fr 1fr; gap: 3rem; }
                        .transformation__headers span:first-child, .change-card--before { text-align: right; }
                        .transformation__label--after, .change-card--after { text-align: left; }
                    }
                    .transformation__quote { margin: 4rem auto 0; max-width: 56rem; text-align: center; font-family: var(--font-display); font-style: italic; font-size: clamp(1.5rem, 3vw, 2.25rem); line-height: 1.5; }
                    .transformation__footer { margin: 3rem auto 0; max-width: 42rem; text-align: center; color: var(--text-secondary); font-size: 1.125rem; }
                "#}
            </style>
        </section>
    }
}
