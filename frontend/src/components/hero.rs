use yew::prelude::*;

use crate::components::section_boundary::use_section_fault;
use crate::media::{use_is_desktop, use_is_mobile, use_reduced_motion};
use crate::scroll::controller::section_ids;
use crate::scroll::provider::{measure_node, scroll_to_section, set_node_style, use_scroll, use_scroll_triggers};
use crate::scroll::triggers::ScrollTrigger;

const TITLE: &str = "Спасибо, что выбрал себя.";
const TITLE_DELAY_SECS: f64 = 0.3;
const CHAR_STAGGER_SECS: f64 = 0.02;

/// Vertical drift of the photo and the brush stroke at full progress, in %.
const PHOTO_DRIFT: f64 = -15.0;
const STROKE_DRIFT: f64 = -25.0;

pub fn parallax_style(progress: f64, drift_percent: f64) -> String {
    format!("transform: translate3d(0, {:.3}%, 0);", drift_percent * progress)
}

fn char_delay(index: usize) -> String {
    format!("animation-delay: {:.2}s;", TITLE_DELAY_SECS + index as f64 * CHAR_STAGGER_SECS)
}

#[derive(Properties, PartialEq)]
pub struct HeroProps {
    /// Entrance animations start once the preloader is gone.
    pub revealed: bool,
}

#[function_component(Hero)]
pub fn hero(props: &HeroProps) -> Html {
    let reduced_motion = use_reduced_motion();
    let desktop = use_is_desktop();
    let mobile = use_is_mobile();
    let scroll = use_scroll();
    let fault = use_section_fault();

    let section_ref = use_node_ref();
    let photo_ref = use_node_ref();
    let stroke_ref = use_node_ref();

    {
        let section_ref = section_ref.clone();
        let photo_ref = photo_ref.clone();
        let stroke_ref = stroke_ref.clone();
        use_scroll_triggers((desktop, reduced_motion), move |_, (desktop, reduced_motion)| {
            set_node_style(&photo_ref, "");
            set_node_style(&stroke_ref, "");
            if !*desktop || *reduced_motion {
                return Vec::new();
            }
            if section_ref.get().is_none() {
                fault.report("hero section not mounted");
                return Vec::new();
            }

            // From the section top at the viewport top until its bottom leaves.
            let bounds = move || measure_node(&section_ref).map(|b| (b.top, b.top + b.height));
            vec![
                ScrollTrigger::measured(bounds.clone())
                    .scrub(1.0)
                    .on_update(move |p| set_node_style(&photo_ref, &parallax_style(p, PHOTO_DRIFT))),
                ScrollTrigger::measured(bounds)
                    .scrub(0.8)
                    .on_update(move |p| set_node_style(&stroke_ref, &parallax_style(p, STROKE_DRIFT))),
            ]
        });
    }

    let to_contact = {
        let scroll = scroll.clone();
        Callback::from(move |_: MouseEvent| scroll_to_section(scroll.as_ref(), section_ids::CONTACT))
    };
    let to_philosophy = Callback::from(move |_: MouseEvent| scroll_to_section(scroll.as_ref(), section_ids::PHILOSOPHY));

    // Small screens fade the title in as a whole.
    let title = if reduced_motion || mobile {
        html! { <span class="hero__title-whole">{ TITLE }</span> }
    } else {
        TITLE
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let glyph = if c == ' ' { '\u{00a0}' } else { c }.to_string();
                html! { <span class="hero__char" style={char_delay(i)}>{ glyph }</span> }
            })
            .collect::<Html>()
    };

    html! {
        <section
            ref={section_ref}
            id={section_ids::HERO}
            class={classes!("hero", props.revealed.then_some("hero--revealed"), reduced_motion.then_some("hero--static"))}
        >
            <div class="hero__grid">
                <div class="hero__content">
                    <p class="hero__eyebrow">{"Проект: Твоя новая реальность"}</p>
                    <h1 class="hero__title" aria-label={TITLE}>{ title }</h1>
                    <div class="hero__manifest">
                        <p>{"Ты выбрал быть Счастливым, Стабильным и в Благополучии."}</p>
                        <p>{"Ты привык быть сильным для всех. Привык держать удар. Но здесь тебе не нужно бороться. Выдыхай. Самое сложное позади."}</p>
                        <p>{"Главное решение уже принято. Ты перестал откладывать жизнь на потом. Всё остальное — это просто путь, и тебе не придется идти по нему в одиночку."}</p>
                        <p class="hero__accent">{"Теперь я рядом."}</p>
                    </div>
                    <button class="button button--large hero__cta" onclick={to_contact}>
                        {"Сделать первый шаг к себе"}
                    </button>
                    <p class="hero__signature">{"Твой Взрослый создал безопасность. Твой Ребенок готов жить."}</p>
                </div>
                <div class="hero__visual">
                    <div ref={stroke_ref} class="hero__stroke" aria-hidden="true">
                        <svg viewBox="0 0 600 120" preserveAspectRatio="none">
                            <path d="M10 80 C 120 20, 260 110, 380 60 S 560 30, 590 70" />
                        </svg>
                    </div>
                    <div ref={photo_ref} class="hero__photo">
                        <span>{"Фото автора"}</span>
                    </div>
                </div>
            </div>
            <button class="scroll-indicator" aria-label="Прокрутить вниз" onclick={to_philosophy}>
                <span class="scroll-indicator__line" aria-hidden="true"></span>
            </button>
            <style>
                {r#"
                    .hero { position: relative; min-height: 100vh; overflow: hidden; }
                    .hero__grid { display: grid; gap: 3rem; align-items: center; max-width: 1200px; margin: 0 auto; padding: 6rem 1.5rem; }
                    @media (min-width: 1024px) { .hero__grid { grid-template-columns: 1fr 1fr; gap: 5rem; padding: 10rem 2rem; } }
                    .hero__eyebrow { text-transform: uppercase; letter-spacing: 0.3em; color: var(--gold-text); font-size: 0.875rem; }
                    .hero__title { font-family: var(--font-display); font-size: clamp(2.75rem, 6vw, 4.5rem); line-height: 1.1; }
                    .hero__char { display: inline-block; opacity: 0; transform: translateY(40px); }
                    .hero--revealed .hero__char { animation: hero-char 0.6s cubic-bezier(0.22, 1, 0.36, 1) forwards; }
                    .hero__title-whole { display: inline-block; opacity: 0; }
                    .hero--revealed .hero__title-whole { animation: fade-up 0.8s 0.3s ease-out forwards; }
                    .hero--static .hero__title-whole { opacity: 1; animation: none; }
                    .hero__manifest, .hero__cta, .hero__signature { opacity: 0; }
                    .hero--revealed .hero__manifest { animation: fade-up 0.8s 0.7s ease-out forwards; }
                    .hero--revealed .hero__cta { animation: fade-up 0.6s 1.0s ease-out forwards; }
                    .hero--revealed .hero__signature { animation: fade-up 0.6s 1.2s ease-out forwards; }
                    .hero--static .hero__manifest, .hero--static .hero__cta, .hero--static .hero__signature { opacity: 1; animation: none; }
                    .hero__signature { font-family: var(--font-handwritten); font-style: italic; font-size: 1.75rem; margin-top: 3rem; }
                    .hero__visual { position: relative; }
                    .hero__stroke { position: absolute; left: -2.5rem; top: 50%; width: 120%; opacity: 0.3; pointer-events: none; will-change: transform; }
                    .hero__stroke path { fill: none; stroke: var(--gold-primary); stroke-width: 28; stroke-linecap: round; }
                    .hero__photo { position: relative; aspect-ratio: 3 / 4; max-width: 28rem; margin: 0 auto; border-radius: 0.5rem; background: var(--bg-muted); display: flex; align-items: center; justify-content: center; color: var(--text-muted); will-change: transform; }
                    .scroll-indicator { position: absolute; bottom: 2rem; left: 50%; transform: translateX(-50%); background: none; border: 0; cursor: pointer; padding: 0.5rem; }
                    .scroll-indicator__line { display: block; width: 2px; height: 3rem; background: var(--gold-primary); animation: indicator 2s ease-in-out infinite; }
                    .hero--static .scroll-indicator__line { animation: none; }
                    @keyframes hero-char { to { opacity: 1; transform: none; } }
                    @keyframes fade-up { from { opacity: 0; transform: translateY(20px); } to { opacity: 1; transform: none; } }
                    @keyframes indicator { 0%, 100% { transform: scaleY(0.4); transform-origin: top; } 50% { transform: scaleY(1); } }
                "#}
            </style>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallax_scales_drift_by_progress() {
        assert_eq!(parallax_style(0.0, PHOTO_DRIFT), "transform: translate3d(0, -0.000%, 0);");
        assert_eq!(parallax_style(1.0, PHOTO_DRIFT), "transform: translate3d(0, -15.000%, 0);");
        assert_eq!(parallax_style(0.5, STROKE_DRIFT), "transform: translate3d(0, -12.500%, 0);");
    }

    #[test]
    fn title_characters_stagger_after_initial_delay() {
        assert_eq!(char_delay(0), "animation-delay: 0.30s;");
        assert_eq!(char_delay(10), "animation-delay: 0.50s;");
    }
}
