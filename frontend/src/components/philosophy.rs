use yew::prelude::*;

use crate::media::use_reduced_motion;
use crate::scroll::controller::section_ids;
use crate::scroll::provider::use_reveal_once;

const REVEAL_AT: f64 = 0.8;
const CARD_STAGGER_SECS: f64 = 0.15;

struct Pillar {
    title: &'static str,
    subtitle: &'static str,
    description: &'static str,
}

const PILLARS: [Pillar; 4] = [
    Pillar {
        title: "КОМПАС",
        subtitle: "Задача Взрослого: Найти ответ на вопрос «Зачем?».",
        description: "Ребенок хочет играть, но ему важно знать правила игры. Мы найдем твой глубинный смысл. Когда Взрослый видит цель, Ребенок чувствует себя значимым и спокойным.",
    },
    Pillar {
        title: "ЗАЩИТА",
        subtitle: "Задача Взрослого: Построить безопасные стены.",
        description: "Счастье хрупко, если нет базы. Мы укрепим 5 сфер твоей жизни (модель PERMA): отношения, вовлеченность, эмоции. Взрослый создает структуру, в которой Ребенку не страшно проявляться.",
    },
    Pillar {
        title: "КОНТРОЛЬ",
        subtitle: "Задача Взрослого: Взять ответственность на себя.",
        description: "40% твоего счастья — это твои действия. Взрослый перестает винить обстоятельства и берет пульт управления в свои руки. Ребенок расслабляется, зная, что «руль» в надежных руках.",
    },
    Pillar {
        title: "ЗАБОТА",
        subtitle: "Задача Взрослого: Внедрять новое без насилия.",
        description: "Мы заменим жесткую дисциплину на бережные ритуалы. Взрослый не заставляет, а создает условия, в которых новые привычки становятся естественной игрой, а не тяжелой работой.",
    },
];

#[function_component(Philosophy)]
pub fn philosophy() -> Html {
    let reduced_motion = use_reduced_motion();
    let grid_ref = use_node_ref();
    let revealed = use_reveal_once(grid_ref.clone(), REVEAL_AT, reduced_motion);

    html! {
        <section id={section_ids::PHILOSOPHY} class="philosophy">
            <div class="container">
                <header class="section-header">
                    <h2>{"ПОЗВОЛЬ РЕБЕНКУ БЫТЬ СЧАСТЛИВЫМ. ПУСТЬ ВЗРОСЛЫЙ ВОЗЬМЕТ ЗА ЭТО ОТВЕТСТВЕННОСТЬ."}</h2>
                    <p class="section-subtitle">{"Счастье — это когда внутри тебя нет войны."}</p>
                </header>
                <div ref={grid_ref} class={classes!("philosophy__grid", revealed.then_some("is-revealed"))}>
                    { for PILLARS.iter().enumerate().map(|(i, pillar)| html! {
                        <article
                            class="pillar-card"
                            style={format!("transition-delay: {:.2}s;", i as f64 * CARD_STAGGER_SECS)}
                        >
                            <span class="pillar-card__index">{ format!("0{}", i + 1) }</span>
                            <h3>{ pillar.title }</h3>
                            <p class="pillar-card__subtitle">{ pillar.subtitle }</p>
                            <p>{ pillar.description }</p>
                        </article>
                    }) }
                </div>
            </div>
            <style>
                {r#"
                    .philosophy { padding: 8rem 0; background: var(--bg-muted); }
                    .philosophy__grid { display: grid; gap: 1.5rem; }
                    @media (min-width: 768px) { .philosophy__grid { grid-template-columns: repeat(2, 1fr); } }
                    @media (min-width: 1024px) { .philosophy__grid { grid-template-columns: repeat(4, 1fr); } }
                    .pillar-card { padding: 2rem; border-radius: 0.5rem; background: var(--bg); border: 1px solid var(--border); opacity: 0; transform: translateY(40px); transition: opacity 0.8s ease-out, transform 0.8s ease-out; }
                    .is-revealed .pillar-card { opacity: 1; transform: none; }
                    .pillar-card__index { font-family: var(--font-display); color: var(--gold-primary); font-size: 2rem; }
                    .pillar-card h3 { letter-spacing: 0.15em; margin: 1rem 0 0.25rem; }
                    .pillar-card__subtitle { color: var(--gold-text); font-size: 0.875rem; margin-bottom: 1rem; }
                "#}
            </style>
        </section>
    }
}
