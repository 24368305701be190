use yew::prelude::*;

use crate::scroll::controller::section_ids;
use crate::scroll::provider::{scroll_to_section, use_scroll};

pub struct Signal {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const SIGNALS: [Signal; 5] = [
    Signal {
        id: "success-no-joy",
        title: "Успех есть, а радости нет",
        description: "Вы достигли многого, но это не приносит удовлетворения. Каждая цель кажется промежуточной, а радость от побед быстро улетучивается.",
    },
    Signal {
        id: "rest-no-restore",
        title: "Отдых не восстанавливает",
        description: "Даже после отпуска вы чувствуете себя разбитым. Выходные пролетают незаметно, а утро понедельника встречает усталостью.",
    },
    Signal {
        id: "impostor",
        title: "Чувствую себя самозванцем",
        description: "Несмотря на достижения, вы сомневаетесь в своей компетентности и боитесь разоблачения. Успех кажется случайностью.",
    },
    Signal {
        id: "disconnected",
        title: "Близкие стали чужими",
        description: "Вы физически присутствуете, но эмоционально отстранены от семьи и друзей. Разговоры кажутся поверхностными, а связь — утраченной.",
    },
    Signal {
        id: "lost-zest",
        title: "Потерял вкус к жизни",
        description: "То, что раньше вдохновляло, теперь кажется пустым. Жизнь превратилась в монотонную рутину, а будущее не вызывает энтузиазма.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Worth,
    Serious,
}

impl Verdict {
    pub fn for_count(selected: usize) -> Option<Self> {
        match selected {
            0 | 1 => None,
            2 | 3 => Some(Verdict::Worth),
            _ => Some(Verdict::Serious),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Worth => "Если откликнулось хотя бы два пункта — это повод задуматься.",
            Verdict::Serious => "Это серьёзный сигнал. Пора действовать.",
        }
    }
}

/// Signal ids in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection(Vec<&'static str>);

impl Selection {
    pub fn toggle(&self, id: &'static str) -> Self {
        let mut ids = self.0.clone();
        match ids.iter().position(|s| *s == id) {
            Some(i) => {
                ids.remove(i);
            }
            None => ids.push(id),
        }
        Selection(ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| *s == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        Verdict::for_count(self.len())
    }
}

#[function_component(Diagnostic)]
pub fn diagnostic() -> Html {
    let selection = use_state(Selection::default);
    let scroll = use_scroll();

    let to_contact = Callback::from(move |_: MouseEvent| scroll_to_section(scroll.as_ref(), section_ids::CONTACT));

    html! {
        <section id={section_ids::DIAGNOSTIC} class="diagnostic">
            <div class="container">
                <header class="section-header">
                    <h2>{"Узнаёте себя?"}</h2>
                    <p class="section-subtitle">{"Выберите то, что откликается. Это первый шаг к изменениям."}</p>
                </header>
                <div class="diagnostic__toggles" role="group">
                    { for SIGNALS.iter().map(|signal| {
                        let pressed = selection.contains(signal.id);
                        let onclick = {
                            let selection = selection.clone();
                            let id = signal.id;
                            Callback::from(move |_: MouseEvent| selection.set(selection.toggle(id)))
                        };
                        html! {
                            <button
                                key={signal.id}
                                class={classes!("toggle", pressed.then_some("toggle--on"))}
                                aria-pressed={pressed.to_string()}
                                {onclick}
                            >
                                { signal.title }
                            </button>
                        }
                    }) }
                </div>
                if !selection.is_empty() {
                    <div class="diagnostic__details">
                        { for SIGNALS.iter().filter(|s| selection.contains(s.id)).enumerate().map(|(i, signal)| html! {
                            <div
                                key={signal.id}
                                class="signal-card"
                                style={format!("animation-delay: {:.2}s;", i as f64 * 0.05)}
                            >
                                <h4>{ signal.title }</h4>
                                <p>{ signal.description }</p>
                            </div>
                        }) }
                        if let Some(verdict) = selection.verdict() {
                            <div class="diagnostic__verdict">
                                <p class={classes!(matches!(verdict, Verdict::Serious).then_some("diagnostic__verdict--serious"))}>
                                    { verdict.message() }
                                </p>
                                <button class="button" onclick={to_contact}>
                                    {"Записаться на диагностику"}
                                </button>
                            </div>
                        }
                    </div>
                }
            </div>
            <style>
                {r#"
                    .diagnostic { padding: 8rem 0; background: var(--bg); }
                    .diagnostic__toggles { display: flex; flex-wrap: wrap; justify-content: center; gap: 0.75rem; margin: 0 auto 2rem; max-width: 56rem; }
                    .toggle { min-height: 44px; padding: 0.5rem 1.25rem; border-radius: 9999px; border: 1px solid var(--border); background: #fff; color: var(--text-primary); cursor: pointer; transition: background 0.25s, color 0.25s, border-color 0.25s; }
                    .toggle--on { background: var(--gold-primary); border-color: var(--gold-primary); color: #fff; }
                    .diagnostic__details { max-width: 56rem; margin: 0 auto; display: flex; flex-direction: column; gap: 1rem; }
                    .signal-card { background: #fff; border-left: 4px solid var(--gold-primary); border-radius: 0.5rem; padding: 1.5rem; box-shadow: var(--shadow-card); animation: slide-in 0.3s ease-out both; }
                    .signal-card h4 { font-family: var(--font-display); font-size: 1.25rem; margin-bottom: 0.5rem; }
                    .diagnostic__verdict { text-align: center; padding-top: 1.5rem; margin-top: 1rem; border-top: 1px solid var(--bg-muted); }
                    .diagnostic__verdict p { color: var(--gold-text); font-weight: 500; margin-bottom: 1rem; }
                    .diagnostic__verdict p.diagnostic__verdict--serious { color: var(--error); font-size: 1.125rem; }
                    @keyframes slide-in { from { opacity: 0; transform: translateX(-20px); } to { opacity: 1; transform: none; } }
                    @media (prefers-reduced-motion: reduce) { .signal-card { animation: none; } }
                "#}
            </style>
        </section>
    }
}
