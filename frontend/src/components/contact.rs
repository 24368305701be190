use gloo_net::http::Request;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config;
use crate::lead::{ContactPayload, ContactReply, FieldErrors, FormStatus, LeadForm};
use crate::scroll::controller::section_ids;

struct MeetingPoint {
    title: &'static str,
    description: &'static str,
}

const MEETING_POINTS: [MeetingPoint; 3] = [
    MeetingPoint {
        title: "Сверим координаты",
        description: "Узнаю о ваших целях и текущей ситуации",
    },
    MeetingPoint {
        title: "Проверим химию",
        description: "Поймём, насколько комфортно нам работать вместе",
    },
    MeetingPoint {
        title: "Наметим первые шаги",
        description: "Составим план первых действий на пути к изменениям",
    },
];

async fn send_lead(payload: &ContactPayload) -> Result<ContactReply, gloo_net::Error> {
    // Error statuses carry the same JSON body, so the status code is not checked.
    Request::post(&config::contact_endpoint())
        .json(payload)?
        .send()
        .await?
        .json::<ContactReply>()
        .await
}

#[derive(Properties, PartialEq)]
struct FieldProps {
    id: &'static str,
    label: &'static str,
    error: Option<&'static str>,
    children: Children,
}

#[function_component(Field)]
fn field(props: &FieldProps) -> Html {
    html! {
        <div class={classes!("field", props.error.is_some().then_some("field--invalid"))}>
            <label for={props.id}>{ props.label }</label>
            { for props.children.iter() }
            if let Some(error) = props.error {
                <p class="field__error" id={format!("{}-error", props.id)} role="alert">{ error }</p>
            }
        </div>
    }
}

#[function_component(Contact)]
pub fn contact() -> Html {
    let form = use_state(LeadForm::default);
    let errors = use_state(FieldErrors::default);
    let status = use_state(|| FormStatus::Idle);

    let on_input = |apply: fn(&mut LeadForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            let value = e
                .target_dyn_into::<HtmlInputElement>()
                .map(|input| input.value())
                .or_else(|| e.target_dyn_into::<HtmlTextAreaElement>().map(|area| area.value()))
                .unwrap_or_default();
            apply(&mut next, value);
            form.set(next);
        })
    };

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let status = status.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if status.is_submitting() {
                return;
            }
            let payload = match form.validate() {
                Ok(payload) => payload,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::default());
            status.set(FormStatus::Submitting);

            let form = form.clone();
            let status = status.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let next = FormStatus::from_reply(send_lead(&payload).await);
                if next == FormStatus::Success {
                    log::info!("Contact request delivered");
                    form.set(LeadForm::default());
                }
                status.set(next);
            });
        })
    };

    let submitting = status.is_submitting();
    let described_by = |error: Option<&'static str>, id: &str| error.map(|_| format!("{}-error", id));

    html! {
        <section id={section_ids::CONTACT} class="contact" aria-labelledby="contact-heading">
            <div class="container contact__grid">
                <div>
                    <h2 id="contact-heading">{"Начните путь"}</h2>
                    <p class="contact__lead">{"Оставьте заявку, и я свяжусь с вами для бесплатной диагностической встречи"}</p>

                    if *status == FormStatus::Success {
                        <div class="contact__success">
                            <div class="contact__check" aria-hidden="true">{"✓"}</div>
                            <h3>{"Заявка отправлена!"}</h3>
                            <p>{"Я свяжусь с вами в ближайшее время"}</p>
                            <a class="button button--large button--block" href={config::booking_url()} target="_blank" rel="noopener noreferrer">
                                {"Записаться на встречу"}
                            </a>
                            <p class="contact__alt">
                                {"Или напишите в "}
                                <a href={config::telegram_url()} target="_blank" rel="noopener noreferrer">{"Telegram"}</a>
                            </p>
                        </div>
                    } else {
                        <form class="contact__form" {onsubmit} novalidate={true}>
                            <input
                                type="text"
                                name="website"
                                class="honeypot"
                                tabindex="-1"
                                autocomplete="off"
                                aria-hidden="true"
                                value={form.website.clone()}
                                oninput={on_input(|f, v| f.website = v)}
                            />
                            <Field id="name" label="Ваше имя" error={errors.name}>
                                <input
                                    id="name"
                                    type="text"
                                    autocomplete="name"
                                    disabled={submitting}
                                    value={form.name.clone()}
                                    aria-invalid={errors.name.is_some().to_string()}
                                    aria-describedby={described_by(errors.name, "name")}
                                    oninput={on_input(|f, v| f.name = v)}
                                />
                            </Field>
                            <Field id="contact-field" label="Телефон или Telegram" error={errors.contact}>
                                <input
                                    id="contact-field"
                                    type="text"
                                    autocomplete="tel"
                                    disabled={submitting}
                                    value={form.contact.clone()}
                                    aria-invalid={errors.contact.is_some().to_string()}
                                    aria-describedby={described_by(errors.contact, "contact-field")}
                                    oninput={on_input(|f, v| f.contact = v)}
                                />
                            </Field>
                            <Field id="message" label="Сообщение (необязательно)" error={errors.message}>
                                <textarea
                                    id="message"
                                    rows="4"
                                    data-lenis-prevent="true"
                                    disabled={submitting}
                                    value={form.message.clone()}
                                    aria-invalid={errors.message.is_some().to_string()}
                                    aria-describedby={described_by(errors.message, "message")}
                                    oninput={on_input(|f, v| f.message = v)}
                                />
                            </Field>
                            if let FormStatus::Error(message) = &*status {
                                <div class="contact__error" role="alert">
                                    <p>{ message.clone() }</p>
                                </div>
                            }
                            <button type="submit" class="button button--large button--block" disabled={submitting} aria-busy={submitting.to_string()}>
                                if submitting {
                                    <span class="spinner" aria-hidden="true"></span>
                                }
                                {"Оставить заявку"}
                            </button>
                        </form>
                    }
                </div>

                <div class="contact__meeting">
                    <h3>{"Что будет на встрече"}</h3>
                    <ol>
                        { for MEETING_POINTS.iter().enumerate().map(|(i, point)| html! {
                            <li key={i}>
                                <span class="contact__badge" aria-hidden="true">{ (i + 1).to_string() }</span>
                                <div>
                                    <h4>{ point.title }</h4>
                                    <p>{ point.description }</p>
                                </div>
                            </li>
                        }) }
                    </ol>
                </div>
            </div>
            <style>
                {r#"
                    .contact { padding: 8rem 0; background: var(--bg-muted); }
                    .contact__grid { display: grid; gap: 3rem; }
                    @media (min-width: 1024px) { .contact__grid { grid-template-columns: 1fr 1fr; gap: 5rem; } .contact__meeting { padding-top: 4rem; } }
                    .contact h2 { font-family: var(--font-display); font-size: clamp(2.25rem, 4vw, 3rem); margin-bottom: 1rem; }
                    .contact__lead { color: var(--text-secondary); max-width: 28rem; margin-bottom: 2rem; }
                    .contact__form { display: flex; flex-direction: column; gap: 1.5rem; }
                    .honeypot { position: absolute; left: -10000px; width: 1px; height: 1px; opacity: 0; }
                    .field label { display: block; font-weight: 500; margin-bottom: 0.5rem; }
                    .field input, .field textarea { width: 100%; padding: 0.875rem 1rem; border: 1px solid var(--border); border-radius: 0.375rem; background: #fff; font: inherit; }
                    .field input:focus, .field textarea:focus { outline: none; border-color: var(--gold-primary); box-shadow: 0 0 0 3px var(--gold-light); }
                    .field--invalid input, .field--invalid textarea { border-color: var(--error); }
                    .field__error { color: var(--error); font-size: 0.875rem; margin-top: 0.375rem; }
                    .contact__error { padding: 1rem; border-radius: 0.375rem; background: rgba(220, 38, 38, 0.08); border: 1px solid rgba(220, 38, 38, 0.2); color: var(--error); font-size: 0.875rem; font-weight: 500; }
                    .contact__success { background: #fff; border-radius: 0.5rem; padding: 2rem; box-shadow: var(--shadow-card); text-align: center; animation: fade-up 0.3s ease-out both; }
                    .contact__check { width: 4rem; height: 4rem; margin: 0 auto 1rem; border-radius: 9999px; background: rgba(22, 163, 74, 0.1); color: var(--success); display: flex; align-items: center; justify-content: center; font-size: 2rem; }
                    .contact__success h3 { font-family: var(--font-display); font-size: 1.5rem; margin-bottom: 0.5rem; }
                    .contact__success > p { color: var(--text-secondary); margin-bottom: 1.5rem; }
                    .contact__alt { margin-top: 0.75rem; font-size: 0.875rem; color: var(--text-muted); }
                    .contact__alt a { color: var(--gold-text); }
                    .contact__meeting h3 { font-family: var(--font-display); font-size: 1.5rem; margin-bottom: 1.5rem; }
                    .contact__meeting ol { list-style: none; padding: 0; display: flex; flex-direction: column; gap: 1.5rem; }
                    .contact__meeting li { display: flex; gap: 1rem; }
                    .contact__badge { flex-shrink: 0; width: 2.5rem; height: 2.5rem; border-radius: 9999px; background: var(--gold-light); color: var(--gold-text); display: flex; align-items: center; justify-content: center; font-family: var(--font-display); font-weight: 700; }
                    .contact__meeting h4 { font-weight: 600; margin-bottom: 0.25rem; }
                    .contact__meeting p { color: var(--text-secondary); font-size: 0.875rem; }
                    .spinner { display: inline-block; width: 1rem; height: 1rem; margin-right: 0.5rem; border: 2px solid currentColor; border-right-color: transparent; border-radius: 9999px; animation: spin 0.8s linear infinite; vertical-align: -0.125rem; }
                    @keyframes spin { to { transform: rotate(360deg); } }
                "#}
            </style>
        </section>
    }
}
