use yew::prelude::*;
use yew_router::prelude::*;

use crate::config;
use crate::Route;

#[function_component(PrivacyPolicy)]
pub fn privacy_policy() -> Html {
    use_effect_with_deps(
        |_| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
                if let Some(document) = window.document() {
                    document.set_title("Политика конфиденциальности | Happiness");
                }
            }
            || ()
        },
        (),
    );

    html! {
        <main class="legal-content">
            <div class="legal-content__inner">
                <Link<Route> to={Route::Home} classes="legal-content__back">
                    <span aria-hidden="true">{"←"}</span>
                    <span>{"На главную"}</span>
                </Link<Route>>

                <h1>{"Политика конфиденциальности"}</h1>
                <p class="legal-content__updated">{"Последнее обновление: 1 января 2024 г."}</p>

                <section>
                    <h2>{"1. Общие положения"}</h2>
                    <p>{"Настоящая Политика конфиденциальности (далее — Политика) определяет порядок обработки и защиты персональных данных пользователей сайта happiness.example.com (далее — Сайт)."}</p>
                    <p>{"Использование Сайта означает безоговорочное согласие пользователя с настоящей Политикой и указанными в ней условиями обработки его персональных данных."}</p>
                </section>

                <section>
                    <h2>{"2. Персональные данные"}</h2>
                    <p>{"Под персональными данными понимается следующая информация:"}</p>
                    <ul>
                        <li>{"Имя пользователя"}</li>
                        <li>{"Контактные данные (телефон, email, Telegram)"}</li>
                        <li>{"Содержание сообщений, отправленных через формы на Сайте"}</li>
                        <li>{"Технические данные (IP-адрес, cookies, данные браузера)"}</li>
                    </ul>
                </section>

                <section>
                    <h2>{"3. Цели сбора данных"}</h2>
                    <p>{"Персональные данные собираются для следующих целей:"}</p>
                    <ul>
                        <li>{"Обработка заявок и обращений пользователей"}</li>
                        <li>{"Связь с пользователями по вопросам оказания услуг"}</li>
                        <li>{"Улучшение качества Сайта и предоставляемых услуг"}</li>
                        <li>{"Соблюдение требований законодательства РФ"}</li>
                    </ul>
                </section>

                <section>
                    <h2>{"4. Обработка данных"}</h2>
                    <p>{"Обработка персональных данных осуществляется в соответствии с Федеральным законом от 27.07.2006 N 152-ФЗ «О персональных данных»."}</p>
                    <p>{"Оператор принимает необходимые организационные и технические меры для защиты персональных данных от неправомерного или случайного доступа, уничтожения, изменения, блокирования, копирования, распространения."}</p>
                </section>

                <section>
                    <h2>{"5. Передача данных третьим лицам"}</h2>
                    <p>{"Персональные данные пользователей не передаются третьим лицам, за исключением следующих случаев:"}</p>
                    <ul>
                        <li>{"Пользователь выразил согласие на передачу данных"}</li>
                        <li>{"Передача предусмотрена законодательством РФ"}</li>
                        <li>{"Передача необходима для оказания услуг пользователю (например, уведомления через Telegram)"}</li>
                    </ul>
                </section>

                <section>
                    <h2>{"6. Права пользователя"}</h2>
                    <p>{"Пользователь имеет право:"}</p>
                    <ul>
                        <li>{"Получить информацию о своих персональных данных"}</li>
                        <li>{"Требовать уточнения, блокирования или уничтожения данных"}</li>
                        <li>{"Отозвать согласие на обработку персональных данных"}</li>
                        <li>{"Обжаловать действия оператора в Роскомнадзоре"}</li>
                    </ul>
                </section>

                <section>
                    <h2>{"7. Cookies"}</h2>
                    <p>{"Сайт использует cookies для улучшения пользовательского опыта. Cookies — это небольшие текстовые файлы, которые сохраняются на устройстве пользователя."}</p>
                    <p>{"Пользователь может отключить cookies в настройках браузера, однако это может повлиять на функциональность Сайта."}</p>
                </section>

                <section>
                    <h2>{"8. Контактная информация"}</h2>
                    <p>
                        {"По вопросам, связанным с обработкой персональных данных, вы можете обратиться через "}
                        <a href={config::telegram_url()} target="_blank" rel="noopener noreferrer">{"Telegram"}</a>
                        {"."}
                    </p>
                </section>

                <section>
                    <h2>{"9. Изменения Политики"}</h2>
                    <p>{"Оператор вправе вносить изменения в настоящую Политику. Актуальная версия Политики всегда доступна на данной странице."}</p>
                    <p>{"Продолжение использования Сайта после внесения изменений означает согласие пользователя с новой редакцией Политики."}</p>
                </section>

                <div class="legal-content__footer">
                    <Link<Route> to={Route::Home} classes="legal-content__back">
                        <span aria-hidden="true">{"←"}</span>
                        <span>{"Вернуться на главную"}</span>
                    </Link<Route>>
                </div>
            </div>
            <style>
                {r#"
                    .legal-content { min-height: 100vh; background: var(--bg); padding: 5rem 1rem; }
                    .legal-content__inner { max-width: 48rem; margin: 0 auto; color: var(--text-secondary); line-height: 1.7; }
                    .legal-content h1 { font-family: var(--font-display); font-size: clamp(2.25rem, 5vw, 3rem); color: var(--text-primary); margin-bottom: 2rem; }
                    .legal-content h2 { font-family: var(--font-display); font-size: 1.5rem; color: var(--text-primary); margin: 2rem 0 1rem; }
                    .legal-content p { margin-bottom: 1rem; }
                    .legal-content ul { list-style: disc inside; margin-left: 1rem; }
                    .legal-content li { margin-bottom: 0.5rem; }
                    .legal-content a { color: var(--gold-text); }
                    .legal-content__updated { font-size: 0.875rem; color: var(--text-muted); }
                    .legal-content__back { display: inline-flex; align-items: center; gap: 0.5rem; margin-bottom: 2rem; text-decoration: none; }
                    .legal-content__back:hover { color: var(--gold-primary); }
                    .legal-content__footer { margin-top: 4rem; padding-top: 2rem; border-top: 1px solid var(--bg-muted); }
                "#}
            </style>
        </main>
    }
}
