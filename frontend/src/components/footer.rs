use chrono::Datelike;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::config;
use crate::Route;

pub fn copyright_line(year: i32) -> String {
    format!("© {} Happiness. Все права защищены.", year)
}

#[function_component(Footer)]
pub fn footer() -> Html {
    let year = chrono::Local::now().year();

    html! {
        <footer class="site-footer" aria-labelledby="footer-heading">
            <span id="footer-heading" class="sr-only">{"Подвал сайта"}</span>
            <div class="container">
                <div class="site-footer__top">
                    <span class="site-footer__logo">{"Happiness"}</span>
                    <a
                        class="site-footer__telegram"
                        href={config::telegram_url()}
                        target="_blank"
                        rel="noopener noreferrer"
                        aria-label="Написать в Telegram"
                    >
                        <svg viewBox="0 0 24 24" width="20" height="20" aria-hidden="true">
                            <path d="M21 4L3 11l6 2 2 6 3-4 4 3 3-14z" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linejoin="round" />
                        </svg>
                        <span>{"Написать в Telegram"}</span>
                    </a>
                </div>
                <hr aria-hidden="true" />
                <div class="site-footer__bottom">
                    <p>{ copyright_line(year) }</p>
                    <Link<Route> to={Route::Privacy} classes="site-footer__link">
                        {"Политика конфиденциальности"}
                    </Link<Route>>
                </div>
            </div>
            <style>
                {r#"
                    .site-footer { background: var(--bg-dark); color: #fff; padding: 3rem 0; }
                    @media (min-width: 768px) { .site-footer { padding: 4rem 0; } }
                    .site-footer__top, .site-footer__bottom { display: flex; flex-direction: column; gap: 1.5rem; }
                    @media (min-width: 640px) { .site-footer__top, .site-footer__bottom { flex-direction: row; align-items: center; justify-content: space-between; } }
                    .site-footer__logo { font-family: var(--font-display); font-size: 1.75rem; }
                    .site-footer__telegram { display: inline-flex; align-items: center; gap: 0.5rem; color: #fff; text-decoration: none; transition: color 0.3s; }
                    .site-footer__telegram:hover, .site-footer__link:hover { color: var(--gold-primary); }
                    .site-footer hr { border: 0; border-top: 1px solid rgba(255, 255, 255, 0.1); margin: 2rem 0; }
                    .site-footer__bottom p, .site-footer__link { color: rgba(255, 255, 255, 0.7); font-size: 0.875rem; }
                "#}
            </style>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copyright_carries_the_year() {
        assert_eq!(copyright_line(2026), "© 2026 Happiness. Все права защищены.");
    }
}
