use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

mod config;
mod lead;
mod media;
mod session;
mod scroll {
    pub mod frame_clock;
    pub mod smooth_scroll;
    pub mod triggers;
    pub mod controller;
    pub mod dom_host;
    pub mod provider;
}
mod components {
    pub mod section_boundary;
    pub mod preloader;
    pub mod hero;
    pub mod philosophy;
    pub mod transformation;
    pub mod diagnostic;
    pub mod roadmap;
    pub mod contact;
    pub mod footer;
    pub mod back_to_top;
}
mod pages {
    pub mod home;
    pub mod privacy;
}

use pages::{
    home::Home,
    privacy::PrivacyPolicy,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/privacy")]
    Privacy,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Privacy => {
            info!("Rendering Privacy page");
            html! { <PrivacyPolicy /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <main class="not-found">
                    <h1>{"Страница не найдена"}</h1>
                    <Link<Route> to={Route::Home} classes="button">
                        {"На главную"}
                    </Link<Route>>
                </main>
            }
        },
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(Level::Info) {
        gloo_console::error!(format!("error initializing log: {}", e));
    }

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
