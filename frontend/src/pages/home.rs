use yew::prelude::*;

use crate::components::back_to_top::BackToTop;
use crate::components::contact::Contact;
use crate::components::diagnostic::Diagnostic;
use crate::components::footer::Footer;
use crate::components::hero::Hero;
use crate::components::philosophy::Philosophy;
use crate::components::preloader::Preloader;
use crate::components::roadmap::Roadmap;
use crate::components::section_boundary::SectionBoundary;
use crate::components::transformation::Transformation;
use crate::scroll::provider::SmoothScrollProvider;
use crate::session::{InitialLoad, PreloaderGate, SessionStorage};

#[function_component(Home)]
pub fn home() -> Html {
    // Read once per mount; a later write must not hide a running preloader.
    let loading = use_state(|| PreloaderGate::from_config().should_show(&InitialLoad::new(SessionStorage)));

    let on_complete = {
        let loading = loading.clone();
        Callback::from(move |_| {
            InitialLoad::new(SessionStorage).mark_loaded();
            loading.set(false);
        })
    };

    html! {
        <SmoothScrollProvider>
            if *loading {
                <Preloader {on_complete} />
            }
            <main id="main-content">
                <SectionBoundary name="hero">
                    <Hero revealed={!*loading} />
                </SectionBoundary>
                <SectionBoundary name="philosophy">
                    <Philosophy />
                </SectionBoundary>
                <SectionBoundary name="transformation">
                    <Transformation />
                </SectionBoundary>
                <SectionBoundary name="diagnostic">
                    <Diagnostic />
                </SectionBoundary>
                <SectionBoundary name="roadmap">
                    <Roadmap />
                </SectionBoundary>
                <SectionBoundary name="contact">
                    <Contact />
                </SectionBoundary>
            </main>
            <Footer />
            <BackToTop />
        </SmoothScrollProvider>
    }
}
