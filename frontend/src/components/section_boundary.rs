use yew::prelude::*;

/// Lets a section report that it can no longer render properly.
#[derive(Clone, PartialEq)]
pub struct SectionFault(Callback<String>);

impl SectionFault {
    pub fn report(&self, reason: impl Into<String>) {
        self.0.emit(reason.into());
    }
}

/// Fault reporter of the nearest [`SectionBoundary`]; only logs when used
/// outside one.
#[hook]
pub fn use_section_fault() -> SectionFault {
    use_context::<SectionFault>().unwrap_or_else(|| {
        SectionFault(Callback::from(|reason: String| {
            log::error!("Section fault outside a boundary: {}", reason);
        }))
    })
}

#[derive(Properties, PartialEq)]
pub struct SectionBoundaryProps {
    pub name: &'static str,
    pub children: Children,
}

/// Isolates one page section: after a reported fault only this section is
/// replaced by a quiet placeholder.
#[function_component(SectionBoundary)]
pub fn section_boundary(props: &SectionBoundaryProps) -> Html {
    let failure = use_state(|| None::<String>);

    let fault = {
        let failure = failure.clone();
        let name = props.name;
        use_memo(
            move |_| {
                SectionFault(Callback::from(move |reason: String| {
                    log::error!("Section '{}' failed: {}", name, reason);
                    failure.set(Some(reason));
                }))
            },
            name,
        )
    };

    if failure.is_some() {
        return html! {
            <section class="section-fallback" data-section={props.name} aria-hidden="true"></section>
        };
    }

    html! {
        <ContextProvider<SectionFault> context={(*fault).clone()}>
            { for props.children.iter() }
        </ContextProvider<SectionFault>>
    }
}
