use log::{info, Level};
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod intake {
    pub mod api;
    pub mod form_state;
    pub mod validation;
}
mod components {
    pub mod contact_form;
    pub mod progress_indicator;
    pub mod step_one;
    pub mod step_three;
    pub mod step_two;
}

use components::contact_form::ContactForm;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering contact page");
            html! {
                <section id="contact" class="contact-section">
                    <div class="contact-intro">
                        <h1>{"Let's talk about automating your business"}</h1>
                        <p>{"Tell us a little about your company and we'll get back to you with ideas."}</p>
                    </div>
                    <ContactForm />
                </section>
            }
        }
        Route::NotFound => html! {
            <div class="not-found">
                <h1>{"Page not found"}</h1>
                <Link<Route> to={Route::Home}>{"Back to the contact form"}</Link<Route>>
            </div>
        },
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <nav class="top-nav">
                <div class="nav-content">
                    <Link<Route> to={Route::Home} classes="nav-logo">
                        {"Purely Works"}
                    </Link<Route>>
                </div>
            </nav>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(Level::Info) {
        web_sys::console::error_1(&format!("error initializing log: {}", e).into());
    }

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
