use log::{error, info};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::progress_indicator::ProgressIndicator;
use crate::components::step_one::StepOne;
use crate::components::step_three::StepThree;
use crate::components::step_two::StepTwo;
use crate::intake::api;
use crate::intake::form_state::{DetailsRequest, FormState};

const NO_SESSION: &str = "The form is not ready yet. Please refresh the page.";

#[function_component(ContactForm)]
pub fn contact_form() -> Html {
    let form = use_state(FormState::default);

    // One session per page load
    {
        let form = form.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::start_intake().await {
                        Ok(view) => {
                            info!("Intake session {} started", view.session_id);
                            form.set(FormState::default().with_view(view));
                        }
                        Err(e) => {
                            error!("Failed to start intake session: {}", e);
                            form.set(FormState::default().with_error(e));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_email = {
        let form = form.clone();
        Callback::from(move |email: String| {
            let current = (*form).clone();
            let Some(session_id) = current.session_id.clone() else {
                form.set(current.with_error(NO_SESSION.to_string()));
                return;
            };
            let pending = FormState {
                email: email.clone(),
                ..current.loading()
            };
            form.set(pending.clone());

            let form = form.clone();
            spawn_local(async move {
                match api::submit_email(&session_id, email).await {
                    Ok(view) => form.set(pending.with_view(view)),
                    Err(e) => {
                        error!("Email step request failed: {}", e);
                        form.set(pending.with_error(e));
                    }
                }
            });
        })
    };

    let on_details = {
        let form = form.clone();
        Callback::from(move |details: DetailsRequest| {
            let current = (*form).clone();
            let Some(session_id) = current.session_id.clone() else {
                form.set(current.with_error(NO_SESSION.to_string()));
                return;
            };
            let pending = FormState {
                details: details.clone(),
                ..current.loading()
            };
            form.set(pending.clone());

            let form = form.clone();
            spawn_local(async move {
                match api::submit_details(&session_id, &details).await {
                    Ok(view) => form.set(pending.with_view(view)),
                    Err(e) => {
                        error!("Details step request failed: {}", e);
                        form.set(pending.with_error(e));
                    }
                }
            });
        })
    };

    let on_back = {
        let form = form.clone();
        Callback::from(move |_: ()| form.set(form.back()))
    };

    let email_error = form.field_errors.get("email").cloned();

    html! {
        <div class="contact-form-container">
            <div class="contact-form-wrapper">
                <ProgressIndicator current_step={form.step} />
                {
                    match form.step {
                        1 => html! {
                            <StepOne
                                initial_email={form.email.clone()}
                                is_loading={form.is_loading}
                                error={form.error.clone()}
                                field_error={email_error}
                                on_next={on_email}
                            />
                        },
                        2 => html! {
                            <StepTwo
                                email={form.email.clone()}
                                initial_details={form.details.clone()}
                                is_loading={form.is_loading}
                                error={form.error.clone()}
                                field_errors={form.field_errors.clone()}
                                on_next={on_details}
                                on_back={on_back}
                            />
                        },
                        _ => html! {
                            <StepThree contact_name={form.contact_name.clone()} />
                        },
                    }
                }
            </div>
        </div>
    }
}
