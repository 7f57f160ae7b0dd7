use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::intake::form_state::{DetailsRequest, FieldErrors};
use crate::intake::validation::validate_details;

#[derive(Properties, PartialEq)]
pub struct StepTwoProps {
    pub email: String,
    pub initial_details: DetailsRequest,
    pub is_loading: bool,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    pub on_next: Callback<DetailsRequest>,
    pub on_back: Callback<()>,
}

#[function_component(StepTwo)]
pub fn step_two(props: &StepTwoProps) -> Html {
    let details = use_state(|| props.initial_details.clone());
    let validation_errors = use_state(|| props.field_errors.clone());

    {
        let validation_errors = validation_errors.clone();
        use_effect_with_deps(
            move |server_errors: &FieldErrors| {
                if !server_errors.is_empty() {
                    validation_errors.set(server_errors.clone());
                }
                || ()
            },
            props.field_errors.clone(),
        );
    }

    let on_field = |field: &'static str| {
        let details = details.clone();
        let validation_errors = validation_errors.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*details).clone();
            match field {
                "full_name" => next.full_name = input.value(),
                "company_name" => next.company_name = input.value(),
                _ => next.company_domain = input.value(),
            }
            details.set(next);

            // Clear the message once the visitor starts typing again
            if validation_errors.contains_key(field) {
                let mut errors = (*validation_errors).clone();
                errors.remove(field);
                validation_errors.set(errors);
            }
        })
    };

    let onsubmit = {
        let details = details.clone();
        let validation_errors = validation_errors.clone();
        let on_next = props.on_next.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match validate_details(&details) {
                Ok(clean) => {
                    validation_errors.set(FieldErrors::new());
                    on_next.emit(clean);
                }
                Err(errors) => validation_errors.set(errors),
            }
        })
    };

    let onback = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let field = |name: &'static str, label: &str, value: &str, placeholder: &str| {
        let message = (*validation_errors).get(name).cloned();
        html! {
            <div class="form-group">
                <label for={name} class="form-label">{label}</label>
                <input
                    type="text"
                    id={name}
                    name={name}
                    value={value.to_string()}
                    oninput={on_field(name)}
                    class={classes!("form-input", message.is_some().then(|| "form-input-error"))}
                    placeholder={placeholder.to_string()}
                    disabled={props.is_loading}
                />
                if let Some(message) = message {
                    <p class="form-error" role="alert">{message}</p>
                }
            </div>
        }
    };

    html! {
        <div class="contact-step step-two">
            <div class="step-header">
                <h2 class="step-title">{"Tell us about your business"}</h2>
                <p class="step-description">
                    {"We're collecting this to better understand how we can help"}
                </p>
                <p class="step-email-confirm">{format!("Sending to: {}", props.email)}</p>
            </div>
            <form onsubmit={onsubmit} class="step-form">
                { field("full_name", "Full Name", &details.full_name, "John Smith") }
                { field("company_name", "Company Name", &details.company_name, "Acme Inc.") }
                { field("company_domain", "Company Website", &details.company_domain, "example.com") }
                if let Some(message) = props.error.clone() {
                    <div class="form-error-banner" role="alert">{message}</div>
                }
                <div class="form-actions form-actions-two">
                    <button
                        type="button"
                        onclick={onback}
                        class="btn btn-secondary btn-back"
                        disabled={props.is_loading}
                    >
                        <span class="arrow">{"←"}</span>
                        <span>{"Back"}</span>
                    </button>
                    <button type="submit" class="btn btn-primary btn-submit" disabled={props.is_loading}>
                        if props.is_loading {
                            <>
                                <span class="spinner"></span>
                                <span>{"Submitting..."}</span>
                            </>
                        } else {
                            <>
                                <span>{"Submit"}</span>
                                <span class="arrow">{"→"}</span>
                            </>
                        }
                    </button>
                </div>
            </form>
        </div>
    }
}
