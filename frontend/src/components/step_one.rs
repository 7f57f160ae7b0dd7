use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::intake::validation::validate_email;

#[derive(Properties, PartialEq)]
pub struct StepOneProps {
    pub initial_email: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub field_error: Option<String>,
    pub on_next: Callback<String>,
}

#[function_component(StepOne)]
pub fn step_one(props: &StepOneProps) -> Html {
    let email = use_state(|| props.initial_email.clone());
    let validation_error = use_state(|| None::<String>);

    let onsubmit = {
        let email = email.clone();
        let validation_error = validation_error.clone();
        let on_next = props.on_next.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match validate_email(&email) {
                Some(message) => validation_error.set(Some(message)),
                None => {
                    validation_error.set(None);
                    on_next.emit(email.trim().to_string());
                }
            }
        })
    };

    let oninput = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let shown_field_error = (*validation_error).clone().or_else(|| props.field_error.clone());
    let has_error = shown_field_error.is_some() || props.error.is_some();

    html! {
        <div class="contact-step step-one">
            <div class="step-header">
                <h2 class="step-title">{"Let's get started"}</h2>
                <p class="step-description">{"Enter your email to begin"}</p>
            </div>
            <form onsubmit={onsubmit} class="step-form">
                <div class="form-group">
                    <label for="email" class="form-label">{"Email Address"}</label>
                    <input
                        type="email"
                        id="email"
                        name="email"
                        value={(*email).clone()}
                        oninput={oninput}
                        class={classes!("form-input", has_error.then(|| "form-input-error"))}
                        placeholder="you@company.com"
                        disabled={props.is_loading}
                        autofocus=true
                    />
                    if let Some(message) = shown_field_error {
                        <p class="form-error" role="alert">{message}</p>
                    }
                    if let Some(message) = props.error.clone() {
                        <p class="form-error" role="alert">{message}</p>
                    }
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary btn-next" disabled={props.is_loading}>
                        if props.is_loading {
                            <>
                                <span class="spinner"></span>
                                <span>{"Processing..."}</span>
                            </>
                        } else {
                            <>
                                <span>{"Continue"}</span>
                                <span class="arrow">{"→"}</span>
                            </>
                        }
                    </button>
                </div>
            </form>
        </div>
    }
}
