use yew::prelude::*;

use crate::intake::form_state::{step_status, StepStatus, STEP_LABELS};

#[derive(Properties, PartialEq)]
pub struct ProgressIndicatorProps {
    pub current_step: u8,
}

#[function_component(ProgressIndicator)]
pub fn progress_indicator(props: &ProgressIndicatorProps) -> Html {
    html! {
        <div class="progress-indicator">
            <div class="progress-steps">
                { for STEP_LABELS.iter().enumerate().map(|(index, (number, label))| {
                    let status = step_status(*number, props.current_step);
                    let step_class = match status {
                        StepStatus::Completed => "progress-step progress-step-completed",
                        StepStatus::Current => "progress-step progress-step-current",
                        StepStatus::Upcoming => "progress-step progress-step-upcoming",
                    };
                    html! {
                        <div class="progress-step-wrapper" key={number.to_string()}>
                            <div class={step_class}>
                                <div class="progress-step-circle">
                                    {
                                        if status == StepStatus::Completed {
                                            html! { <span class="progress-step-check">{"✓"}</span> }
                                        } else {
                                            html! { <span class="progress-step-number">{*number}</span> }
                                        }
                                    }
                                </div>
                                <div class="progress-step-label">{*label}</div>
                            </div>
                            if index < STEP_LABELS.len() - 1 {
                                <div class={classes!(
                                    "progress-connector",
                                    (status == StepStatus::Completed).then(|| "progress-connector-completed")
                                )} />
                            }
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
