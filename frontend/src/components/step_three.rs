use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StepThreeProps {
    pub contact_name: String,
}

#[function_component(StepThree)]
pub fn step_three(props: &StepThreeProps) -> Html {
    html! {
        <div class="contact-step step-three">
            <div class="success-icon">{"✓"}</div>
            <h2 class="success-title">{format!("Thanks, {}!", props.contact_name)}</h2>
            <p class="success-message">
                {"We've received your information and our team will review it shortly."}
            </p>
            <div class="next-steps">
                <h3 class="next-steps-title">{"What happens next:"}</h3>
                <ul class="next-steps-list">
                    <li>{"We'll analyze your company's AI readiness"}</li>
                    <li>{"A member of our team will reach out within 1-2 business days"}</li>
                    <li>{"We'll discuss how Purely Works can help automate your processes"}</li>
                </ul>
            </div>
            <div class="success-cta">
                <p>{"In the meantime, feel free to explore our work or schedule a quick call:"}</p>
                <div class="success-links">
                    <a href="#projects" class="btn btn-secondary">{"View Our Work"}</a>
                    <a
                        href="https://calendly.com/purelyworks"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="btn btn-primary"
                    >
                        {"Book a Call"}
                    </a>
                </div>
            </div>
        </div>
    }
}
