use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern compiles"));

const FIT_ANALYSIS_PROMPT: &str = "You are analyzing a potential customer for Purely Works, an AI consulting and automation company.

Company Information:
- Name: {{company_name}}
- Domain: {{company_domain}}
- Contact: {{contact_name}} ({{email}})

Purely Works Services:
1. AI-powered process automation
2. Custom CRM and software development
3. Offshore development teams (Pakistan + US expertise)
4. AI consulting and strategy
5. Fractional team support

Ideal Customer Profile:
- Startups and SMEs
- Construction management firms
- Companies with 10-500 employees
- Budget range: $5K-50K per project
- Looking to automate repetitive tasks
- Need custom software or AI integration

Analyze this company and provide a structured assessment.

Respond ONLY with valid JSON in this exact format (no markdown, no code blocks, just raw JSON):
{
  \"fitScore\": <number 1-10>,
  \"serviceRecommendations\": [\"service1\", \"service2\"],
  \"keyOpportunities\": [\"opportunity1\", \"opportunity2\"],
  \"concerns\": [\"concern1\"],
  \"engagementApproach\": \"suggested approach\",
  \"summary\": \"2-3 sentence summary\"
}";

/// Fills every placeholder in one pass, so visitor input that looks like a
/// placeholder is kept verbatim.
pub fn fit_analysis_prompt(
    company_name: &str,
    company_domain: &str,
    contact_name: &str,
    email: &str,
) -> String {
    PLACEHOLDER_RE
        .replace_all(FIT_ANALYSIS_PROMPT, |caps: &Captures| match &caps[1] {
            "company_name" => company_name.to_string(),
            "company_domain" => company_domain.to_string(),
            "contact_name" => contact_name.to_string(),
            "email" => email.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_placeholder() {
        let prompt = fit_analysis_prompt("Acme", "acme.com", "Jane Doe", "jane@acme.com");
        assert!(prompt.contains("- Name: Acme"));
        assert!(prompt.contains("- Domain: acme.com"));
        assert!(prompt.contains("- Contact: Jane Doe (jane@acme.com)"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn placeholder_lookalikes_in_input_stay_literal() {
        let prompt = fit_analysis_prompt("{{email}}", "acme.com", "{{company_domain}}", "jane@acme.com");
        assert!(prompt.contains("- Name: {{email}}"));
        assert!(prompt.contains("- Contact: {{company_domain}} (jane@acme.com)"));
        assert!(!prompt.contains("- Name: jane@acme.com"));
    }
}
