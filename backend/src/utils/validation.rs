use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationErrors;
use crate::models::intake_models::DetailsInput;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9]?\.[a-zA-Z]{2,}$")
        .expect("domain pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lowercases and strips scheme, `www.` and one trailing slash.
pub fn clean_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut domain = lowered.as_str();
    domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    domain = domain.strip_prefix("www.").unwrap_or(domain);
    domain = domain.strip_suffix('/').unwrap_or(domain);
    domain.to_string()
}

/// Cleaned domain, or `None` when what's left isn't a plausible domain.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let domain = clean_domain(raw);
    if DOMAIN_RE.is_match(&domain) {
        Some(domain)
    } else {
        None
    }
}

/// Step one. Returns the trimmed email.
pub fn validate_email_step(raw: &str) -> Result<String, ValidationErrors> {
    let email = raw.trim();
    let mut errors = ValidationErrors::new();
    if email.is_empty() {
        errors.add("email", "Please enter your email");
    } else if !is_valid_email(email) {
        errors.add("email", "Please enter a valid email address");
    }

    if errors.is_empty() {
        Ok(email.to_string())
    } else {
        Err(errors)
    }
}

/// Step two. Every field is checked so all messages come back at once; the
/// returned input carries the normalized domain.
pub fn validate_details_step(input: &DetailsInput) -> Result<DetailsInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if input.full_name.trim().is_empty() {
        errors.add("full_name", "Please enter your full name");
    }
    if input.company_name.trim().is_empty() {
        errors.add("company_name", "Please enter your company name");
    }

    let mut domain = String::new();
    if input.company_domain.trim().is_empty() {
        errors.add("company_domain", "Please enter your company website");
    } else {
        match normalize_domain(&input.company_domain) {
            Some(clean) => domain = clean,
            None => errors.add(
                "company_domain",
                "Please enter a valid domain (e.g., example.com)",
            ),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(DetailsInput {
        full_name: input.full_name.clone(),
        company_name: input.company_name.clone(),
        company_domain: domain,
    })
}
