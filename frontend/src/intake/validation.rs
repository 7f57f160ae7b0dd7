use once_cell::sync::Lazy;
use regex::Regex;

use crate::intake::form_state::{DetailsRequest, FieldErrors};

// Mirrors the server's patterns.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9]?\.[a-zA-Z]{2,}$")
        .expect("domain pattern compiles")
});

/// `something@something.something` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

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

/// One label, a dot, and a TLD of two or more letters.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

pub fn validate_email(raw: &str) -> Option<String> {
    let email = raw.trim();
    if email.is_empty() {
        Some("Please enter your email".to_string())
    } else if !is_valid_email(email) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

/// Returns the cleaned request, or every field message at once.
pub fn validate_details(input: &DetailsRequest) -> Result<DetailsRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    if input.full_name.trim().is_empty() {
        errors.insert("full_name".to_string(), "Please enter your full name".to_string());
    }
    if input.company_name.trim().is_empty() {
        errors.insert("company_name".to_string(), "Please enter your company name".to_string());
    }

    let domain = clean_domain(&input.company_domain);
    if input.company_domain.trim().is_empty() {
        errors.insert(
            "company_domain".to_string(),
            "Please enter your company website".to_string(),
        );
    } else if !is_valid_domain(&domain) {
        errors.insert(
            "company_domain".to_string(),
            "Please enter a valid domain (e.g., example.com)".to_string(),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(DetailsRequest {
        company_domain: domain,
        ..input.clone()
    })
}
