use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::intake_models::FitReport;

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable body of the note attached next to a fit report.
pub fn report_note_body(title: &str, report: &FitReport, now: DateTime<Utc>) -> String {
    let concerns = if report.concerns.is_empty() {
        "• None identified".to_string()
    } else {
        bullets(&report.concerns)
    };

    format!(
        "{title} - {date}\n\n\
         Fit Score: {score}/10\n\n\
         Service Recommendations:\n{recommendations}\n\n\
         Key Opportunities:\n{opportunities}\n\n\
         Concerns:\n{concerns}\n\n\
         Engagement Approach:\n{approach}\n\n\
         Summary:\n{summary}",
        title = title,
        date = now.format("%-m/%-d/%Y"),
        score = report.fit_score,
        recommendations = bullets(&report.service_recommendations),
        opportunities = bullets(&report.key_opportunities),
        concerns = concerns,
        approach = report.engagement_approach,
        summary = report.summary,
    )
    .trim()
    .to_string()
}

/// `enrichment_date` property value.
pub fn enrichment_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// `hs_timestamp` property value.
pub fn note_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
