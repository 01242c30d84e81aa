use std::sync::LazyLock;

use regex::Regex;

use crate::document::BusinessCase;
use crate::parser::markers::first_capture;

static ANNUAL_SPEND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Annual[^\n]*Spend[^\n]*:\s*\$?([\d,]+)").unwrap());
static ERROR_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Error Rate[^\n]*:\s*(\d+(?:\.\d+)?%?)").unwrap());
static PAYBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Payback[^\n]*:\s*([\d.]+)\s*(?:months?|days?)").unwrap());

/// Pull headline figures out of a problem's business-case section.
/// Figures that are absent, or that do not parse, are left out.
pub fn extract(section_text: &str) -> BusinessCase {
    let mut case = BusinessCase::default();

    case.current_state.annual_freight_spend = first_capture(&ANNUAL_SPEND_RE, section_text)
        .and_then(|s| s.replace(',', "").parse::<u64>().ok());

    case.current_state.estimated_error_rate = first_capture(&ERROR_RATE_RE, section_text)
        .and_then(|s| s.trim_end_matches('%').parse::<f64>().ok())
        .map(|pct| pct / 100.0);

    case.payback.months =
        first_capture(&PAYBACK_RE, section_text).and_then(|s| s.parse::<f64>().ok());

    case
}
