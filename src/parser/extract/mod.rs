pub mod business_case;
pub mod failure_modes;
pub mod prompts;

use std::sync::LazyLock;

use regex::Regex;

use super::markers::first_capture;
use super::sections::split_sections;
use crate::document::{Problem, ProblemMetadata};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\APROBLEM \d+\.\d+\n([^\n]+)\n").unwrap());
static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Severity[:\s]*([^\n]+)").unwrap());
static PROMPTABILITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Promptability[:\s]*(\d+\.?\d*)").unwrap());

/// Build one problem record from its slice of the chapter (starting at its
/// `PROBLEM c.n` line).
pub fn extract_problem(problem_text: &str, chapter: u32, number: u32, extracted_at: &str) -> Problem {
    let label = format!("{}.{}", chapter, number);
    let title = first_capture(&TITLE_RE, problem_text).unwrap_or_else(|| format!("Problem {}", label));

    let sections = split_sections(problem_text, &label);
    let prompts = prompts::extract(problem_text, chapter, number, extracted_at);
    let business_case = business_case::extract(&sections.business_case);
    let failure_modes = failure_modes::extract(&sections.failure_modes, chapter, number);

    let metadata = ProblemMetadata {
        severity: extract_severity(&sections.execution_prompt),
        promptability: extract_promptability(problem_text),
        prompt_count: prompts.len(),
        failure_mode_count: failure_modes.len(),
    };

    Problem {
        id: format!("ch{}_p{}", chapter, number),
        number,
        title,
        sections,
        prompts,
        business_case,
        failure_modes,
        metadata,
    }
}

pub fn extract_severity(section_text: &str) -> String {
    first_capture(&SEVERITY_RE, section_text).unwrap_or_else(|| "UNKNOWN".to_string())
}

pub fn extract_promptability(problem_text: &str) -> f64 {
    first_capture(&PROMPTABILITY_RE, problem_text)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const AT: &str = "2026-02-10T00:00:00.000Z";

    fn problem_text() -> String {
        std::fs::read_to_string("tests/fixtures/problem_1_1.txt").unwrap()
    }

    #[test]
    fn freight_leak_problem() {
        let p = extract_problem(&problem_text(), 1, 1, AT);
        assert_eq!(p.id, "ch1_p1");
        assert_eq!(p.title, "The Freight Leak (Automated Audit & Dispute)");
        assert!(p.sections.operational_reality.starts_with("The Operational Reality\n"));
        assert!(p.sections.operational_reality.contains("Your Accounts Payable"));
        assert!(!p.sections.industry_context.is_empty());
        assert_eq!(p.metadata.severity, "CRITICAL");
        assert_eq!(p.metadata.promptability, 9.5);
    }

    #[test]
    fn freight_leak_prompt() {
        let p = extract_problem(&problem_text(), 1, 1, AT);
        assert_eq!(p.prompts.len(), 1);
        let prompt = &p.prompts[0];
        assert_eq!(prompt.id, "ch1_p1_pr1");
        assert_eq!(prompt.title, "FREIGHT INVOICE AUDIT AGENT");
        assert_eq!(prompt.version, "1.0.0");
        assert_eq!(prompt.role, "Expert freight audit specialist");
        assert_eq!(prompt.severity, "CRITICAL");
        assert_eq!(prompt.input_schema.len(), 3);
        assert_eq!(prompt.input_schema[1].name, "Invoice Data (Structured)");
        assert!(prompt.input_schema[1].required_columns.contains(&"dest_zip".to_string()));
        assert_eq!(prompt.output_requirements.len(), 2);
        assert_eq!(prompt.output_requirements[0].priority, "HIGH");
        assert_eq!(p.metadata.prompt_count, 1);
    }

    #[test]
    fn freight_leak_business_case_and_failures() {
        let p = extract_problem(&problem_text(), 1, 1, AT);
        assert_eq!(p.business_case.current_state.annual_freight_spend, Some(12_000_000));
        assert_eq!(p.business_case.current_state.estimated_error_rate, Some(0.06));
        assert_eq!(p.business_case.payback.months, Some(1.2));
        assert_eq!(p.failure_modes.len(), 3);
        assert_eq!(p.failure_modes[2].id, "fm_ch1_p1_03");
        assert_eq!(p.failure_modes[1].name, "Carrier Relationship Damage - Over-Disputing");
        assert!(p.failure_modes[0].recovery.immediate.action.starts_with("Confidence Filtering"));
        assert_eq!(p.metadata.failure_mode_count, 3);
    }

    #[test]
    fn untitled_problem_gets_default_title() {
        let p = extract_problem("PROBLEM 2.3", 2, 3, AT);
        assert_eq!(p.title, "Problem 2.3");
        assert_eq!(p.metadata.severity, "UNKNOWN");
        assert_eq!(p.metadata.promptability, 0.0);
        assert!(p.prompts.is_empty());
    }
}
