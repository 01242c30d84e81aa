use tracing::warn;

use super::markers::{find_from, slice};
use crate::document::Sections;

pub const SECTION_COUNT: u32 = 8;

const SECTION_KEYS: [&str; SECTION_COUNT as usize] = [
    "operationalReality",
    "whyTraditionalFails",
    "managerDecisionPoint",
    "aiWorkflow",
    "executionPrompt",
    "businessCase",
    "industryContext",
    "failureModes",
];

/// Text of `SECTION n` inside a problem slice, trimmed. Empty when the marker is absent.
///
/// The section ends at the nearest later section marker, the next problem, or the
/// end of the slice, whichever comes first.
pub fn extract_section(problem_text: &str, n: u32) -> String {
    let start_marker = format!("\nSECTION {}\n", n);
    let Some(pos) = problem_text.find(&start_marker) else {
        return String::new();
    };
    let start = pos + start_marker.len();

    let next_section = (n + 1..=SECTION_COUNT)
        .filter_map(|m| find_from(problem_text, &format!("\nSECTION {}", m), start))
        .min();
    let next_problem = find_from(problem_text, "\n\nPROBLEM", start);

    let end = [next_section, next_problem]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(problem_text.len());

    slice(problem_text, start, end).trim().to_string()
}

/// Split a problem slice into its eight named sections.
pub fn split_sections(problem_text: &str, problem_id: &str) -> Sections {
    let texts: [String; SECTION_COUNT as usize] = std::array::from_fn(|i| {
        let n = i as u32 + 1;
        let text = extract_section(problem_text, n);
        if text.is_empty() {
            warn!(
                problem = problem_id,
                section = n,
                key = SECTION_KEYS[i],
                "section marker not found or empty"
            );
        }
        text
    });

    let [operational_reality, why_traditional_fails, manager_decision_point, ai_workflow, execution_prompt, business_case, industry_context, failure_modes] =
        texts;
    Sections {
        operational_reality,
        why_traditional_fails,
        manager_decision_point,
        ai_workflow,
        execution_prompt,
        business_case,
        industry_context,
        failure_modes,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn problem_with(sections: &[u32]) -> String {
        let mut s = String::from("PROBLEM 1.1\nTitle\n");
        for n in sections {
            s.push_str(&format!("\nSECTION {}\nbody of section {}\n", n, n));
        }
        s
    }

    #[test]
    fn all_eight_sections() {
        let text = problem_with(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let s = split_sections(&text, "1.1");
        assert_eq!(s.operational_reality, "body of section 1");
        assert_eq!(s.execution_prompt, "body of section 5");
        assert_eq!(s.failure_modes, "body of section 8");
    }

    #[test]
    fn missing_section_is_empty_and_neighbours_intact() {
        let text = problem_with(&[1, 2, 3, 4, 6, 7, 8]);
        let s = split_sections(&text, "1.1");
        assert_eq!(s.execution_prompt, "");
        assert_eq!(s.ai_workflow, "body of section 4");
        assert_eq!(s.business_case, "body of section 6");
        assert_eq!(s.failure_modes, "body of section 8");
    }

    #[test]
    fn section_stops_at_next_problem() {
        let text = "PROBLEM 1.1\nT\n\nSECTION 8\nlast words\n\nPROBLEM 1.2\nnext";
        assert_eq!(extract_section(text, 8), "last words");
    }

    #[test]
    fn section_heading_with_suffix_still_bounds() {
        let text = "\nSECTION 1\nfirst\nSECTION 2 (continued)\nsecond";
        assert_eq!(extract_section(text, 1), "first");
        // "SECTION 2\n" exact start marker is absent
        assert_eq!(extract_section(text, 2), "");
    }
}
