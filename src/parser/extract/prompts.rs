use std::sync::LazyLock;

use regex::Regex;

use crate::document::{InputSpec, MockData, MockOutput, OutputRequirement, Prompt};
use crate::parser::markers::{entries, find_from, first_capture};

pub const BEGIN_MARKER: &str = "<<< BEGIN PROMPT >>>";
pub const END_MARKER: &str = "<<< END PROMPT >>>";

const DEFAULT_VERSION: &str = "1.0.v1";
const DEFAULT_ROLE: &str = "AI Assistant";
const DEFAULT_SEVERITY: &str = "UNKNOWN";
const DEFAULT_PLATFORMS: &[&str] = &["ChatGPT", "Claude", "Gemini"];
const TITLE_FALLBACK_CHARS: usize = 80;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*Version:\*\*\s*([^\n]+)").unwrap());
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*Role:\*\*\s*([^\n]+)").unwrap());
static SEVERITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*Severity:\*\*\s*([^\n]+)").unwrap());
static PLATFORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Platform Compatibility:\*\*\s*([^\n]+)").unwrap());

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"# PROMPT[\s\d.]+:\s*([^\n]+)").unwrap());
static ROLE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"You are an?\s*\*?\*?([^.]+)").unwrap());

static INPUT_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*INPUT (\d+):\s*([^\n]+)\*\*\n").unwrap());
static INPUT_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*INPUT \d+:").unwrap());
static FORMAT_REQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Required Format:\s*([^\n]+)").unwrap());
static COLUMNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Required Columns:\s*([^\n]+)").unwrap());
static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"System Source:\s*([^\n]+)").unwrap());
static EXAMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)Example:?\s*["`]?([^"`\n]+)["`]?"#).unwrap());
static COLUMN_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;]\s*").unwrap());

static DELIVERABLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*DELIVERABLE (\d+):\s*([^\n]+)\*\*\n").unwrap());
static DELIVERABLE_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*DELIVERABLE|\*\*\*").unwrap());
static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Priority:\s*([^\n]+)").unwrap());
static FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Format:\s*([^\n]+)").unwrap());

/// Extract every BEGIN/END PROMPT block in a problem slice.
///
/// Metadata is read from the text between the previous prompt (or the start of
/// the slice) and this prompt's BEGIN marker; the match nearest the marker wins.
pub fn extract(problem_text: &str, chapter: u32, problem: u32, executed_at: &str) -> Vec<Prompt> {
    let mut prompts = Vec::new();
    let mut cursor = 0;

    while let Some(begin) = find_from(problem_text, BEGIN_MARKER, cursor) {
        let code_start = begin + BEGIN_MARKER.len();
        let Some(end) = find_from(problem_text, END_MARKER, code_start) else {
            break;
        };

        let code = problem_text[code_start..end].trim();
        let context = &problem_text[cursor..begin];
        let id = format!("ch{}_p{}_pr{}", chapter, problem, prompts.len() + 1);

        prompts.push(Prompt {
            version: nearest(&VERSION_RE, context).unwrap_or_else(|| DEFAULT_VERSION.into()),
            title: extract_title(code),
            role: nearest(&ROLE_RE, context).unwrap_or_else(|| DEFAULT_ROLE.into()),
            severity: nearest(&SEVERITY_RE, context).unwrap_or_else(|| DEFAULT_SEVERITY.into()),
            prompt_code: code.to_string(),
            input_schema: parse_input_schema(code),
            output_requirements: parse_output_requirements(code),
            mock_output: mock_output(&id, executed_at),
            platform_compatibility: platform_compatibility(context),
            id,
        });

        cursor = end + END_MARKER.len();
    }

    prompts
}

/// Last match of `re` in `context`, i.e. the one closest to the prompt body.
fn nearest(re: &Regex, context: &str) -> Option<String> {
    re.captures_iter(context)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn extract_title(code: &str) -> String {
    if let Some(title) = first_capture(&TITLE_RE, code) {
        return title;
    }
    if let Some(role) = first_capture(&ROLE_TITLE_RE, code) {
        return role.chars().take(TITLE_FALLBACK_CHARS).collect();
    }
    "Untitled Prompt".to_string()
}

pub fn parse_input_schema(code: &str) -> Vec<InputSpec> {
    entries(code, &INPUT_HEADER_RE, &INPUT_STOP_RE)
        .into_iter()
        .map(|e| InputSpec {
            name: e.caps[2].trim().to_string(),
            system_source: first_capture(&SOURCE_RE, e.body).unwrap_or_else(|| "User Input".into()),
            required_format: first_capture(&FORMAT_REQ_RE, e.body)
                .unwrap_or_else(|| "CSV or Text".into()),
            required_columns: first_capture(&COLUMNS_RE, e.body)
                .map(|cols| split_columns(&cols))
                .unwrap_or_default(),
            example: first_capture(&EXAMPLE_RE, e.body),
        })
        .collect()
}

fn split_columns(raw: &str) -> Vec<String> {
    COLUMN_SPLIT_RE
        .split(raw)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| c.replace('`', ""))
        .collect()
}

pub fn parse_output_requirements(code: &str) -> Vec<OutputRequirement> {
    entries(code, &DELIVERABLE_HEADER_RE, &DELIVERABLE_STOP_RE)
        .into_iter()
        .map(|e| OutputRequirement {
            deliverable: e.caps[1].parse().unwrap_or_default(),
            name: e.caps[2].trim().to_string(),
            priority: first_capture(&PRIORITY_RE, e.body).unwrap_or_else(|| "MEDIUM".into()),
            format: first_capture(&FORMAT_RE, e.body).unwrap_or_else(|| "Text".into()),
        })
        .collect()
}

fn platform_compatibility(context: &str) -> Vec<String> {
    match nearest(&PLATFORM_RE, context) {
        Some(list) => list
            .split([',', ';'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
    }
}

fn mock_output(prompt_id: &str, executed_at: &str) -> MockOutput {
    MockOutput {
        prompt_id: prompt_id.to_string(),
        status: "success".to_string(),
        executed_at: executed_at.to_string(),
        message: "Mock output - generated for demonstration".to_string(),
        data: MockData {
            summary: "Analysis complete".to_string(),
            records: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: &str = "2026-02-10T00:00:00+00:00";

    #[test]
    fn body_is_exact_text_between_markers() {
        let text = "intro\n<<< BEGIN PROMPT >>>\n\n  # PROMPT 1.1: Audit\nDo the thing.\n  \n<<< END PROMPT >>>\nafter";
        let prompts = extract(text, 1, 1, AT);
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].prompt_code, "# PROMPT 1.1: Audit\nDo the thing.");
        assert_eq!(prompts[0].id, "ch1_p1_pr1");
        assert_eq!(prompts[0].title, "Audit");
    }

    #[test]
    fn defaults_without_metadata() {
        let text = "<<< BEGIN PROMPT >>>\nplain\n<<< END PROMPT >>>";
        let p = &extract(text, 1, 3, AT)[0];
        assert_eq!(p.version, "1.0.v1");
        assert_eq!(p.role, "AI Assistant");
        assert_eq!(p.severity, "UNKNOWN");
        assert_eq!(p.title, "Untitled Prompt");
        assert_eq!(p.platform_compatibility, vec!["ChatGPT", "Claude", "Gemini"]);
        assert!(p.input_schema.is_empty());
        assert!(p.output_requirements.is_empty());
        assert_eq!(p.mock_output.prompt_id, "ch1_p3_pr1");
        assert_eq!(p.mock_output.executed_at, AT);
    }

    #[test]
    fn metadata_from_context_does_not_leak_across_prompts() {
        let text = "**Version:** 2.1\n**Role:** Auditor\n**Severity:** CRITICAL\n\
                    **Platform Compatibility:** ChatGPT-4; Claude 3.5 Sonnet, Gemini 2.0\n\
                    <<< BEGIN PROMPT >>>\none\n<<< END PROMPT >>>\n\
                    <<< BEGIN PROMPT >>>\ntwo\n<<< END PROMPT >>>";
        let prompts = extract(text, 1, 1, AT);
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].version, "2.1");
        assert_eq!(prompts[0].role, "Auditor");
        assert_eq!(prompts[0].severity, "CRITICAL");
        assert_eq!(
            prompts[0].platform_compatibility,
            vec!["ChatGPT-4", "Claude 3.5 Sonnet", "Gemini 2.0"]
        );
        assert_eq!(prompts[1].id, "ch1_p1_pr2");
        assert_eq!(prompts[1].version, "1.0.v1");
    }

    #[test]
    fn nearest_metadata_wins() {
        let text = "**Version:** 0.9\nsection text\n**Version:** 1.4\n<<< BEGIN PROMPT >>>\nx\n<<< END PROMPT >>>";
        assert_eq!(extract(text, 1, 1, AT)[0].version, "1.4");
    }

    #[test]
    fn unterminated_prompt_stops_scan() {
        let text = "<<< BEGIN PROMPT >>>\nok\n<<< END PROMPT >>>\n<<< BEGIN PROMPT >>>\ndangling";
        assert_eq!(extract(text, 1, 1, AT).len(), 1);
    }

    #[test]
    fn title_falls_back_to_role_sentence() {
        assert_eq!(
            extract_title("You are an **expert freight auditor. Work carefully."),
            "expert freight auditor"
        );
        let long = format!("You are a {}.", "x".repeat(120));
        assert_eq!(extract_title(&long).chars().count(), 80);
    }

    #[test]
    fn input_schema_entries() {
        let code = "## Inputs\n\
            **INPUT 1: Carrier Contracts (Legal Documents)**\n\
            Required Format: PDF text or markdown\n\
            Example: Contract XPO-2025-NY-001\n\n\
            **INPUT 2: Invoice Data (Structured)**\n\
            Required Format: CSV with headers\n\
            Required Columns: `invoice_number`, date; carrier\n\
            System Source: ERP export\n";
        let schema = parse_input_schema(code);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].name, "Carrier Contracts (Legal Documents)");
        assert_eq!(schema[0].required_format, "PDF text or markdown");
        assert_eq!(schema[0].system_source, "User Input");
        assert!(schema[0].required_columns.is_empty());
        assert_eq!(schema[0].example.as_deref(), Some("Contract XPO-2025-NY-001"));
        assert_eq!(schema[1].required_columns, vec!["invoice_number", "date", "carrier"]);
        assert_eq!(schema[1].system_source, "ERP export");
        assert_eq!(schema[1].example, None);
    }

    #[test]
    fn malformed_input_header_yields_nothing() {
        assert!(parse_input_schema("**INPUT 1: Missing closing stars\nRequired Format: CSV").is_empty());
    }

    #[test]
    fn output_requirements_stop_at_rule() {
        let code = "**DELIVERABLE 1: Dispute Report**\nPriority: HIGH\nFormat: JSON\n\
                    **DELIVERABLE 2: Email Drafts**\nplain text\n***\nPriority: LOW";
        let reqs = parse_output_requirements(code);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].deliverable, 1);
        assert_eq!(reqs[0].name, "Dispute Report");
        assert_eq!(reqs[0].priority, "HIGH");
        assert_eq!(reqs[0].format, "JSON");
        assert_eq!(reqs[1].priority, "MEDIUM");
        assert_eq!(reqs[1].format, "Text");
    }
}
