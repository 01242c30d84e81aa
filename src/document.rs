use serde::ser::Serializer;
use serde::Serialize;

pub const BOOK_TITLE: &str = "AI Solved Business Problems";
pub const BOOK_SUBTITLE: &str = "50 Real-World Challenges from 10 Industries";
pub const DOCUMENT_VERSION: &str = "1.0.0";

// ── Top level ──

#[derive(Debug, Serialize)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: String,
    pub subtitle: String,
    pub version: String,
    pub extracted_at: String,
    pub total_chapters: usize,
    pub total_problems: usize,
    pub total_prompts: usize,
}

impl Document {
    /// Wrap parsed chapters with book-level metadata and totals.
    pub fn new(chapters: Vec<Chapter>, extracted_at: &str) -> Self {
        let total_problems = chapters.iter().map(|c| c.problems.len()).sum();
        let total_prompts = chapters.iter().map(Chapter::prompt_count).sum();
        Document {
            metadata: DocumentMetadata {
                title: BOOK_TITLE.to_string(),
                subtitle: BOOK_SUBTITLE.to_string(),
                version: DOCUMENT_VERSION.to_string(),
                extracted_at: extracted_at.to_string(),
                total_chapters: chapters.len(),
                total_problems,
                total_prompts,
            },
            chapters,
        }
    }
}

// ── Chapter / Problem ──

#[derive(Debug, Serialize)]
pub struct Chapter {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub intro: String,
    pub problems: Vec<Problem>,
    pub metadata: ChapterMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMetadata {
    pub extraction_date: String,
    pub total_problems: usize,
    pub total_prompts: usize,
    pub total_failure_modes: usize,
}

impl Chapter {
    pub fn prompt_count(&self) -> usize {
        self.problems.iter().map(|p| p.prompts.len()).sum()
    }

    pub fn failure_mode_count(&self) -> usize {
        self.problems.iter().map(|p| p.failure_modes.len()).sum()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub sections: Sections,
    pub prompts: Vec<Prompt>,
    pub business_case: BusinessCase,
    pub failure_modes: Vec<FailureMode>,
    pub metadata: ProblemMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMetadata {
    pub severity: String,
    pub promptability: f64,
    pub prompt_count: usize,
    pub failure_mode_count: usize,
}

/// The eight fixed subdivisions of a problem, in book order.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub operational_reality: String,
    pub why_traditional_fails: String,
    pub manager_decision_point: String,
    pub ai_workflow: String,
    pub execution_prompt: String,
    pub business_case: String,
    pub industry_context: String,
    pub failure_modes: String,
}

// ── Prompts ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub version: String,
    pub title: String,
    pub role: String,
    pub severity: String,
    pub prompt_code: String,
    #[serde(serialize_with = "numbered_inputs")]
    pub input_schema: Vec<InputSpec>,
    pub output_requirements: Vec<OutputRequirement>,
    pub mock_output: MockOutput,
    pub platform_compatibility: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    pub name: String,
    pub system_source: String,
    pub required_format: String,
    pub required_columns: Vec<String>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRequirement {
    pub deliverable: u32,
    pub name: String,
    pub priority: String,
    pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockOutput {
    pub prompt_id: String,
    pub status: String,
    pub executed_at: String,
    pub message: String,
    pub data: MockData,
}

#[derive(Debug, Serialize)]
pub struct MockData {
    pub summary: String,
    pub records: Vec<serde_json::Value>,
}

/// Input schema is a map keyed `input1`, `input2`, ... in order of appearance.
fn numbered_inputs<S: Serializer>(inputs: &[InputSpec], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        inputs
            .iter()
            .enumerate()
            .map(|(i, spec)| (format!("input{}", i + 1), spec)),
    )
}

// ── Business case ──

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCase {
    pub current_state: CurrentState,
    #[serde(rename = "withAI")]
    pub with_ai: serde_json::Map<String, serde_json::Value>,
    pub implementation: serde_json::Map<String, serde_json::Value>,
    pub payback: Payback,
    pub sensitivity_analysis: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_freight_spend: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_error_rate: Option<f64>,
}

#[derive(Debug, Default, Serialize)]
pub struct Payback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<f64>,
}

// ── Failure modes ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureMode {
    pub id: String,
    pub number: usize,
    pub name: String,
    pub symptom: String,
    pub root_cause: String,
    pub recovery: Recovery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recovery {
    pub immediate: RecoveryStep,
    pub short_term: RecoveryStep,
    pub long_term: RecoveryStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryStep {
    pub timeframe: String,
    pub action: String,
    pub details: String,
}
