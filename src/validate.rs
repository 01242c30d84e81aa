use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stats {
    pub chapters: usize,
    pub problems: usize,
    pub prompts: usize,
    pub failure_modes: usize,
}

/// Outcome of checking one written document.
#[derive(Debug, Default)]
pub struct Report {
    pub path: PathBuf,
    pub bytes: usize,
    pub stats: Stats,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load `path` as untyped JSON and check it. Unreadable or malformed files are
/// errors; structural problems end up in the report.
pub fn validate_file(path: &Path) -> Result<Report> {
    info!("Loading {}", path.display());
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let doc: Value =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("✓ JSON parsed successfully ({:.2} KB)", raw.len() as f64 / 1024.0);

    let mut report = validate(&doc);
    report.path = path.to_path_buf();
    report.bytes = raw.len();
    Ok(report)
}

pub fn validate(doc: &Value) -> Report {
    let mut report = Report::default();
    if check_structure(doc, &mut report) {
        check_content(doc, &mut report);
    }
    report
}

// JavaScript truthiness: missing, null, false, 0 and "" are all absent.
fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn check_structure(doc: &Value, report: &mut Report) -> bool {
    let Some(metadata) = doc.get("metadata") else {
        report.errors.push("Missing metadata object".to_string());
        return false;
    };
    for field in ["title", "version", "totalChapters"] {
        if !truthy(metadata.get(field)) {
            report.errors.push(format!("Missing metadata.{}", field));
        }
    }

    let Some(chapters) = doc.get("chapters").and_then(Value::as_array) else {
        report.errors.push("chapters must be an array".to_string());
        return false;
    };
    if chapters.is_empty() {
        report.errors.push("chapters array is empty".to_string());
        return false;
    }
    report.stats.chapters = chapters.len();
    info!("✓ Found {} chapter(s)", chapters.len());
    true
}

fn check_content(doc: &Value, report: &mut Report) {
    let chapters = doc["chapters"].as_array().map_or(&[][..], Vec::as_slice);

    for (ch, chapter) in chapters.iter().enumerate() {
        for field in ["id", "number", "title", "problems"] {
            if !truthy(chapter.get(field)) {
                report.errors.push(format!("Chapter {}: Missing {}", ch, field));
            }
        }
        let Some(problems) = chapter.get("problems").and_then(Value::as_array) else {
            report.errors.push(format!("Chapter {}: problems must be array", ch));
            continue;
        };
        report.stats.problems += problems.len();

        for (p, problem) in problems.iter().enumerate() {
            for field in ["id", "number", "title"] {
                if !truthy(problem.get(field)) {
                    report.errors.push(format!("Chapter {}, Problem {}: Missing {}", ch, p, field));
                }
            }

            if let Some(prompts) = problem.get("prompts").and_then(Value::as_array) {
                report.stats.prompts += prompts.len();
                for (pr, prompt) in prompts.iter().enumerate() {
                    if !truthy(prompt.get("id")) {
                        report.errors.push(format!("Ch{}/P{}/Pr{}: Missing promptId", ch, p, pr));
                    }
                    if !truthy(prompt.get("inputSchema")) {
                        report.warnings.push(format!("Ch{}/P{}/Pr{}: No inputSchema", ch, p, pr));
                    }
                }
            }

            if let Some(modes) = problem.get("failureModes").and_then(Value::as_array) {
                report.stats.failure_modes += modes.len();
                for (fm, mode) in modes.iter().enumerate() {
                    if mode.is_object() && !truthy(mode.get("id")) {
                        report.warnings.push(format!("Ch{}/P{}/FM{}: No failureModeId", ch, p, fm));
                    }
                }
            }
        }
    }

    info!(
        problems = report.stats.problems,
        prompts = report.stats.prompts,
        failure_modes = report.stats.failure_modes,
        "✓ Content validation complete"
    );
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{}\nVALIDATION REPORT\n{}", rule, rule)?;
        writeln!(f, "\nFile: {}", self.path.display())?;
        writeln!(f, "Size: {:.2} KB", self.bytes as f64 / 1024.0)?;
        writeln!(f, "Chapters: {}", self.stats.chapters)?;
        writeln!(f, "Problems: {}", self.stats.problems)?;
        writeln!(f, "Prompts: {}", self.stats.prompts)?;
        writeln!(f, "Failure Modes: {}", self.stats.failure_modes)?;

        if !self.errors.is_empty() {
            writeln!(f, "\n❌ ERRORS ({}):", self.errors.len())?;
            for e in &self.errors {
                writeln!(f, "   - {}", e)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "\n⚠️  WARNINGS ({}):", self.warnings.len())?;
            for w in &self.warnings {
                writeln!(f, "   - {}", w)?;
            }
        }

        writeln!(f, "\n{}", rule)?;
        if self.passed() {
            writeln!(f, "✓ VALIDATION PASSED - JSON is valid and complete")?;
        } else {
            writeln!(f, "✗ VALIDATION FAILED - Fix errors before using")?;
        }
        write!(f, "{}", rule)
    }
}
