pub mod extract;
pub mod markers;
pub mod sections;

use thiserror::Error;
use tracing::{info, warn};

use crate::document::{Chapter, ChapterMetadata, Document};
use markers::{find_from, slice};

/// Literal markers that bound one chapter of the book.
pub struct ChapterMarkers {
    pub number: u32,
    pub title: &'static str,
    /// First line of the chapter body proper, searched from the title.
    pub opening_line: &'static str,
    pub problem_count: u32,
}

pub const CHAPTER_ONE: ChapterMarkers = ChapterMarkers {
    number: 1,
    title: "Logistics & Supply Chain - The AI Operating System",
    opening_line: "Your phone rings at 2:00 AM. It's not a security alarm",
    problem_count: 5,
};

const NEXT_CHAPTER_MARKER: &str = "\n\nCHAPTER";
// Skip past the chapter's own heading before looking for the next one.
const NEXT_CHAPTER_SKIP: usize = 100;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not find {unit} marker {marker:?}")]
    MarkerNotFound { unit: &'static str, marker: String },
}

/// Two-level pipeline: book → chapter slice → problems.
pub fn parse_book(book: &str, extracted_at: &str) -> Result<Document, ParseError> {
    let chapter = parse_chapter(book, &CHAPTER_ONE, extracted_at)?;
    Ok(Document::new(vec![chapter], extracted_at))
}

pub fn parse_chapter(book: &str, markers: &ChapterMarkers, extracted_at: &str) -> Result<Chapter, ParseError> {
    let c = markers.number;
    info!("Parsing CHAPTER {}: {}", c, markers.title);

    let start = book.find(markers.title).ok_or_else(|| ParseError::MarkerNotFound {
        unit: "chapter start",
        marker: markers.title.to_string(),
    })?;
    let body_start =
        find_from(book, markers.opening_line, start).ok_or_else(|| ParseError::MarkerNotFound {
            unit: "chapter body",
            marker: markers.opening_line.to_string(),
        })?;
    let end = find_from(book, NEXT_CHAPTER_MARKER, start + NEXT_CHAPTER_SKIP).unwrap_or(book.len());

    let chapter_text = slice(book, body_start, end);
    info!(chars = chapter_text.chars().count(), "Found chapter {} text", c);

    let intro = match chapter_text.find(&format!("PROBLEM {}.1", c)) {
        Some(i) if i > 0 => chapter_text[..i].trim().to_string(),
        _ => String::new(),
    };

    let mut problems = Vec::new();
    for n in 1..=markers.problem_count {
        match problem_slice(chapter_text, c, n) {
            Some(text) => {
                let problem = extract::extract_problem(text, c, n, extracted_at);
                info!("✓ Problem {}.{} complete: {}", c, n, problem.title);
                problems.push(problem);
            }
            None => warn!("✗ Failed to parse Problem {}.{}: marker not found", c, n),
        }
    }

    let mut chapter = Chapter {
        id: format!("ch{}", c),
        number: c,
        title: markers.title.to_string(),
        intro,
        problems,
        metadata: ChapterMetadata {
            extraction_date: extracted_at.to_string(),
            total_problems: 0,
            total_prompts: 0,
            total_failure_modes: 0,
        },
    };
    chapter.metadata.total_problems = chapter.problems.len();
    chapter.metadata.total_prompts = chapter.prompt_count();
    chapter.metadata.total_failure_modes = chapter.failure_mode_count();
    Ok(chapter)
}

/// Slice of `chapter_text` from `PROBLEM c.n` up to the next problem's heading.
pub fn problem_slice(chapter_text: &str, chapter: u32, n: u32) -> Option<&str> {
    let start = chapter_text.find(&format!("PROBLEM {}.{}\n", chapter, n))?;
    let end = find_from(chapter_text, &format!("\n\nPROBLEM {}.{}", chapter, n + 1), start)
        .unwrap_or(chapter_text.len());
    Some(&chapter_text[start..end])
}

// ── Tests ──
