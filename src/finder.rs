use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

pub const PREFACE_PATH: &str = "C:/PRIVATE/AI/AISBS/AI SOLVED BUSINESS PROBLEMS PREFACE.txt";

pub const SECTION_KEYWORDS: &[&str] = &[
    "INDEX OF TERMS",
    "MASTER BIBLIOGRAPHY",
    "PREFACE",
    "AI SOLVED BUSINESS PROBLEMS",
    "AFTERWORD",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SectionHit {
    pub keyword: &'static str,
    /// 1-based.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for SectionHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Line {}): {}", self.keyword, self.line, self.text)
    }
}

/// Every (line, keyword) pair where the line contains the keyword, in file order.
pub fn scan<R: BufRead>(reader: R) -> Result<Vec<SectionHit>> {
    let mut hits = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        for keyword in SECTION_KEYWORDS.iter().copied().filter(|k| line.contains(k)) {
            hits.push(SectionHit {
                keyword,
                line: i + 1,
                text: line.trim().to_string(),
            });
        }
    }
    Ok(hits)
}

pub fn scan_file(path: &Path) -> Result<Vec<SectionHit>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    scan(BufReader::new(file))
}
