use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

pub const BOOK_PATH: &str = "AI SOLVED BUSINESS PROBLEMS.txt";
pub const OUTPUT_PATH: &str = "data/ustav.json";

/// Read the whole book into memory.
pub fn load_book(path: &Path) -> Result<String> {
    info!("Loading USTAV book from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to load book {}", path.display()))?;
    info!("✓ Book loaded: {} characters", text.chars().count());
    Ok(text)
}

/// Pretty-print `value` as JSON (2-space indent, non-ASCII left as-is) and
/// overwrite `path`, creating parent directories. Returns bytes written.
pub fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<u64> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, &json).with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(json.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("ustav.json");
        let size = save_document(&path, &serde_json::json!({ "a": 1 })).unwrap();
        assert!(path.exists());
        assert_eq!(size, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn output_is_indented_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_document(&path, &serde_json::json!({ "quote": "confidence ≥0.85", "list": [1] })).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("≥0.85"));
        assert!(text.contains("\n  \"quote\": "));
        assert!(text.contains("\n    1\n"));
    }

    #[test]
    fn missing_book_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_book(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to load book"));
    }
}
