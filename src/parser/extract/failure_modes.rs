use std::sync::LazyLock;

use regex::Regex;

use crate::document::{FailureMode, Recovery, RecoveryStep};
use crate::parser::markers::{capture_until, entries};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FAILURE MODE #?(\d+)\n([^\n]+)\n\n").unwrap());
static HEADER_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)FAILURE MODE").unwrap());

static SYMPTOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)What You See.*?Symptom[^\n]*\n").unwrap());
static SYMPTOM_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\n\nWhy It Happens").unwrap());

static ROOT_CAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Why It Happens.*?Root Cause[^\n]*\n").unwrap());
static ROOT_CAUSE_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\n\nHow to").unwrap());

static RECOVERY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)How to Recover[^\n]*\n").unwrap());
static RECOVERY_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\n\nEmail").unwrap());

static STEP_STOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\n\n|\w+-Term").unwrap());

const TIMEFRAMES: [&str; 3] = ["Immediate", "Short-Term", "Long-Term"];

static STEP_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    TIMEFRAMES.map(|t| Regex::new(&format!(r"(?i){}[^\n]*\n", regex::escape(t))).unwrap())
});

/// Parse the failure-mode records out of a problem's failure-mode section.
pub fn extract(section_text: &str, chapter: u32, problem: u32) -> Vec<FailureMode> {
    entries(section_text, &HEADER_RE, &HEADER_STOP_RE)
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            let number = i + 1;
            let body = e.body;
            let recovery = capture_until(body, &RECOVERY_RE, &RECOVERY_STOP_RE).unwrap_or("");
            FailureMode {
                id: format!("fm_ch{}_p{}_{:02}", chapter, problem, number),
                number,
                name: e.caps[2].trim().to_string(),
                symptom: trimmed(capture_until(body, &SYMPTOM_RE, &SYMPTOM_STOP_RE)),
                root_cause: trimmed(capture_until(body, &ROOT_CAUSE_RE, &ROOT_CAUSE_STOP_RE)),
                recovery: parse_recovery(recovery),
            }
        })
        .collect()
}

fn parse_recovery(text: &str) -> Recovery {
    let [immediate, short_term, long_term] = [0, 1, 2].map(|i| {
        let action = trimmed(capture_until(text, &STEP_RES[i], &STEP_STOP_RE));
        RecoveryStep {
            timeframe: TIMEFRAMES[i].to_string(),
            details: action.clone(),
            action,
        }
    });
    Recovery {
        immediate,
        short_term,
        long_term,
    }
}

fn trimmed(s: Option<&str>) -> String {
    s.map(|t| t.trim().to_string()).unwrap_or_default()
}
