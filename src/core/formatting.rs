//! Formatting heuristics
//!
//! ATS parsers favour bulleted lists, clear headers, consistent dates and
//! visible contact details. Each family contributes a capped share.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBERED_BULLET: Regex = Regex::new(r"\n\s*\d+\.").expect("valid regex");
    static ref HEADER_PATTERNS: Vec<Regex> = [
        r"\n[A-Z][A-Z\s]+:",
        r"\n[A-Z][A-Z\s]+\n",
        r"\n[A-Z][a-z]+\s[A-Z][a-z]+:",
        r"\n\s*\d+\.\s*[A-Z][a-z]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect();
    static ref DATE_PATTERNS: Vec<Regex> = [
        r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{4}\b",
        r"\b\d{2}/\d{2}/\d{4}\b",
        r"\b\d{4}-\d{2}-\d{2}\b",
        r"\b\d{4}\s*-\s*(?:Present|Current|Now)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect();
    static ref CONTACT_PATTERNS: Vec<Regex> = [
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        r"\b(?:\+\d{1,3}\s?)?(?:\(\d{3}\)|\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
        r"linkedin\.com/in/[a-zA-Z0-9_-]+",
        r"github\.com/[a-zA-Z0-9_-]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect();
}

const DATE_STEP: f64 = 0.05;
const CONTACT_STEP: f64 = 0.05;
const DATE_CAP: f64 = 0.15;
const CONTACT_CAP: f64 = 0.15;

/// Bullet markers plus numbered list lines
pub fn count_bullets(text: &str) -> usize {
    let markers =
        text.matches('•').count() + text.matches("- ").count() + text.matches("* ").count();
    markers + NUMBERED_BULLET.find_iter(text).count()
}

pub fn count_headers(text: &str) -> usize {
    HEADER_PATTERNS
        .iter()
        .map(|re| re.find_iter(text).count())
        .sum()
}

/// Tiered credit shared by bullets and headers
fn tier(count: usize, high: usize, mid: usize) -> f64 {
    if count >= high {
        0.35
    } else if count >= mid {
        0.25
    } else if count > 0 {
        0.15
    } else {
        0.0
    }
}

/// Formatting score in [0, 1]
///
/// Expects the original casing: header and date patterns are
/// case-sensitive.
pub fn check_formatting(text: &str) -> f64 {
    let mut score = tier(count_bullets(text), 10, 5);
    score += tier(count_headers(text), 5, 3);

    let dates = DATE_PATTERNS.iter().filter(|re| re.is_match(text)).count();
    score += (dates as f64 * DATE_STEP).min(DATE_CAP);

    let contacts = CONTACT_PATTERNS.iter().filter(|re| re.is_match(text)).count();
    score += (contacts as f64 * CONTACT_STEP).min(CONTACT_CAP);

    score.min(1.0)
}
