//! Keyword matching
//!
//! Weighted match of job keywords against resume text. Technical terms
//! weigh more; multi-word keywords may match by proximity, single words by
//! fuzzy similarity.

use regex::RegexBuilder;
use tracing::debug;

use crate::utils::constants::{
    CLOUD_BONUS, CLOUD_TERMS, FRAMEWORK_BONUS, FRAMEWORK_TERMS, KEYWORD_CONTEXT_SECTIONS,
    TECH_BONUS, TECH_TERMS,
};
use crate::utils::text::{normalize_for_matching, sequence_ratio};

/// Max byte distance between the parts of a multi-word keyword
const PROXIMITY_WINDOW: usize = 50;
const PROXIMITY_FACTOR: f64 = 0.9;
const PARTIAL_FACTOR: f64 = 0.7;
/// Share of parts needed for a partial multi-word match
const PARTIAL_SHARE: f64 = 0.7;
const FUZZY_FACTOR: f64 = 0.6;
const FUZZY_THRESHOLD: f64 = 0.8;
const MAX_DENSITY_BONUS: f64 = 0.3;
const SECTION_BONUS: f64 = 0.1;

/// Importance of a (lower-cased) keyword
pub fn keyword_weight(keyword: &str) -> f64 {
    let mut weight = 1.0;
    if TECH_TERMS.iter().any(|t| keyword.contains(t)) {
        weight += TECH_BONUS;
    }
    if FRAMEWORK_TERMS.iter().any(|t| keyword.contains(t)) {
        weight += FRAMEWORK_BONUS;
    }
    if CLOUD_TERMS.iter().any(|t| keyword.contains(t)) {
        weight += CLOUD_BONUS;
    }
    weight
}

/// Credit earned by one keyword, `None` when it does not match at all
fn match_keyword(keyword: &str, weight: f64, clean: &str, padded: &str) -> Option<f64> {
    if padded.contains(&format!(" {} ", keyword)) {
        return Some(weight);
    }

    let parts: Vec<&str> = keyword.split_whitespace().collect();
    if parts.len() > 1 {
        let long_parts: Vec<&str> = parts.iter().copied().filter(|p| p.len() > 3).collect();

        if !long_parts.is_empty() {
            let positions: Option<Vec<usize>> = long_parts.iter().map(|p| clean.find(p)).collect();
            if let Some(positions) = positions {
                let min = positions.iter().min().copied().unwrap_or(0);
                let max = positions.iter().max().copied().unwrap_or(0);
                if max - min < PROXIMITY_WINDOW {
                    return Some(weight * PROXIMITY_FACTOR);
                }
            }
        }

        if parts.len() > 2 {
            let present = long_parts.iter().filter(|p| clean.contains(*p)).count();
            if present as f64 >= parts.len() as f64 * PARTIAL_SHARE {
                return Some(weight * PARTIAL_FACTOR);
            }
        }
    } else if keyword.chars().count() > 3 {
        let fuzzy = clean
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .any(|w| sequence_ratio(keyword, w) > FUZZY_THRESHOLD);
        if fuzzy {
            return Some(weight * FUZZY_FACTOR);
        }
    }

    None
}

/// Header lines of the experience/skills/projects sections that mention a
/// matched keyword, each worth a small bonus
fn section_context_bonus(text: &str, matched: &[&str]) -> f64 {
    let mut bonus = 0.0;
    for section in KEYWORD_CONTEXT_SECTIONS {
        let Ok(re) = RegexBuilder::new(&format!(r"\n\s*{}.*?\n", regex::escape(section)))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        if let Some(m) = re.find(text) {
            let header = m.as_str().to_lowercase();
            if matched.iter().any(|kw| header.contains(kw)) {
                bonus += SECTION_BONUS;
            }
        }
    }
    bonus
}

/// Keyword match score in [0, 1]
pub fn check_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let clean = normalize_for_matching(text);
    let padded = format!(" {} ", clean);

    // duplicate keywords (after lower-casing) count once toward the weights
    let mut weighted: Vec<(String, f64)> = Vec::with_capacity(keywords.len());
    for kw in keywords {
        let kw = kw.as_ref().to_lowercase();
        if !weighted.iter().any(|(k, _)| *k == kw) {
            let weight = keyword_weight(&kw);
            weighted.push((kw, weight));
        }
    }

    let total_weight: f64 = weighted.iter().map(|(_, w)| w).sum();
    if total_weight == 0.0 {
        return 0.0;
    }

    let mut earned = 0.0;
    let mut matched: Vec<&str> = Vec::new();
    for (kw, weight) in &weighted {
        if let Some(credit) = match_keyword(kw, *weight, &clean, &padded) {
            earned += credit;
            matched.push(kw.as_str());
        }
    }

    let density = matched.len() as f64 / keywords.len().max(1) as f64;
    let density_bonus = (density * 0.5).min(MAX_DENSITY_BONUS);
    let context_bonus = if matched.is_empty() {
        0.0
    } else {
        section_context_bonus(text, &matched)
    };

    debug!(
        matched = matched.len(),
        total = weighted.len(),
        "keyword match"
    );

    (earned / total_weight + density_bonus + context_bonus).min(1.0)
}
