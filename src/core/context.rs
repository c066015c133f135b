//! Contextual relevance
//!
//! Keywords count for more when they appear inside the experience or
//! skills sections rather than anywhere in the document.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::utils::constants::CONTEXT_SECTIONS;

lazy_static! {
    /// Start of the next section: a capitalised line ending in ':' or the text
    static ref NEXT_SECTION: Regex = RegexBuilder::new(r"\n\s*[A-Z][A-Z\s]+\s*(?::|$)")
        .case_insensitive(true)
        .build()
        .expect("valid regex");
}

/// Byte range of the section whose header line mentions `name`
pub fn section_span(text: &str, name: &str) -> Option<(usize, usize)> {
    let header = RegexBuilder::new(&format!(r"\n\s*{}.*?\n", regex::escape(name)))
        .case_insensitive(true)
        .build()
        .ok()?;
    let start = header.find(text)?.start();

    // start is a '\n', so start + 1 is a char boundary
    let end = NEXT_SECTION
        .find(&text[start + 1..])
        .map(|m| start + 1 + m.start())
        .unwrap_or(text.len());

    Some((start, end))
}

/// Context score in [0, 1]
pub fn check_context_relevance<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let lowered: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    let mut score = 0.0;

    for (name, weight) in CONTEXT_SECTIONS {
        let Some((start, end)) = section_span(text, name) else {
            continue;
        };
        let section = text[start..end].to_lowercase();
        let found = lowered.iter().filter(|kw| section.contains(kw.as_str())).count();
        score += found as f64 / keywords.len() as f64 * weight;
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keywords() {
        let none: Vec<String> = vec![];
        assert_eq!(check_context_relevance("\nexperience\nrust\n", &none), 0.0);
    }

    #[test]
    fn test_section_span_stops_at_next_header() {
        let text = "name\nexperience\n- built rust services, 2019.\nEDUCATION:\nbsc 2015.\n";
        let (start, end) = section_span(text, "experience").unwrap();
        let section = &text[start..end];
        assert!(section.contains("rust"));
        assert!(!section.contains("bsc"));
    }

    #[test]
    fn test_section_runs_to_end_without_next_header() {
        let text = "name\nskills\nrust, sql\n";
        let (_, end) = section_span(text, "skill").unwrap();
        assert_eq!(end, text.len());
    }

    #[test]
    fn test_weights_by_section() {
        // keyword only in the experience section: 1/1 * 0.4
        let text = "name\nexperience\n- wrote rust daily.\nEDUCATION:\n- physics, 2015.\n";
        let score = check_context_relevance(text, &["rust"]);
        assert!((score - 0.4).abs() < 1e-9, "score was {}", score);

        // keyword only in education: 1/1 * 0.2
        let score = check_context_relevance(text, &["physics"]);
        assert!((score - 0.2).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_letters_only_line_closes_section() {
        // the boundary is case-insensitive, so a plain prose line ending the
        // text also counts as the next header
        let text = "x\nexperience\nwrote rust daily";
        let (start, end) = section_span(text, "experience").unwrap();
        assert_eq!(&text[start..end], "\nexperience");
    }

    #[test]
    fn test_missing_sections_score_zero() {
        assert_eq!(check_context_relevance("plain text", &["rust"]), 0.0);
    }
}
