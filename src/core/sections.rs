//! Section detection
//!
//! Scores how completely a resume covers the sections an ATS expects.
//! A clear header earns full credit, a keyword inside a substantive line
//! earns partial credit.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::types::SectionKind;
use crate::utils::constants::section_keywords;

/// Credit for a detected header
pub const HEADER_SCORE: f64 = 1.0;
/// Credit for a keyword found only in body content
pub const CONTENT_SCORE: f64 = 0.7;

/// How a section was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPresence {
    Header,
    Content,
    Missing,
}

impl SectionPresence {
    pub fn score(&self) -> f64 {
        match self {
            SectionPresence::Header => HEADER_SCORE,
            SectionPresence::Content => CONTENT_SCORE,
            SectionPresence::Missing => 0.0,
        }
    }
}

/// Per-section findings and the weighted total in [0, 1]
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub sections: HashMap<SectionKind, SectionPresence>,
    pub total: f64,
}

impl SectionReport {
    pub fn presence(&self, section: SectionKind) -> SectionPresence {
        self.sections
            .get(&section)
            .copied()
            .unwrap_or(SectionPresence::Missing)
    }

    pub fn missing(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|s| self.presence(*s) == SectionPresence::Missing)
            .collect()
    }
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// Header shapes a keyword may appear in
fn header_patterns(keyword: &str) -> [String; 5] {
    let k = regex::escape(keyword);
    [
        format!(r"\b({k})\s*:"),
        format!(r"\n\s*({k})\s*\n"),
        format!(r"\n\s*({k})\s*[^\n]*\n\s*[-•*]"),
        format!(r"\n\s*({k})\s*[^\n]*\n\s*[A-Z]"),
        format!(r"\n\s*({k})\s*[^\n]*\n\s*\d+\."),
    ]
}

/// Compiled matchers for one section keyword
struct KeywordMatcher {
    keyword: &'static str,
    headers: Vec<Regex>,
    content_line: Option<Regex>,
}

impl KeywordMatcher {
    fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            headers: header_patterns(keyword)
                .iter()
                .filter_map(|p| case_insensitive(p))
                .collect(),
            content_line: case_insensitive(&format!(r"\n.*?{}.*?\n", regex::escape(keyword))),
        }
    }

    fn is_header(&self, text: &str) -> bool {
        self.headers.iter().any(|re| re.is_match(text))
    }

    /// Keyword sits inside a line with more than a bare label
    fn is_content(&self, text: &str, lowered: &str) -> bool {
        if !lowered.contains(self.keyword) {
            return false;
        }
        self.content_line
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str().trim().chars().count() > self.keyword.chars().count() + 5)
            .unwrap_or(false)
    }
}

lazy_static! {
    static ref SECTION_MATCHERS: HashMap<SectionKind, Vec<KeywordMatcher>> = SectionKind::ALL
        .into_iter()
        .map(|section| {
            let matchers = section_keywords(section)
                .iter()
                .copied()
                .map(KeywordMatcher::new)
                .collect();
            (section, matchers)
        })
        .collect();
}

pub fn detect_section(text: &str, section: SectionKind) -> SectionPresence {
    detect_with(text, &text.to_lowercase(), section)
}

fn detect_with(text: &str, lowered: &str, section: SectionKind) -> SectionPresence {
    let Some(matchers) = SECTION_MATCHERS.get(&section) else {
        return SectionPresence::Missing;
    };
    if matchers.iter().any(|m| m.is_header(text)) {
        SectionPresence::Header
    } else if matchers.iter().any(|m| m.is_content(text, lowered)) {
        SectionPresence::Content
    } else {
        SectionPresence::Missing
    }
}

/// Detect every section and compute the weighted score
pub fn check_sections(text: &str) -> SectionReport {
    let lowered = text.to_lowercase();
    let mut sections = HashMap::with_capacity(SectionKind::ALL.len());
    let mut total = 0.0;

    for section in SectionKind::ALL {
        let presence = detect_with(text, &lowered, section);
        total += presence.score() * section.weight();
        sections.insert(section, presence);
    }

    SectionReport { sections, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESUME: &str = "Jane Doe\n\
Summary:\nBackend engineer with 6 years building APIs.\n\
Experience\n- Built payment services in Rust\n- Led migration to Kubernetes\n\
Education\nBachelor of Science, Computer Science\n\
Skills:\nRust, Python, SQL\n\
Projects\n1. Open-source tracing library\n\
Achievements\n- Speaker at RustConf\n";

    #[test]
    fn test_full_resume_scores_one() {
        let report = check_sections(FULL_RESUME);
        for section in SectionKind::ALL {
            assert_eq!(report.presence(section), SectionPresence::Header, "{:?}", section);
        }
        assert!((report.total - 1.0).abs() < 1e-9);
        assert!(report.missing().is_empty());
    }

    #[test]
    fn test_content_only_detection() {
        // "university" only appears inside a sentence, never as a header
        let text = "Intro line\nI studied physics at a large university in Ohio\nend\n";
        assert_eq!(detect_section(text, SectionKind::Education), SectionPresence::Content);
    }

    #[test]
    fn test_bare_keyword_line_is_not_content() {
        // line too short to count as content and not a header shape
        let matcher = KeywordMatcher::new("awards");
        assert!(!matcher.is_content("x\nawards\n", "x\nawards\n"));
        assert!(matcher.is_content("x\nwon three awards for design\n", "x\nwon three awards for design\n"));
    }

    #[test]
    fn test_content_line_length_counts_characters() {
        // 10 characters but 13 bytes: still too short to count as content
        let matcher = KeywordMatcher::new("awards");
        let text = "x\nééé awards\n";
        assert!(!matcher.is_content(text, text));
        assert!(matcher.is_content("x\nééééé awards\n", "x\nééééé awards\n"));
    }

    #[test]
    fn test_missing_sections() {
        let report = check_sections("just a name and a phone number");
        assert_eq!(report.total, 0.0);
        assert_eq!(report.missing().len(), 6);
    }

    #[test]
    fn test_weighted_total() {
        let text = "\nExperience\n- did things\n\nSkills:\nrust\n";
        let report = check_sections(text);
        assert_eq!(report.presence(SectionKind::Experience), SectionPresence::Header);
        assert_eq!(report.presence(SectionKind::Skills), SectionPresence::Header);
        assert!(report.total >= 0.45 - 1e-9);
    }

    #[test]
    fn test_keyword_is_escaped() {
        // regex metacharacters in keywords must not break matching
        let matcher = KeywordMatcher::new("c++");
        assert!(!matcher.is_header("c++ developer"));
        assert!(matcher.is_header("c++: expert"));
    }
}
