//! Resume insights
//!
//! Compares skills, experience and education found in a resume with what a
//! job description asks for, and turns the gaps into readable strengths,
//! weaknesses and improvement suggestions.

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::core::formatting::check_formatting;
use crate::core::sections::check_sections;
use crate::utils::constants::{DegreeLevel, DEGREE_PATTERNS, SKILL_VOCABULARY};

/// Minimum formatting and section score for a well-formatted resume
const WELL_FORMATTED_THRESHOLD: f64 = 0.5;

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid regex")
}

lazy_static! {
    /// Each skill bounded so that "java" does not match inside "javascript"
    static ref SKILL_MATCHERS: Vec<(&'static str, Regex)> = SKILL_VOCABULARY
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?:^|[^a-z0-9+#]){}(?:$|[^a-z0-9+#])", regex::escape(skill));
            (*skill, ci(&pattern))
        })
        .collect();

    static ref REQUIRED_YEARS: Regex =
        ci(r"\b(\d{1,2})\s*(?:\+|(?:-|–|to)\s*\d{1,2})?\s*\+?\s*(?:years?|yrs?)\b");
    static ref MENTIONED_YEARS: Regex = ci(r"\b(\d{1,2})\+?\s*(?:years?|yrs?)\b");
    static ref YEAR_RANGE: Regex = ci(
        r"\b((?:19|20)\d{2})\s*(?:-|–|to)\s*((?:19|20)\d{2}|present|current|now)\b"
    );
    static ref DEGREE_MATCHERS: Vec<(DegreeLevel, Regex)> = DEGREE_PATTERNS
        .iter()
        .map(|(level, pattern)| (*level, ci(pattern)))
        .collect();
}

fn find_skills(text: &str) -> Vec<String> {
    SKILL_MATCHERS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

/// Skills from the known vocabulary that the job description asks for
pub fn extract_required_skills(job_description: &str) -> Vec<String> {
    find_skills(job_description)
}

/// Skills from the known vocabulary listed in the resume
pub fn extract_skills(resume_text: &str) -> Vec<String> {
    find_skills(resume_text)
}

/// Smallest "N+ years" or "N-M years" figure in a job description, 0 if none
pub fn extract_experience_level(job_description: &str) -> u32 {
    REQUIRED_YEARS
        .captures_iter(job_description)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .min()
        .unwrap_or(0)
}

/// Years of experience claimed by a resume
///
/// Takes the larger of the biggest explicit "N years" mention and the sum
/// of all year ranges. Open ranges end in the current year.
pub fn extract_experience_years(resume_text: &str) -> u32 {
    let mentioned = MENTIONED_YEARS
        .captures_iter(resume_text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    let current_year = Utc::now().year() as u32;
    let ranged: u32 = YEAR_RANGE
        .captures_iter(resume_text)
        .filter_map(|c| {
            let start = c.get(1)?.as_str().parse::<u32>().ok()?;
            let end = match c.get(2)?.as_str().parse::<u32>() {
                Ok(year) => year,
                Err(_) => current_year,
            };
            end.checked_sub(start)
        })
        .sum();

    mentioned.max(ranged)
}

fn find_degrees(text: &str) -> Vec<DegreeLevel> {
    DEGREE_MATCHERS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .collect()
}

/// Degree levels a job description mentions, lowest first
pub fn extract_education_requirements(job_description: &str) -> Vec<DegreeLevel> {
    find_degrees(job_description)
}

/// Degree levels a resume mentions, lowest first
pub fn extract_education(resume_text: &str) -> Vec<DegreeLevel> {
    find_degrees(resume_text)
}

/// `None` when the job names no degree
///
/// Otherwise the highest degree held must reach the lowest degree asked for.
pub fn meets_education(required: &[DegreeLevel], held: &[DegreeLevel]) -> Option<bool> {
    let lowest_required = required.iter().min()?;
    Some(held.iter().max().is_some_and(|h| h >= lowest_required))
}

pub fn is_well_formatted(resume_text: &str) -> bool {
    check_formatting(resume_text) >= WELL_FORMATTED_THRESHOLD
        && check_sections(resume_text).total >= WELL_FORMATTED_THRESHOLD
}

/// Facts extracted once from a resume/job pair
#[derive(Debug, Clone, Serialize)]
pub struct ResumeInsights {
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub required_years: u32,
    pub resume_years: u32,
    pub required_education: Vec<DegreeLevel>,
    pub education: Vec<DegreeLevel>,
    pub well_formatted: bool,
}

impl ResumeInsights {
    pub fn analyze(resume_text: &str, job_description: &str) -> Self {
        let resume_skills = extract_skills(resume_text);
        let (matching_skills, missing_skills) = extract_required_skills(job_description)
            .into_iter()
            .partition(|skill| resume_skills.contains(skill));

        Self {
            matching_skills,
            missing_skills,
            required_years: extract_experience_level(job_description),
            resume_years: extract_experience_years(resume_text),
            required_education: extract_education_requirements(job_description),
            education: extract_education(resume_text),
            well_formatted: is_well_formatted(resume_text),
        }
    }

    fn education_met(&self) -> Option<bool> {
        meets_education(&self.required_education, &self.education)
    }

    fn below_experience(&self) -> bool {
        self.resume_years < self.required_years
    }

    pub fn strengths(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.matching_skills.is_empty() {
            out.push(format!(
                "Strong match with required skills: {}",
                self.matching_skills.join(", ")
            ));
        }
        if self.required_years > 0 && !self.below_experience() {
            out.push(format!(
                "Meets or exceeds required experience level ({} years)",
                self.required_years
            ));
        }
        if self.education_met() == Some(true) {
            out.push("Meets education requirements".to_string());
        }
        if self.well_formatted {
            out.push("Well-formatted resume with clear sections".to_string());
        }
        out
    }

    pub fn weaknesses(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.missing_skills.is_empty() {
            out.push(format!(
                "Missing required skills: {}",
                self.missing_skills.join(", ")
            ));
        }
        if self.below_experience() {
            out.push(format!(
                "Below required experience level ({} years)",
                self.required_years
            ));
        }
        if self.education_met() == Some(false) {
            out.push("Does not meet education requirements".to_string());
        }
        if !self.well_formatted {
            out.push("Resume format could be improved".to_string());
        }
        out
    }

    pub fn improvements(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.missing_skills.is_empty() {
            out.push(format!(
                "Add missing required skills: {}",
                self.missing_skills.join(", ")
            ));
        }
        if self.below_experience() {
            out.push(format!(
                "Highlight relevant experience to meet {} years requirement",
                self.required_years
            ));
        }
        if self.education_met() == Some(false) {
            let wanted: Vec<&str> = self.required_education.iter().map(|d| d.as_str()).collect();
            out.push(format!("Consider adding {} education", wanted.join(", ")));
        }
        if !self.well_formatted {
            out.push(
                "Improve resume formatting with clear sections and bullet points".to_string(),
            );
        }
        out
    }
}

pub fn identify_strengths(resume_text: &str, job_description: &str) -> Vec<String> {
    ResumeInsights::analyze(resume_text, job_description).strengths()
}

pub fn identify_weaknesses(resume_text: &str, job_description: &str) -> Vec<String> {
    ResumeInsights::analyze(resume_text, job_description).weaknesses()
}

pub fn suggest_improvements(resume_text: &str, job_description: &str) -> Vec<String> {
    ResumeInsights::analyze(resume_text, job_description).improvements()
}
