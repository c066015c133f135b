//! Type definitions for Ruster ATS
//! Core data structures shared by the scoring engine, CLI and API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resume sections the engine looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Summary,
    Projects,
    Achievements,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Summary,
        SectionKind::Projects,
        SectionKind::Achievements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Summary => "summary",
            SectionKind::Projects => "projects",
            SectionKind::Achievements => "achievements",
        }
    }

    /// Contribution of this section to the section score
    pub fn weight(&self) -> f64 {
        match self {
            SectionKind::Experience => 0.25,
            SectionKind::Education => 0.20,
            SectionKind::Skills => 0.20,
            SectionKind::Summary => 0.15,
            SectionKind::Projects => 0.10,
            SectionKind::Achievements => 0.10,
        }
    }
}

/// ATS compatibility band for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtsLevel {
    /// Below 40: likely filtered out
    Poor,
    /// 40-59: passes some filters
    Fair,
    /// 60-79: competitive
    Good,
    /// 80+: strong match
    Excellent,
}

impl AtsLevel {
    pub const ALL: [AtsLevel; 4] = [
        AtsLevel::Poor,
        AtsLevel::Fair,
        AtsLevel::Good,
        AtsLevel::Excellent,
    ];

    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            AtsLevel::Excellent
        } else if score >= 60.0 {
            AtsLevel::Good
        } else if score >= 40.0 {
            AtsLevel::Fair
        } else {
            AtsLevel::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AtsLevel::Poor => "POOR",
            AtsLevel::Fair => "FAIR",
            AtsLevel::Good => "GOOD",
            AtsLevel::Excellent => "EXCELLENT",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AtsLevel::Poor => "🔴",
            AtsLevel::Fair => "🟠",
            AtsLevel::Good => "🟡",
            AtsLevel::Excellent => "✅",
        }
    }
}

/// Structure/format review of a resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatAnalysis {
    /// 0-100
    pub score: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Word-level content comparison against the job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Number of job words also present in the resume
    pub keyword_match: usize,
    /// Job words absent from the resume, sorted
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Full ATS report for one resume against one job description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub report_id: Uuid,
    /// 0-100
    pub ats_score: f64,
    pub level: AtsLevel,
    /// True when the word-overlap fallback produced the score
    pub used_fallback: bool,
    pub format_analysis: FormatAnalysis,
    pub content_analysis: ContentAnalysis,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
}

impl AtsReport {
    /// Report with a score and analyses but no insights yet
    pub fn new(
        ats_score: f64,
        used_fallback: bool,
        format_analysis: FormatAnalysis,
        content_analysis: ContentAnalysis,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            ats_score,
            level: AtsLevel::from_score(ats_score),
            used_fallback,
            format_analysis,
            content_analysis,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            improvements: Vec::new(),
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} ATS {:.2}/100 [{}]{} | {} strengths, {} weaknesses",
            self.level.emoji(),
            self.ats_score,
            self.level.as_str(),
            if self.used_fallback { " (basic)" } else { "" },
            self.strengths.len(),
            self.weaknesses.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_weights_sum_to_one() {
        let total: f64 = SectionKind::ALL.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(AtsLevel::from_score(0.0), AtsLevel::Poor);
        assert_eq!(AtsLevel::from_score(39.99), AtsLevel::Poor);
        assert_eq!(AtsLevel::from_score(40.0), AtsLevel::Fair);
        assert_eq!(AtsLevel::from_score(60.0), AtsLevel::Good);
        assert_eq!(AtsLevel::from_score(80.0), AtsLevel::Excellent);
        assert!(AtsLevel::Poor < AtsLevel::Excellent);
    }

    #[test]
    fn test_report_summary() {
        let report = AtsReport::new(
            72.5,
            true,
            FormatAnalysis {
                score: 50.0,
                issues: vec![],
                suggestions: vec![],
            },
            ContentAnalysis {
                keyword_match: 3,
                missing_keywords: vec![],
                suggestions: vec![],
            },
        );
        let summary = report.summary();
        assert!(summary.contains("72.50"));
        assert!(summary.contains("GOOD"));
        assert!(summary.contains("(basic)"));
    }
}
