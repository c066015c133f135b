//! ATS Keyword Scoring Module
//! Combines section, keyword, formatting and context checks into a 0-100 score
//!
//! The per-factor breakdown lets users see which part of the resume held the
//! score back.

use serde::{Deserialize, Serialize};

use crate::core::context::check_context_relevance;
use crate::core::formatting::check_formatting;
use crate::core::keywords::check_keywords;
use crate::core::sections::{check_sections, SectionReport};
use crate::models::types::AtsLevel;
use crate::utils::constants::{WEIGHT_CONTEXT, WEIGHT_FORMATTING, WEIGHT_KEYWORDS, WEIGHT_SECTIONS};
use crate::utils::text::round_to;

/// Keyword-driven ATS score (0-100)
/// - 80-100: Excellent
/// - 60-79: Good
/// - 40-59: Fair
/// - 0-39: Poor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordScore {
    /// Overall score, two decimals
    pub total: f64,
    pub components: AtsComponents,
    pub level: AtsLevel,
    /// Human-readable recommendation
    pub recommendation: String,
    pub breakdown: Vec<ScoreFactor>,
}

/// Component scores, each in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AtsComponents {
    pub sections: f64,
    pub keywords: f64,
    pub formatting: f64,
    pub context: f64,
}

/// Individual factor contributing to score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub name: String,
    /// Component value scaled to 0-100
    pub score: f64,
    pub weight: f64,
    pub reason: String,
}

impl KeywordScore {
    pub fn calculate(components: AtsComponents, factors: Vec<ScoreFactor>) -> Self {
        let weighted = components.sections * WEIGHT_SECTIONS
            + components.keywords * WEIGHT_KEYWORDS
            + components.formatting * WEIGHT_FORMATTING
            + components.context * WEIGHT_CONTEXT;

        let total = round_to(weighted * 100.0, 2);
        let level = AtsLevel::from_score(total);
        let recommendation = Self::generate_recommendation(level, &components);

        Self {
            total,
            components,
            level,
            recommendation,
            breakdown: factors,
        }
    }

    /// Score of a resume against an explicit keyword list
    pub fn evaluate<S: AsRef<str>>(resume_text: &str, keywords: &[S]) -> Self {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();

        if resume_text.is_empty() || keywords.is_empty() {
            return AtsScoreBuilder::new().build();
        }

        let lowered = resume_text.to_lowercase();
        AtsScoreBuilder::new()
            .with_sections(&check_sections(&lowered))
            .with_keywords(check_keywords(&lowered, &keywords), keywords.len())
            .with_formatting(check_formatting(&lowered))
            .with_context(check_context_relevance(&lowered, &keywords))
            .build()
    }

    fn generate_recommendation(level: AtsLevel, components: &AtsComponents) -> String {
        let headline = match level {
            AtsLevel::Excellent => "✅ EXCELLENT",
            AtsLevel::Good => "🟡 GOOD",
            AtsLevel::Fair => "🟠 FAIR",
            AtsLevel::Poor => "🔴 POOR",
        };

        let action = match level {
            AtsLevel::Excellent => "Resume is well aligned with the job keywords.",
            AtsLevel::Good => "Competitive. Tighten wording around the weakest factor.",
            AtsLevel::Fair => "Likely to pass some filters. Add missing keywords and clearer sections.",
            AtsLevel::Poor => "Likely to be filtered out. Rework the resume for this role.",
        };

        match Self::weakest_factor(components) {
            Some(weakest) if level != AtsLevel::Excellent => {
                format!("{} - {} Weakest factor: {}.", headline, action, weakest)
            }
            _ => format!("{} - {}", headline, action),
        }
    }

    fn weakest_factor(components: &AtsComponents) -> Option<&'static str> {
        [
            ("sections", components.sections),
            ("keywords", components.keywords),
            ("formatting", components.formatting),
            ("context", components.context),
        ]
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
    }
}

/// Heuristic ATS score of `resume_text` for `keywords`, 0-100 with two decimals
pub fn ats_score<S: AsRef<str>>(resume_text: &str, keywords: &[S]) -> f64 {
    KeywordScore::evaluate(resume_text, keywords).total
}

/// Builder for keyword scores from individual check results
pub struct AtsScoreBuilder {
    factors: Vec<ScoreFactor>,
    components: AtsComponents,
}

impl AtsScoreBuilder {
    pub fn new() -> Self {
        Self {
            factors: Vec::new(),
            components: AtsComponents::default(),
        }
    }

    /// Add section detection result
    pub fn with_sections(mut self, report: &SectionReport) -> Self {
        let missing = report.missing();
        self.components.sections = report.total;
        self.factors.push(ScoreFactor {
            name: "Section coverage".to_string(),
            score: round_to(report.total * 100.0, 2),
            weight: WEIGHT_SECTIONS,
            reason: if missing.is_empty() {
                "All expected sections present".to_string()
            } else {
                format!(
                    "Missing: {}",
                    missing
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            },
        });
        self
    }

    /// Add keyword match result
    pub fn with_keywords(mut self, score: f64, keyword_count: usize) -> Self {
        self.components.keywords = score;
        self.factors.push(ScoreFactor {
            name: "Keyword match".to_string(),
            score: round_to(score * 100.0, 2),
            weight: WEIGHT_KEYWORDS,
            reason: format!("{} job keywords weighed by importance", keyword_count),
        });
        self
    }

    pub fn with_formatting(mut self, score: f64) -> Self {
        self.components.formatting = score;
        self.factors.push(ScoreFactor {
            name: "Formatting".to_string(),
            score: round_to(score * 100.0, 2),
            weight: WEIGHT_FORMATTING,
            reason: "Bullets, headers, dates and contact details".to_string(),
        });
        self
    }

    pub fn with_context(mut self, score: f64) -> Self {
        self.components.context = score;
        self.factors.push(ScoreFactor {
            name: "Contextual relevance".to_string(),
            score: round_to(score * 100.0, 2),
            weight: WEIGHT_CONTEXT,
            reason: "Keywords inside experience, skills, projects and education".to_string(),
        });
        self
    }

    pub fn build(self) -> KeywordScore {
        KeywordScore::calculate(self.components, self.factors)
    }
}

impl Default for AtsScoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\njane@example.com | github.com/jdoe\n\n\
SUMMARY:\nBackend engineer focused on Python and AWS.\n\n\
EXPERIENCE:\n- Built Python APIs on AWS Lambda (2019 - Present)\n\
- Ran Docker and Kubernetes clusters\n- Wrote SQL reporting jobs\n\n\
EDUCATION:\n- Bachelor of Science, Computer Science\n\n\
SKILLS:\n- Python, SQL, Docker, Kubernetes, AWS\n\n\
PROJECTS:\n- Open-source tracing library\n\n\
ACHIEVEMENTS:\n- Speaker at PyCon\n";

    #[test]
    fn test_empty_inputs_score_zero() {
        let none: [&str; 0] = [];
        assert_eq!(ats_score("", &["python"]), 0.0);
        assert_eq!(ats_score(RESUME, &none), 0.0);
        assert_eq!(ats_score(RESUME, &["  ", ""]), 0.0);
    }

    #[test]
    fn test_strong_resume() {
        let score = KeywordScore::evaluate(RESUME, &["python", "aws", "docker", "kubernetes", "sql"]);
        assert!(score.total >= 60.0, "score was {}", score.total);
        assert!(score.total <= 100.0);
        assert_eq!(score.breakdown.len(), 4);
        assert!(score.level >= AtsLevel::Good);
    }

    #[test]
    fn test_weak_resume() {
        let score = KeywordScore::evaluate("i like cooking", &["rust", "kubernetes", "terraform"]);
        assert!(score.total < 40.0);
        assert_eq!(score.level, AtsLevel::Poor);
        assert!(score.recommendation.contains("POOR"));
        assert!(score.recommendation.contains("Weakest factor"));
    }

    #[test]
    fn test_builder_weights() {
        let score = AtsScoreBuilder::new()
            .with_keywords(1.0, 3)
            .with_formatting(0.5)
            .build();
        // 0.35 + 0.10
        assert!((score.total - 45.0).abs() < 1e-9);
        assert_eq!(score.level, AtsLevel::Fair);
    }

    #[test]
    fn test_total_has_two_decimals() {
        let score = ats_score(RESUME, &["python", "golang"]);
        assert_eq!(score, round_to(score, 2));
    }
}
