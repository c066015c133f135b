//! Embedding-based ATS scorer
//!
//! Scores a resume against a job description by cosine similarity of their
//! sentence embeddings. Without a provider, or when the provider fails, it
//! falls back to word overlap so callers always get a report.

use std::collections::HashSet;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::core::insights::ResumeInsights;
use crate::models::config::ScorerConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AtsReport, ContentAnalysis, FormatAnalysis};
use crate::providers::embedding::EmbeddingProvider;
use crate::utils::constants::{BASIC_SCORE_FACTOR, REPORT_SECTIONS};
use crate::utils::text::{cosine_similarity, word_set};

/// Missing keywords quoted in the content suggestion
const SUGGESTED_KEYWORDS: usize = 5;

pub struct AtsScorer {
    provider: Option<EmbeddingProvider>,
}

impl AtsScorer {
    pub fn new(provider: Option<EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Scorer from config; a provider that fails to build leaves it uninitialized
    pub fn from_config(config: &ScorerConfig) -> Self {
        match EmbeddingProvider::from_config(config) {
            Ok(provider) => Self::new(provider),
            Err(e) => {
                error!("❌ Error initializing ATS scorer: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.as_ref().map(|p| p.name()).unwrap_or("none")
    }

    /// Score and analyses for one resume, without insights
    pub async fn calculate(&self, resume_text: &str, job_description: &str) -> AtsReport {
        let Some(provider) = &self.provider else {
            warn!("⚠️ ATS scorer not initialized, using basic scoring");
            return Self::basic_score(resume_text, job_description);
        };

        let texts = [resume_text.to_string(), job_description.to_string()];
        let embeddings = match provider.encode(&texts).await {
            Ok(e) => e,
            Err(e) => {
                error!("❌ Error calculating ATS score: {}", e);
                return Self::basic_score(resume_text, job_description);
            }
        };

        let [resume_vec, job_vec] = embeddings.as_slice() else {
            error!("❌ Error calculating ATS score: expected 2 embeddings");
            return Self::basic_score(resume_text, job_description);
        };

        let similarity = cosine_similarity(resume_vec, job_vec);
        AtsReport::new(
            similarity * 100.0,
            false,
            Self::analyze_format(resume_text),
            Self::analyze_content(resume_text, job_description),
        )
    }

    /// Word-overlap score used when embeddings are unavailable
    pub fn basic_score(resume_text: &str, job_description: &str) -> AtsReport {
        let resume_words = word_set(resume_text);
        let job_words = word_set(job_description);

        let common = resume_words.intersection(&job_words).count();
        let match_score = if job_words.is_empty() {
            0.0
        } else {
            common as f64 / job_words.len() as f64 * 100.0
        };

        AtsReport::new(
            match_score * BASIC_SCORE_FACTOR,
            true,
            FormatAnalysis {
                score: 50.0,
                issues: vec!["Basic analysis only".to_string()],
                suggestions: vec!["Try again later for detailed format analysis".to_string()],
            },
            ContentAnalysis {
                keyword_match: common,
                missing_keywords: sorted_missing(&job_words, &resume_words),
                suggestions: vec!["Add missing keywords to improve ATS score".to_string()],
            },
        )
    }

    pub fn analyze_format(resume_text: &str) -> FormatAnalysis {
        let lowered = resume_text.to_lowercase();
        let (found, missing): (Vec<&str>, Vec<&str>) = REPORT_SECTIONS
            .iter()
            .copied()
            .partition(|section| lowered.contains(section));

        let mut issues = Vec::new();
        if !missing.is_empty() {
            issues.push(format!("Missing sections: {}", missing.join(", ")));
        }

        FormatAnalysis {
            score: found.len() as f64 / REPORT_SECTIONS.len() as f64 * 100.0,
            issues,
            suggestions: vec![
                "Ensure all major sections are present".to_string(),
                "Use consistent formatting throughout".to_string(),
                "Include clear section headers".to_string(),
            ],
        }
    }

    pub fn analyze_content(resume_text: &str, job_description: &str) -> ContentAnalysis {
        let resume_words = word_set(resume_text);
        let job_words = word_set(job_description);
        let missing = sorted_missing(&job_words, &resume_words);

        let mut suggestions = Vec::new();
        if !missing.is_empty() {
            let head: Vec<&str> = missing
                .iter()
                .take(SUGGESTED_KEYWORDS)
                .map(String::as_str)
                .collect();
            suggestions.push(format!("Add these keywords: {}", head.join(", ")));
        }

        ContentAnalysis {
            keyword_match: resume_words.intersection(&job_words).count(),
            missing_keywords: missing,
            suggestions,
        }
    }
}

fn sorted_missing(job_words: &HashSet<String>, resume_words: &HashSet<String>) -> Vec<String> {
    let mut missing: Vec<String> = job_words.difference(resume_words).cloned().collect();
    missing.sort();
    missing
}

/// Full report: score, analyses, strengths, weaknesses and improvements
pub async fn calculate_ats_score(
    scorer: &AtsScorer,
    resume_text: &str,
    job_description: &str,
) -> AppResult<AtsReport> {
    if resume_text.trim().is_empty() {
        return Err(AppError::empty_resume());
    }
    if job_description.trim().is_empty() {
        return Err(AppError::empty_job());
    }

    let start = Instant::now();
    let mut report = scorer.calculate(resume_text, job_description).await;

    let insights = ResumeInsights::analyze(resume_text, job_description);
    report.strengths = insights.strengths();
    report.weaknesses = insights.weaknesses();
    report.improvements = insights.improvements();

    info!(
        "📊 ATS report {} in {}ms",
        report.summary(),
        start.elapsed().as_millis()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::providers::embedding::{HashingEmbedder, HttpEmbeddingClient};
    use std::time::Duration;

    const JOB: &str = "python developer with docker experience";

    #[test]
    fn test_basic_score() {
        let report = AtsScorer::basic_score("Python developer", JOB);
        // 2 of 5 job words
        assert!((report.ats_score - 32.0).abs() < 1e-9);
        assert!(report.used_fallback);
        assert_eq!(report.content_analysis.keyword_match, 2);
        assert_eq!(
            report.content_analysis.missing_keywords,
            vec!["docker", "experience", "with"]
        );
        assert_eq!(report.format_analysis.score, 50.0);
        assert_eq!(report.format_analysis.issues, vec!["Basic analysis only"]);
    }

    #[test]
    fn test_basic_score_empty_job() {
        let report = AtsScorer::basic_score("anything", "");
        assert_eq!(report.ats_score, 0.0);
    }

    #[test]
    fn test_analyze_format() {
        let fa = AtsScorer::analyze_format("EDUCATION\nSkills\nwork");
        assert_eq!(fa.score, 50.0);
        assert_eq!(fa.issues, vec!["Missing sections: experience, projects"]);
        assert_eq!(fa.suggestions.len(), 3);

        let full = AtsScorer::analyze_format("education experience skills projects");
        assert_eq!(full.score, 100.0);
        assert!(full.issues.is_empty());
    }

    #[test]
    fn test_analyze_content_suggests_first_five() {
        let ca = AtsScorer::analyze_content("zeta", "a b c d e f zeta");
        assert_eq!(ca.keyword_match, 1);
        assert_eq!(ca.missing_keywords.len(), 6);
        assert_eq!(ca.suggestions, vec!["Add these keywords: a, b, c, d, e"]);

        let none = AtsScorer::analyze_content("a b", "a b");
        assert!(none.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_uninitialized_uses_basic() {
        let scorer = AtsScorer::new(None);
        assert!(!scorer.is_initialized());
        let report = scorer.calculate("Python developer", JOB).await;
        assert!(report.used_fallback);
    }

    #[tokio::test]
    async fn test_embedding_path() {
        let scorer = AtsScorer::new(Some(EmbeddingProvider::Hashing(HashingEmbedder::new(128))));
        let report = scorer.calculate(JOB, JOB).await;
        assert!(!report.used_fallback);
        assert!((report.ats_score - 100.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        // nothing listens on port 9 locally
        let client = HttpEmbeddingClient::new(
            "http://127.0.0.1:9",
            "m",
            None,
            Duration::from_millis(500),
        )
        .unwrap();
        let scorer = AtsScorer::new(Some(EmbeddingProvider::Http(client)));
        let report = scorer.calculate("Python developer", JOB).await;
        assert!(report.used_fallback);
        assert!((report.ats_score - 32.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_calculate_ats_score_rejects_empty() {
        let scorer = AtsScorer::new(None);
        let err = calculate_ats_score(&scorer, "  ", JOB).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InputEmptyResume);
        let err = calculate_ats_score(&scorer, "resume", "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InputEmptyJob);
    }

    #[tokio::test]
    async fn test_calculate_ats_score_adds_insights() {
        let scorer = AtsScorer::new(None);
        let report = calculate_ats_score(&scorer, "I know python", "Need python and docker, 3+ years")
            .await
            .unwrap();
        assert!(report
            .strengths
            .contains(&"Strong match with required skills: python".to_string()));
        assert!(report
            .weaknesses
            .contains(&"Missing required skills: docker".to_string()));
        assert!(!report.improvements.is_empty());
    }
}
