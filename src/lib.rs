//! Ruster ATS Library
//!
//! Resume ATS compatibility scoring:
//! - Section, keyword, formatting and context heuristics (0-100)
//! - Embedding similarity against a job description, with a word-overlap fallback
//! - Strengths, weaknesses and improvement suggestions
//! - Batch scoring of resume directories honouring ignore files

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::ats_score::{ats_score, AtsComponents, AtsScoreBuilder, KeywordScore, ScoreFactor};
pub use crate::core::batch::{
    collect_resumes, score_directory, score_texts, BatchItemResult, BatchOptions, BatchSummary,
};
pub use crate::core::insights::ResumeInsights;
pub use crate::core::scorer::{calculate_ats_score, AtsScorer};
pub use models::config::{EmbeddingBackend, ScorerConfig, ServerConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{AtsLevel, AtsReport, SectionKind};
pub use providers::embedding::{EmbeddingProvider, HashingEmbedder, HttpEmbeddingClient};
pub use utils::cache::{CacheStats, ReportCache};
pub use utils::ignore_list::{IgnoreList, IgnorePattern, PatternIssue};
pub use utils::telemetry::{ScoreEvent, ScoreSource, TelemetryCollector, TelemetryStats};
