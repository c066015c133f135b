//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::batch::BatchSummary;
use crate::models::errors::AppError;
use crate::utils::cache::CacheStats;
use crate::utils::telemetry::TelemetryStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            code: "API_UNAUTHORIZED".to_string(),
            message: "Invalid or missing API key".to_string(),
            details: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: "API_RATE_LIMITED".to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: err.source.as_ref().map(|s| s.to_string()),
        }
    }
}

// ============================================
// Full Report
// ============================================

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    pub job_description: String,
}

// ============================================
// Keyword Score
// ============================================

#[derive(Debug, Deserialize)]
pub struct KeywordScoreRequest {
    pub resume_text: String,
    pub job_keywords: Vec<String>,
}

// ============================================
// Batch Scoring
// ============================================

#[derive(Debug, Deserialize)]
pub struct BatchResume {
    pub id: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub job_description: String,
    pub resumes: Vec<BatchResume>,
    /// Max concurrent scorings (max: 50); server default when absent
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl BatchScoreRequest {
    pub fn concurrency_or(&self, default: usize) -> usize {
        self.concurrency.unwrap_or(default)
    }
}

#[derive(Debug, Serialize)]
pub struct BatchScoreData {
    pub total_requested: usize,
    #[serde(flatten)]
    pub summary: BatchSummary,
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub scoring: TelemetryStats,
    pub cache: CacheStats,
    pub embedding_provider: String,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub embeddings_enabled: bool,
}
