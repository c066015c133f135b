//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::types::*;
use crate::core::ats_score::KeywordScore;
use crate::core::batch::score_texts;
use crate::core::scorer::{calculate_ats_score, AtsScorer};
use crate::models::config::ScorerConfig;
use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::AtsReport;
use crate::utils::cache::ReportCache;
use crate::utils::constants::{APP_VERSION, MAX_BATCH_ITEMS};
use crate::utils::telemetry::{ScoreEvent, ScoreSource, TelemetryCollector};

/// Error half of every handler result
pub type ApiRejection = (StatusCode, Json<ApiResponse<()>>);

/// Shared application state
pub struct AppState {
    pub scorer: Arc<AtsScorer>,
    pub telemetry: Arc<TelemetryCollector>,
    pub cache: Arc<ReportCache>,
    pub start_time: Instant,
    pub batch_concurrency: usize,
}

impl AppState {
    /// Must be called inside a tokio runtime: spawns the cache cleanup task
    pub fn new(
        scorer: Arc<AtsScorer>,
        telemetry: Arc<TelemetryCollector>,
        config: &ScorerConfig,
    ) -> Self {
        let cache = Arc::new(ReportCache::with_ttl(config.cache_ttl_secs));

        // Background task: cleanup expired cache entries every 60 seconds
        let cache_clone = cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                cache_clone.cleanup_expired();
            }
        });

        Self {
            scorer,
            telemetry,
            cache,
            start_time: Instant::now(),
            batch_concurrency: config.batch_concurrency,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: &AppError, start: Instant) -> ApiRejection {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

/// Unwrap a JSON body; malformed or incomplete bodies become a 400 envelope
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    start: Instant,
) -> Result<T, ApiRejection> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        reject(&AppError::bad_request(rejection.body_text()), start)
    })
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        embeddings_enabled: state.scorer.is_initialized(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Full Report
// ============================================

pub async fn score_resume(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AtsReport>>, ApiRejection> {
    let start = Instant::now();
    let req = parse_body(payload, start)?;

    let key = ReportCache::key_for(&req.resume_text, &req.job_description);
    if let Some(report) = state.cache.get(&key) {
        return Ok(Json(ApiResponse::success(report, elapsed_ms(start))));
    }

    let report = calculate_ats_score(&state.scorer, &req.resume_text, &req.job_description)
        .await
        .map_err(|e| reject(&e, start))?;

    state.cache.set(&key, report.clone());
    state.telemetry.record_score(ScoreEvent::new(
        ScoreSource::Report,
        report.ats_score,
        start.elapsed().as_millis() as u64,
        report.used_fallback,
    ));

    info!(
        report_id = %report.report_id,
        score = report.ats_score,
        fallback = report.used_fallback,
        "ATS report served"
    );

    Ok(Json(ApiResponse::success(report, elapsed_ms(start))))
}

// ============================================
// Keyword Score
// ============================================

pub async fn score_keywords(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KeywordScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<KeywordScore>>, ApiRejection> {
    let start = Instant::now();
    let req = parse_body(payload, start)?;

    if req.resume_text.trim().is_empty() {
        return Err(reject(&AppError::empty_resume(), start));
    }
    if req.job_keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(reject(&AppError::empty_keywords(), start));
    }

    let score = KeywordScore::evaluate(&req.resume_text, &req.job_keywords);
    state.telemetry.record_score(ScoreEvent::new(
        ScoreSource::Keywords,
        score.total,
        start.elapsed().as_millis() as u64,
        false,
    ));

    Ok(Json(ApiResponse::success(score, elapsed_ms(start))))
}

// ============================================
// Batch Scoring
// ============================================

pub async fn batch_score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchScoreData>>, ApiRejection> {
    let start = Instant::now();
    let req = parse_body(payload, start)?;

    if req.resumes.is_empty() {
        return Err(reject(
            &AppError::new(ErrorCode::BatchEmpty, "Resume list cannot be empty"),
            start,
        ));
    }
    if req.resumes.len() > MAX_BATCH_ITEMS {
        return Err(reject(
            &AppError::new(
                ErrorCode::BatchTooLarge,
                format!("Maximum {} resumes per batch request", MAX_BATCH_ITEMS),
            ),
            start,
        ));
    }

    let total_requested = req.resumes.len();
    let concurrency = req.concurrency_or(state.batch_concurrency);
    let items = req
        .resumes
        .into_iter()
        .map(|r| (r.id, r.resume_text))
        .collect();

    let summary = score_texts(state.scorer.clone(), items, &req.job_description, concurrency)
        .await
        .map_err(|e| reject(&e, start))?;

    for item in &summary.results {
        if let Some(report) = &item.report {
            state.telemetry.record_score(ScoreEvent::new(
                ScoreSource::Batch,
                report.ats_score,
                item.latency_ms as u64,
                report.used_fallback,
            ));
        }
    }

    let data = BatchScoreData {
        total_requested,
        summary,
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let cache_stats = state.cache.stats();

    info!(
        "📊 Cache Stats: {} entries, {:.1}% hit rate ({} hits / {} misses)",
        cache_stats.entries, cache_stats.hit_rate, cache_stats.hits, cache_stats.misses
    );

    let data = StatsData {
        scoring: state.telemetry.get_stats(),
        cache: cache_stats,
        embedding_provider: state.scorer.provider_name().to_string(),
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}
