//! Telemetry Module for Ruster ATS
//!
//! Collects anonymous scoring statistics for:
//! - Performance monitoring (latency, fallback rate)
//! - Score distribution across ATS levels
//!
//! Privacy-first: no resume or job text is stored, only scores and timings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::models::types::AtsLevel;
use crate::utils::constants::DEFAULT_TELEMETRY_DIR;

/// Where a score request came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Full report against a job description
    Report,
    /// Heuristic score against a keyword list
    Keywords,
    /// Item of a batch run
    Batch,
}

/// Single telemetry event (anonymized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub timestamp: u64,
    pub source: ScoreSource,
    pub level: AtsLevel,
    /// Score rounded to whole points
    pub score: f64,
    pub latency_ms: u64,
    pub used_fallback: bool,
}

impl ScoreEvent {
    pub fn new(source: ScoreSource, score: f64, latency_ms: u64, used_fallback: bool) -> Self {
        Self {
            timestamp: current_timestamp(),
            source,
            level: AtsLevel::from_score(score),
            score: score.round(),
            latency_ms,
            used_fallback,
        }
    }
}

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    pub total_scored: u64,
    pub fallback_count: u64,
    /// Scores per ATS level
    pub by_level: HashMap<String, u64>,
    pub avg_score: f64,
    pub avg_latency_ms: f64,
    pub period_start: u64,
    pub period_end: u64,
}

impl TelemetryStats {
    /// Boxed plain-text report for the console
    pub fn summary_report(&self) -> String {
        let period_minutes = self.period_end.saturating_sub(self.period_start) / 60;
        let level = |l: AtsLevel| self.by_level.get(l.as_str()).copied().unwrap_or(0);

        format!(
            r#"
╔══════════════════════════════════════════════════════════════════╗
║                 📄 RUSTER ATS - SCORING REPORT                   ║
╠══════════════════════════════════════════════════════════════════╣
║   Period:                 {:>10} min                            ║
║   Resumes Scored:         {:>10}                                ║
║   Basic Fallbacks:        {:>10}                                ║
║   Average Score:          {:>10.2}                                ║
║   ✅ Excellent:           {:>10}                                ║
║   🟡 Good:                {:>10}                                ║
║   🟠 Fair:                {:>10}                                ║
║   🔴 Poor:                {:>10}                                ║
║   Avg Latency:            {:>10.2}ms                              ║
╚══════════════════════════════════════════════════════════════════╝
"#,
            period_minutes,
            self.total_scored,
            self.fallback_count,
            self.avg_score,
            level(AtsLevel::Excellent),
            level(AtsLevel::Good),
            level(AtsLevel::Fair),
            level(AtsLevel::Poor),
            self.avg_latency_ms,
        )
    }

    /// CSV row matching [`CSV_HEADER`]
    pub fn to_csv_row(&self) -> String {
        let level = |l: AtsLevel| self.by_level.get(l.as_str()).copied().unwrap_or(0);
        format!(
            "{},{},{},{},{:.2},{:.2},{},{},{},{}\n",
            self.period_start,
            self.period_end,
            self.total_scored,
            self.fallback_count,
            self.avg_score,
            self.avg_latency_ms,
            level(AtsLevel::Excellent),
            level(AtsLevel::Good),
            level(AtsLevel::Fair),
            level(AtsLevel::Poor),
        )
    }
}

pub const CSV_HEADER: &str = "period_start,period_end,total_scored,fallback_count,avg_score,avg_latency_ms,excellent,good,fair,poor";

/// Main telemetry collector
pub struct TelemetryCollector {
    /// Event buffer (in-memory)
    events: Arc<RwLock<Vec<ScoreEvent>>>,
    total_scored: AtomicU64,
    fallback_count: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Sum of rounded scores, for the average
    total_score_points: AtomicU64,
    level_counts: Arc<RwLock<HashMap<AtsLevel, u64>>>,
    session_start: u64,
    export_dir: PathBuf,
    /// Max events in memory before flush
    max_buffer_size: usize,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::with_config(PathBuf::from(DEFAULT_TELEMETRY_DIR), 1000)
    }

    pub fn with_config(export_dir: PathBuf, max_buffer_size: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::with_capacity(max_buffer_size))),
            total_scored: AtomicU64::new(0),
            fallback_count: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            total_score_points: AtomicU64::new(0),
            level_counts: Arc::new(RwLock::new(HashMap::new())),
            session_start: current_timestamp(),
            export_dir,
            max_buffer_size: max_buffer_size.max(1),
        }
    }

    pub fn record_score(&self, event: ScoreEvent) {
        self.total_scored.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(event.latency_ms, Ordering::Relaxed);
        self.total_score_points
            .fetch_add(event.score.clamp(0.0, 100.0) as u64, Ordering::Relaxed);
        if event.used_fallback {
            self.fallback_count.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut counts) = self.level_counts.write() {
            *counts.entry(event.level).or_insert(0) += 1;
        }

        if let Ok(mut events) = self.events.write() {
            events.push(event);

            if events.len() >= self.max_buffer_size {
                let to_flush = std::mem::take(&mut *events);
                drop(events); // release lock before I/O
                if let Err(e) = self.flush_events(&to_flush) {
                    warn!("Telemetry flush failed: {}", e);
                }
            }
        }
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let total_scored = self.total_scored.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);
        let total_points = self.total_score_points.load(Ordering::Relaxed);

        let (avg_latency, avg_score) = if total_scored > 0 {
            (
                total_latency as f64 / total_scored as f64,
                total_points as f64 / total_scored as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let by_level = self
            .level_counts
            .read()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), *v))
                    .collect()
            })
            .unwrap_or_default();

        TelemetryStats {
            total_scored,
            fallback_count: self.fallback_count.load(Ordering::Relaxed),
            by_level,
            avg_score,
            avg_latency_ms: avg_latency,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to a timestamped JSON file
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;
        let stats = self.get_stats();
        let path = self
            .export_dir
            .join(format!("stats_{}.json", current_timestamp()));

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    /// Append current stats to the CSV history
    pub fn export_stats_csv(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;
        let stats = self.get_stats();
        let path = self.export_dir.join("telemetry_history.csv");

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", CSV_HEADER)?;
        }

        write!(file, "{}", stats.to_csv_row())?;

        Ok(path)
    }

    fn flush_events(&self, events: &[ScoreEvent]) -> Result<(), std::io::Error> {
        if events.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.export_dir)?;

        let path = self
            .export_dir
            .join(format!("events_{}.jsonl", current_timestamp()));
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        for event in events {
            let json = serde_json::to_string(event)?;
            writeln!(file, "{}", json)?;
        }

        Ok(())
    }

    pub fn summary_report(&self) -> String {
        self.get_stats().summary_report()
    }

    /// Reset counters (for a new reporting period)
    pub fn reset(&self) {
        self.total_scored.store(0, Ordering::Relaxed);
        self.fallback_count.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.total_score_points.store(0, Ordering::Relaxed);

        if let Ok(mut counts) = self.level_counts.write() {
            counts.clear();
        }
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
