//! Batch scoring
//!
//! Scores many resumes against one job description with bounded
//! concurrency. Directory walks honour `.gitignore`, `.ignore` and
//! `.atsignore` files plus extra exclude patterns.

use futures_util::future::join_all;
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::core::scorer::{calculate_ats_score, AtsScorer};
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{AtsLevel, AtsReport};
use crate::utils::constants::{
    ATS_IGNORE_FILENAME, DEFAULT_BATCH_CONCURRENCY, DEFAULT_RESUME_EXTENSIONS,
    MAX_BATCH_CONCURRENCY,
};
use crate::utils::ignore_list::IgnoreList;

/// Options for directory batches
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// File extensions treated as resumes, without the dot
    pub extensions: Vec<String>,
    /// Extra gitignore-style patterns, rooted at the batch directory
    pub exclude: Vec<String>,
    pub concurrency: usize,
    /// Walk hidden files and directories too
    pub include_hidden: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_RESUME_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            include_hidden: false,
        }
    }
}

/// Failure of a single batch item
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for BatchItemError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AtsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchItemError>,
    pub latency_ms: f64,
}

impl BatchItemResult {
    pub fn score(&self) -> Option<f64> {
        self.report.as_ref().map(|r| r.ats_score)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Count per level name, every level present
    pub by_level: BTreeMap<String, usize>,
    pub average_score: f64,
    /// Best score first, failures last
    pub results: Vec<BatchItemResult>,
    pub total_latency_ms: f64,
}

impl BatchSummary {
    fn from_results(mut results: Vec<BatchItemResult>, total_latency_ms: f64) -> Self {
        results.sort_by(|a, b| match (b.score(), a.score()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (None, None) => a.id.cmp(&b.id),
        });

        let mut by_level: BTreeMap<String, usize> = AtsLevel::ALL
            .iter()
            .map(|l| (l.as_str().to_string(), 0))
            .collect();
        let mut score_sum = 0.0;
        let mut succeeded = 0;
        for report in results.iter().filter_map(|r| r.report.as_ref()) {
            *by_level.entry(report.level.as_str().to_string()).or_insert(0) += 1;
            score_sum += report.ats_score;
            succeeded += 1;
        }

        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            by_level,
            average_score: if succeeded > 0 {
                score_sum / succeeded as f64
            } else {
                0.0
            },
            results,
            total_latency_ms,
        }
    }

    pub fn best(&self) -> Option<&BatchItemResult> {
        self.results.first().filter(|r| r.report.is_some())
    }
}

/// Where a batch item's resume text comes from
enum ResumeSource {
    Text(String),
    File(PathBuf),
}

struct BatchInput {
    id: String,
    source: ResumeSource,
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Resume files under `dir`, sorted
pub fn collect_resumes(dir: &Path, opts: &BatchOptions) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::invalid_directory(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let excludes = Arc::new(IgnoreList::parse(dir, &opts.exclude.join("\n"))?);

    let mut builder = WalkBuilder::new(dir);
    builder
        .hidden(!opts.include_hidden)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(false)
        .require_git(false)
        .add_custom_ignore_filename(ATS_IGNORE_FILENAME);

    if !excludes.is_empty() {
        let root = dir.to_path_buf();
        let excludes = excludes.clone();
        builder.filter_entry(move |entry| {
            let Ok(rel) = entry.path().strip_prefix(&root) else {
                return true;
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !excludes.is_ignored(rel, is_dir)
        });
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("⚠️ Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && has_extension(entry.path(), &opts.extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

async fn run_batch(
    scorer: Arc<AtsScorer>,
    inputs: Vec<BatchInput>,
    job_description: &str,
    concurrency: usize,
) -> AppResult<BatchSummary> {
    if job_description.trim().is_empty() {
        return Err(AppError::empty_job());
    }

    let start = Instant::now();
    let concurrency = concurrency.clamp(1, MAX_BATCH_CONCURRENCY);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let job: Arc<str> = Arc::from(job_description);
    let mut handles = Vec::with_capacity(inputs.len());

    for input in inputs {
        let sem = semaphore.clone();
        let scorer = scorer.clone();
        let job = job.clone();

        let handle = tokio::spawn(async move {
            // the semaphore is never closed
            let _permit = sem.acquire_owned().await.ok();
            let item_start = Instant::now();

            let path = match &input.source {
                ResumeSource::File(p) => Some(p.clone()),
                ResumeSource::Text(_) => None,
            };
            let text = match input.source {
                ResumeSource::Text(text) => Ok(text),
                ResumeSource::File(p) => tokio::fs::read_to_string(&p).await.map_err(|e| {
                    AppError::with_source(
                        ErrorCode::InputUnreadable,
                        format!("Cannot read {}", p.display()),
                        e,
                    )
                }),
            };

            let outcome = match text {
                Ok(text) => calculate_ats_score(&scorer, &text, &job).await,
                Err(e) => Err(e),
            };

            let latency_ms = item_start.elapsed().as_secs_f64() * 1000.0;
            match outcome {
                Ok(report) => BatchItemResult {
                    id: input.id,
                    path,
                    report: Some(report),
                    error: None,
                    latency_ms,
                },
                Err(e) => {
                    warn!("⚠️ Batch item {} failed: {}", input.id, e);
                    BatchItemResult {
                        id: input.id,
                        path,
                        report: None,
                        error: Some(BatchItemError::from(&e)),
                        latency_ms,
                    }
                }
            }
        });

        handles.push(handle);
    }

    let results = join_all(handles)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::internal(format!("batch task failed: {}", e)))?;

    let summary = BatchSummary::from_results(results, start.elapsed().as_secs_f64() * 1000.0);
    info!(
        "📦 Batch complete: {} scored, {} failed, avg {:.2} ({:.0}ms)",
        summary.succeeded, summary.failed, summary.average_score, summary.total_latency_ms
    );
    Ok(summary)
}

/// Score every resume file under `dir`
pub async fn score_directory(
    scorer: Arc<AtsScorer>,
    dir: &Path,
    job_description: &str,
    opts: &BatchOptions,
) -> AppResult<BatchSummary> {
    let files = collect_resumes(dir, opts)?;
    if files.is_empty() {
        return Err(AppError::new(
            ErrorCode::BatchEmpty,
            format!("No resumes found in {}", dir.display()),
        ));
    }
    info!("📂 Scoring {} resumes from {}", files.len(), dir.display());

    let inputs = files
        .into_iter()
        .map(|path| BatchInput {
            id: path
                .strip_prefix(dir)
                .unwrap_or(path.as_path())
                .display()
                .to_string(),
            source: ResumeSource::File(path),
        })
        .collect();

    run_batch(scorer, inputs, job_description, opts.concurrency).await
}

/// Score in-memory resumes given as `(id, text)` pairs
pub async fn score_texts(
    scorer: Arc<AtsScorer>,
    items: Vec<(String, String)>,
    job_description: &str,
    concurrency: usize,
) -> AppResult<BatchSummary> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::BatchEmpty, "No resumes provided"));
    }

    let inputs = items
        .into_iter()
        .map(|(id, text)| BatchInput {
            id,
            source: ResumeSource::Text(text),
        })
        .collect();

    run_batch(scorer, inputs, job_description, concurrency).await
}
