//! Integration tests for Ruster ATS

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use ruster_ats::api::{create_router, AppState};
use ruster_ats::{
    ats_score, calculate_ats_score, collect_resumes, score_directory, AtsLevel, AtsScorer,
    BatchOptions, ErrorCode, IgnoreList, KeywordScore, ScorerConfig, TelemetryCollector,
};
use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const STRONG_RESUME: &str = "Jane Doe\n\
jane@example.com | 555-123-4567\n\
\n\
SUMMARY:\n\
Backend engineer focused on Python services.\n\
\n\
EXPERIENCE:\n\
Senior Engineer, Acme (2019-Present)\n\
- Built Python APIs with Docker and Kubernetes on AWS\n\
- Led migration to PostgreSQL\n\
\n\
EDUCATION:\n\
B.S. Computer Science, State University\n\
\n\
SKILLS:\n\
Python, Docker, Kubernetes, AWS, PostgreSQL\n\
\n\
PROJECTS:\n\
- Open source Python tooling\n";

const JOB: &str = "We need a Python engineer with Docker, Kubernetes and AWS. 3+ years of experience. Bachelor's degree in Computer Science.";

fn keywords() -> Vec<String> {
    ["python", "docker", "kubernetes", "aws"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

// ============================================
// Repository ignore file
// ============================================

#[test]
fn test_repo_gitignore_is_valid() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let contents = fs::read_to_string(root.join(".gitignore")).unwrap();

    assert!(IgnoreList::validate(&contents).is_empty());

    let list = IgnoreList::parse(root, &contents).unwrap();
    assert!(!list.is_empty());
    assert!(list.patterns().iter().any(|p| p.negated && p.text == ".env.example"));

    assert!(list.is_ignored("target", true));
    assert!(list.is_ignored("target/debug/ruster_ats", false));
    assert!(list.is_ignored(".env", false));
    assert!(list.is_ignored(".env.local", false));
    assert!(!list.is_ignored(".env.example", false));
    assert!(list.is_ignored("telemetry/ats_events_1.jsonl", false));
    assert!(list.is_ignored("server.log", false));
    assert!(!list.is_ignored("src/main.rs", false));
    assert!(!list.is_ignored("Cargo.toml", false));
}

#[test]
fn test_validate_reports_every_bad_line() {
    let issues = IgnoreList::validate("ok.txt\nbad[\n!\n# comment\n/\n*.log\n");
    let lines: Vec<usize> = issues.iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![2, 3, 5]);

    let err = IgnoreList::parse(".", "fine\nbad[\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::IgnoreInvalidPattern);
}

// ============================================
// Keyword scoring
// ============================================

#[test]
fn test_keyword_score_ranks_resumes() {
    let strong = KeywordScore::evaluate(STRONG_RESUME, &keywords());
    let weak = KeywordScore::evaluate("Pastry chef. I bake bread.", &keywords());

    assert!(strong.total > weak.total);
    assert!(strong.total <= 100.0);
    assert_eq!(strong.breakdown.len(), 4);
    assert_eq!(strong.level, AtsLevel::from_score(strong.total));
    assert_eq!(ats_score(STRONG_RESUME, &keywords()), strong.total);
}

#[test]
fn test_keyword_score_degenerate_inputs() {
    assert_eq!(ats_score("", &keywords()), 0.0);
    let none: [&str; 0] = [];
    assert_eq!(ats_score(STRONG_RESUME, &none), 0.0);
    assert_eq!(ats_score(STRONG_RESUME, &["  ", ""]), 0.0);
}

// ============================================
// Full report
// ============================================

#[tokio::test]
async fn test_full_report_without_embeddings() {
    let scorer = AtsScorer::new(None);
    let report = calculate_ats_score(&scorer, STRONG_RESUME, JOB).await.unwrap();

    assert!(report.used_fallback);
    assert!((0.0..=100.0).contains(&report.ats_score));
    assert_eq!(report.level, AtsLevel::from_score(report.ats_score));
    assert!(report
        .strengths
        .iter()
        .any(|s| s.starts_with("Strong match with required skills")));
}

#[tokio::test]
async fn test_full_report_with_hashing_embedder() {
    let config = ScorerConfig {
        embedding: ruster_ats::EmbeddingBackend::Hashing,
        ..ScorerConfig::default()
    };
    let scorer = AtsScorer::from_config(&config);
    assert_eq!(scorer.provider_name(), "hashing");

    let report = calculate_ats_score(&scorer, STRONG_RESUME, JOB).await.unwrap();
    assert!(!report.used_fallback);
    assert_eq!(report.format_analysis.score, 100.0);
}

// ============================================
// Batch scoring
// ============================================

#[tokio::test]
async fn test_directory_batch_honours_ignore_files() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "alice.txt", STRONG_RESUME);
    write(root, "bob.md", "Pastry chef");
    write(root, "old/carol.txt", "Python");
    write(root, "notes.pdf", "not a resume");
    write(root, ".atsignore", "# drafts\nold/\n");

    let files = collect_resumes(root, &BatchOptions::default()).unwrap();
    assert_eq!(files, vec![root.join("alice.txt"), root.join("bob.md")]);

    let opts = BatchOptions {
        exclude: vec!["*.md".to_string()],
        ..BatchOptions::default()
    };
    let summary = score_directory(Arc::new(AtsScorer::new(None)), root, JOB, &opts)
        .await
        .unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.best().unwrap().id, "alice.txt");
}

#[tokio::test]
async fn test_directory_batch_empty() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "ignored.docx", "x");

    let err = score_directory(
        Arc::new(AtsScorer::new(None)),
        tmp.path(),
        JOB,
        &BatchOptions::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::BatchEmpty);
}

// ============================================
// HTTP API
// ============================================

fn app() -> axum::Router {
    let tmp = std::env::temp_dir().join("ruster_ats_it_telemetry");
    let config = ScorerConfig {
        embedding: ruster_ats::EmbeddingBackend::Disabled,
        telemetry_dir: tmp.clone(),
        ..ScorerConfig::default()
    };
    let state = AppState::new(
        Arc::new(AtsScorer::from_config(&config)),
        Arc::new(TelemetryCollector::with_config(tmp, 1000)),
        &config,
    );
    create_router(Arc::new(state))
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, key: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", key)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_health() {
    for uri in ["/health", "/v1/health"] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["embeddings_enabled"], false);
    }
}

#[tokio::test]
async fn test_api_score_report() {
    let req = post(
        "/v1/ats/score",
        "sk_it_score",
        json!({ "resume_text": STRONG_RESUME, "job_description": JOB }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["used_fallback"], true);
    assert!(body["data"]["ats_score"].as_f64().unwrap() > 0.0);
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_api_empty_resume_is_bad_request() {
    let req = post(
        "/v1/ats/score",
        "sk_it_empty",
        json!({ "resume_text": "   ", "job_description": JOB }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INPUT_EMPTY_RESUME");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_api_invalid_key_rejected() {
    let req = post(
        "/v1/ats/keywords",
        "not-a-key",
        json!({ "resume_text": STRONG_RESUME, "job_keywords": keywords() }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "API_UNAUTHORIZED");
}

#[tokio::test]
async fn test_api_keywords() {
    let req = post(
        "/v1/ats/keywords",
        "pk_it_keywords",
        json!({ "resume_text": STRONG_RESUME, "job_keywords": keywords() }),
    );
    let response = app().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-ratelimit-remaining"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let expected = ats_score(STRONG_RESUME, &keywords());
    assert_eq!(body["data"]["total"].as_f64().unwrap(), expected);
    assert_eq!(body["data"]["breakdown"].as_array().unwrap().len(), 4);

    let req = post(
        "/v1/ats/keywords",
        "pk_it_keywords",
        json!({ "resume_text": STRONG_RESUME, "job_keywords": [" "] }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INPUT_EMPTY_KEYWORDS");
}

#[tokio::test]
async fn test_api_batch() {
    let req = post(
        "/v1/ats/batch",
        "demo",
        json!({
            "job_description": JOB,
            "resumes": [
                { "id": "strong", "resume_text": STRONG_RESUME },
                { "id": "blank", "resume_text": "" }
            ]
        }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_requested"], 2);
    assert_eq!(data["succeeded"], 1);
    assert_eq!(data["failed"], 1);
    assert_eq!(data["results"][0]["id"], "strong");
    assert_eq!(data["results"][1]["error"]["code"], "INPUT_EMPTY_RESUME");

    let req = post(
        "/v1/ats/batch",
        "demo",
        json!({ "job_description": JOB, "resumes": [] }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BATCH_EMPTY");
}

#[tokio::test]
async fn test_api_malformed_body_uses_envelope() {
    let req = post(
        "/v1/ats/score",
        "sk_it_malformed",
        json!({ "resume_text": "x" }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("job_description"));

    let req = Request::builder()
        .method("POST")
        .uri("/v1/ats/batch")
        .header("content-type", "application/json")
        .header("x-api-key", "sk_it_malformed")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_api_batch_too_large() {
    let resumes: Vec<Value> = (0..101)
        .map(|i| json!({ "id": format!("r{}", i), "resume_text": "python" }))
        .collect();
    let req = post(
        "/v1/ats/batch",
        "sk_it_too_large",
        json!({ "job_description": JOB, "resumes": resumes }),
    );
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BATCH_TOO_LARGE");
}

#[tokio::test]
async fn test_api_rate_limit_exceeded() {
    let app = app();
    for _ in 0..100 {
        let response = app
            .clone()
            .oneshot(get("/v1/stats", "sk_it_flood"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get("/v1/stats", "sk_it_flood"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let headers = response.headers();
    assert_eq!(headers["x-ratelimit-limit"], "100");
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert!(headers.contains_key("x-ratelimit-reset"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "API_RATE_LIMITED");

    // other clients keep their own window
    let response = app.oneshot(get("/v1/stats", "sk_it_other")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_anonymous_clients_limited_per_peer() {
    let app = app();
    for ip in ["192.0.2.10", "192.0.2.11"] {
        let addr: SocketAddr = format!("{}:40000", ip).parse().unwrap();
        let mut req = Request::builder()
            .uri("/v1/stats")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));

        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "99");
    }
}

#[tokio::test]
async fn test_api_cache_hit_and_stats() {
    let app = app();
    let body = json!({ "resume_text": STRONG_RESUME, "job_description": JOB });

    let (status, first) = send(app.clone(), post("/v1/ats/score", "sk_it_cache", body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = send(app.clone(), post("/v1/ats/score", "sk_it_cache", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["report_id"], second["data"]["report_id"]);

    let (status, stats) = send(app, get("/v1/stats", "sk_it_cache")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &stats["data"];
    // the cached response is not scored again
    assert_eq!(data["scoring"]["total_scored"], 1);
    assert_eq!(data["scoring"]["fallback_count"], 1);
    assert_eq!(data["cache"]["entries"], 1);
    assert_eq!(data["cache"]["hits"], 1);
    assert_eq!(data["cache"]["misses"], 1);
    assert_eq!(data["embedding_provider"], "none");
}
