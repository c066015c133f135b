//! Ruster ATS API Server
//!
//! REST API for scoring resumes against job descriptions
//!
//! Usage:
//!   cargo run --bin ruster_ats_api
//!
//! Environment:
//!   RUSTER_PORT / PORT - Server port (default: 8080)
//!   RUSTER_HOST        - Server host (default: 0.0.0.0)
//!   ATS_EMBEDDING_URL  - Embedding endpoint, `hashing` or `none` (default: hashing)
//!   RUST_LOG           - Log filter (default: info)

use ruster_ats::api::{create_router, start_cleanup_task, AppState};
use ruster_ats::{AtsScorer, ScorerConfig, ServerConfig, TelemetryCollector};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = ScorerConfig::from_env()?;
    let server = ServerConfig::from_env()?;

    let scorer = Arc::new(AtsScorer::from_config(&config));
    info!("🧠 Embedding provider: {}", scorer.provider_name());

    let telemetry = Arc::new(TelemetryCollector::with_config(
        config.telemetry_dir.clone(),
        1000,
    ));
    let telemetry_for_shutdown = telemetry.clone();

    let state = Arc::new(AppState::new(scorer, telemetry, &config));

    start_cleanup_task();
    info!("🧹 Background cleanup task started");

    let app = create_router(state);

    let addr: SocketAddr = server.bind_addr().parse()?;

    info!("🚀 Ruster ATS API starting on http://{}", addr);
    info!("📖 Health check: http://{}/v1/health", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/ats/score     - Full ATS report (resume vs job description)");
    info!("  POST /v1/ats/keywords  - Heuristic score against a keyword list");
    info!("  POST /v1/ats/batch     - Batch scoring (up to 100 resumes)");
    info!("  GET  /v1/stats         - Scoring and cache statistics");
    info!("  GET  /v1/health        - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    // peer addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("");
    info!("🛑 Shutdown signal received, cleaning up...");

    let stats = telemetry_for_shutdown.get_stats();
    info!("   Resumes scored: {}", stats.total_scored);
    info!("   Basic fallbacks: {}", stats.fallback_count);
    info!("   Average score: {:.2}", stats.avg_score);

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 Ruster ATS API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                                                              ║
    ║        R U S T E R   A T S                                   ║
    ║                                                              ║
    ║              C L O U D   A P I   v{:<8}                   ║
    ║         Resume / Job Description Compatibility               ║
    ║                                                              ║
    ╚══════════════════════════════════════════════════════════════╝
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
