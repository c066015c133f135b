//! Configuration module for Ruster ATS
//!
//! `Default` holds the values from utils/constants.rs; `from_env` overlays
//! the environment. The CLI overrides individual fields after loading.

use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_CACHE_TTL_SECS, DEFAULT_EMBEDDING_DIM,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_TIMEOUT_SECS, DEFAULT_SERVER_PORT,
    DEFAULT_TELEMETRY_DIR,
};

/// Which embedding backend the scorer should use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/embeddings` endpoint
    Http { base_url: String },
    /// Local feature-hashing embedder
    Hashing,
    /// No embeddings: basic word-overlap scoring only
    Disabled,
}

impl EmbeddingBackend {
    /// Interpret the value of `ATS_EMBEDDING_URL`
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Hashing,
            Some(v) if v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("off") => {
                Self::Disabled
            }
            Some(v) if v.eq_ignore_ascii_case("hashing") || v.eq_ignore_ascii_case("local") => {
                Self::Hashing
            }
            Some(v) => Self::Http {
                base_url: v.trim_end_matches('/').to_string(),
            },
        }
    }
}

/// Configuration for the scoring engine
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Embedding backend selection
    pub embedding: EmbeddingBackend,
    /// Model name sent to the embedding endpoint
    pub embedding_model: String,
    /// Bearer key for the embedding endpoint
    /// Never logged
    pub embedding_api_key: Option<String>,
    /// Timeout for embedding calls
    pub embedding_timeout: Duration,
    /// Vector size for the hashing embedder
    pub embedding_dim: usize,
    /// Report cache TTL
    pub cache_ttl_secs: u64,
    /// Max concurrent scoring tasks in batch mode
    pub batch_concurrency: usize,
    /// Telemetry export directory
    pub telemetry_dir: PathBuf,
}

/// Parse one env value; unset or blank keeps the default
pub fn parse_env_value<T: std::str::FromStr>(
    key: &str,
    raw: Option<&str>,
    default: T,
) -> AppResult<T> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| AppError::invalid_config(key, v)),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    parse_env_value(key, std::env::var(key).ok().as_deref(), default)
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingBackend::Hashing,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_api_key: None,
            embedding_timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            telemetry_dir: PathBuf::from(DEFAULT_TELEMETRY_DIR),
        }
    }
}

impl ScorerConfig {
    /// Defaults overridden by `ATS_*` environment variables
    ///
    /// Fails with `CFG_INVALID_VALUE` when a numeric variable does not parse.
    pub fn from_env() -> AppResult<Self> {
        let embedding_api_key = std::env::var("ATS_EMBEDDING_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if embedding_api_key.is_some() {
            info!("🔑 ATS_EMBEDDING_API_KEY configured (key hidden)");
        }

        Ok(Self {
            embedding: EmbeddingBackend::from_env_value(
                std::env::var("ATS_EMBEDDING_URL").ok().as_deref(),
            ),
            embedding_model: std::env::var("ATS_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_api_key,
            embedding_timeout: Duration::from_secs(env_parse(
                "ATS_EMBEDDING_TIMEOUT_SECS",
                DEFAULT_EMBEDDING_TIMEOUT_SECS,
            )?),
            embedding_dim: env_parse("ATS_EMBEDDING_DIM", DEFAULT_EMBEDDING_DIM)?.max(1),
            cache_ttl_secs: env_parse("ATS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            batch_concurrency: env_parse("ATS_BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY)?,
            telemetry_dir: std::env::var("ATS_TELEMETRY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TELEMETRY_DIR)),
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ServerConfig {
    /// `RUSTER_HOST` and `PORT` / `RUSTER_PORT`
    pub fn from_env() -> AppResult<Self> {
        // Hosting platforms set PORT; RUSTER_PORT is for local runs
        let port_key = if std::env::var("PORT").is_ok() {
            "PORT"
        } else {
            "RUSTER_PORT"
        };

        Ok(Self {
            host: std::env::var("RUSTER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse(port_key, DEFAULT_SERVER_PORT)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_backend_from_env_value() {
        assert_eq!(EmbeddingBackend::from_env_value(None), EmbeddingBackend::Hashing);
        assert_eq!(EmbeddingBackend::from_env_value(Some("  ")), EmbeddingBackend::Hashing);
        assert_eq!(EmbeddingBackend::from_env_value(Some("none")), EmbeddingBackend::Disabled);
        assert_eq!(EmbeddingBackend::from_env_value(Some("OFF")), EmbeddingBackend::Disabled);
        assert_eq!(
            EmbeddingBackend::from_env_value(Some("http://localhost:8000/v1/")),
            EmbeddingBackend::Http {
                base_url: "http://localhost:8000/v1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_env_value() {
        assert_eq!(parse_env_value("ATS_CACHE_TTL_SECS", None, 300u64).unwrap(), 300);
        assert_eq!(parse_env_value("ATS_CACHE_TTL_SECS", Some(" "), 300u64).unwrap(), 300);
        assert_eq!(parse_env_value("ATS_CACHE_TTL_SECS", Some(" 60 "), 300u64).unwrap(), 60);

        let err = parse_env_value("ATS_BATCH_CONCURRENCY", Some("eight"), 8usize).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
        assert!(err.message.contains("ATS_BATCH_CONCURRENCY"));
        assert!(err.message.contains("eight"));
    }

    #[test]
    fn test_defaults_ignore_env() {
        let cfg = ScorerConfig::default();
        assert_eq!(cfg.embedding, EmbeddingBackend::Hashing);
        assert_eq!(cfg.batch_concurrency, DEFAULT_BATCH_CONCURRENCY);
        assert_eq!(ServerConfig::default().port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_bind_addr() {
        let cfg = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
    }
}
