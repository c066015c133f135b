//! Sentence embedding providers
//!
//! Two backends behind one enum:
//! - `Http`: any OpenAI-compatible `POST {base}/embeddings` endpoint
//!   (text-embeddings-inference, vLLM, OpenAI itself)
//! - `Hashing`: a local feature-hashing embedder, deterministic and
//!   dependency free, used when no endpoint is configured
//!
//! Scores from the hashing backend reflect shared vocabulary rather than
//! meaning. Configure `ATS_EMBEDDING_URL` for semantic similarity.

use fnv::FnvHasher;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::config::{EmbeddingBackend, ScorerConfig};
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::USER_AGENT;

/// Weight of an adjacent-word bigram relative to a single token
const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Client for an OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpEmbeddingClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Embed `texts` in one request, preserving input order
    pub async fn encode(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        debug!("🧠 Embedding {} texts via {}", texts.len(), url);

        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: texts,
            });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::embed_error(format!(
                "embedding endpoint returned {}",
                status
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.data.len() != texts.len() {
            return Err(AppError::embed_invalid_response(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        let mut data = body.data;
        if data.iter().all(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index.unwrap_or(0));
        }
        if data.iter().any(|d| d.embedding.is_empty()) {
            return Err(AppError::embed_invalid_response("empty embedding vector"));
        }
        let dim = data.first().map(|d| d.embedding.len()).unwrap_or(0);
        if let Some(other) = data.iter().find(|d| d.embedding.len() != dim) {
            return Err(AppError::embed_invalid_response(format!(
                "embedding dimensions differ: {} vs {}",
                dim,
                other.embedding.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Deterministic bag-of-words embedder using FNV feature hashing
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn hash(feature: &str) -> u64 {
        let mut hasher = FnvHasher::default();
        hasher.write(feature.as_bytes());
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = Self::hash(feature);
        let slot = (h % self.dim as u64) as usize;
        // top bit picks the sign so collisions tend to cancel out
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[slot] += sign * weight;
    }

    /// L2-normalised vector; all zeros for text without words
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|t| !t.is_empty())
            .collect();

        for token in &tokens {
            self.add_feature(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    pub fn encode(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Embedding backend used by the scorer
#[derive(Debug, Clone)]
pub enum EmbeddingProvider {
    Http(HttpEmbeddingClient),
    Hashing(HashingEmbedder),
}

impl EmbeddingProvider {
    /// Build the provider selected in `config`; `None` when embeddings are disabled
    pub fn from_config(config: &ScorerConfig) -> AppResult<Option<Self>> {
        match &config.embedding {
            EmbeddingBackend::Http { base_url } => {
                let client = HttpEmbeddingClient::new(
                    base_url.clone(),
                    config.embedding_model.clone(),
                    config.embedding_api_key.clone(),
                    config.embedding_timeout,
                )?;
                info!(
                    "🧠 Embeddings: {} (model {})",
                    client.base_url(),
                    config.embedding_model
                );
                Ok(Some(Self::Http(client)))
            }
            EmbeddingBackend::Hashing => {
                info!("🧠 Embeddings: local hashing ({} dims)", config.embedding_dim);
                Ok(Some(Self::Hashing(HashingEmbedder::new(config.embedding_dim))))
            }
            EmbeddingBackend::Disabled => {
                info!("🧠 Embeddings disabled, basic scoring only");
                Ok(None)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Hashing(_) => "hashing",
        }
    }

    pub async fn encode(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        match self {
            Self::Http(client) => client.encode(texts).await,
            Self::Hashing(embedder) => Ok(embedder.encode(texts)),
        }
    }
}
