//! High-Performance In-Memory Cache Module
//!
//! Thread-safe caching layer for ATS reports, keyed by a SHA-256 digest of
//! the resume and job description. Backed by DashMap for concurrent access
//! without lock contention.
//!
//! Features:
//! - TTL-based expiration (5 minutes default)
//! - Content-addressed keys (no raw resume text kept as key)
//! - Cache HIT/MISS logging

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::types::AtsReport;
use crate::utils::constants::DEFAULT_CACHE_TTL_SECS;

/// Cache entry with timestamp for TTL validation
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub report: AtsReport,
    pub created_at: Instant,
    pub ttl_secs: u64,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(self.ttl_secs)
    }

    /// Seconds left before expiry
    pub fn remaining_ttl(&self) -> u64 {
        let elapsed = self.created_at.elapsed().as_secs();
        self.ttl_secs.saturating_sub(elapsed)
    }
}

/// Shared report cache
#[derive(Clone)]
pub struct ReportCache {
    /// digest -> CacheEntry
    store: Arc<DashMap<String, CacheEntry>>,
    ttl_secs: u64,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportCache {
    /// Cache with the default TTL (5 minutes)
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL_SECS)
    }

    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl_secs,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Content key for a resume/job pair
    pub fn key_for(resume_text: &str, job_description: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(resume_text.as_bytes());
        hasher.update([0u8]);
        hasher.update(job_description.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns the cached report if present and not expired
    pub fn get(&self, key: &str) -> Option<AtsReport> {
        if let Some(entry) = self.store.get(key) {
            if entry.is_expired() {
                drop(entry); // release read lock before removing
                self.store.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", short(key));
                None
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                info!(
                    "✅ CACHE HIT: {} (TTL: {}s remaining)",
                    short(key),
                    entry.remaining_ttl()
                );
                Some(entry.report.clone())
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", short(key));
            None
        }
    }

    pub fn set(&self, key: &str, report: AtsReport) {
        let entry = CacheEntry {
            report,
            created_at: Instant::now(),
            ttl_secs: self.ttl_secs,
        };
        self.store.insert(key.to_string(), entry);
        debug!("💾 CACHE SET: {} (TTL: {}s)", short(key), self.ttl_secs);
    }

    pub fn invalidate(&self, key: &str) {
        self.store.remove(key);
        debug!("🗑️ CACHE INVALIDATE: {}", short(key));
    }

    /// Drop every expired entry; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before - self.store.len();
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl_secs,
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        info!("🗑️ CACHE CLEARED");
    }
}

/// Log prefix of a key; the whole key when byte 12 splits a character
fn short(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
