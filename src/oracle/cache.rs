//! Two-tier pair cache.
//!
//! A `moka` map in front of a durable [`KeyValueStore`]. Entries carry an
//! absolute expiry and are only ever treated as absent once stale; nothing
//! scans for and evicts expired entries. The durable tier survives restarts,
//! the volatile tier is rebuilt lazily by promotion on read.

use crate::oracle::errors::CacheError;
use crate::oracle::storage::KeyValueStore;
use crate::types::PairSnapshot;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Durable keys are namespaced so the store can be shared.
pub const CACHE_KEY_PREFIX: &str = "dex-cache:";

/// A cached pair with its absolute expiry (epoch ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: PairSnapshot,
    pub expires_at: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires_at > now_ms
    }
}

/// Cache keyed by mint, shielding the scorer from repeated upstream queries.
pub struct PairCache {
    volatile: Cache<String, CacheEntry>,
    store: Arc<dyn KeyValueStore>,
    ttl_ms: u64,
}

impl PairCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_ms: u64, max_entries: u64) -> Self {
        let volatile = Cache::builder().max_capacity(max_entries).build();
        Self {
            volatile,
            store,
            ttl_ms,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    fn durable_key(key: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, key)
    }

    /// Look up a pair against the wall clock.
    pub async fn get(&self, key: &str) -> Result<Option<PairSnapshot>, CacheError> {
        self.get_at(key, chrono::Utc::now().timestamp_millis()).await
    }

    /// Look up a pair: volatile tier first, then the durable tier (promoting
    /// fresh hits). Stale entries read as `None`.
    #[instrument(skip(self))]
    pub async fn get_at(&self, key: &str, now_ms: i64) -> Result<Option<PairSnapshot>, CacheError> {
        if let Some(entry) = self.volatile.get(key).await {
            if entry.is_fresh(now_ms) {
                debug!("Volatile cache hit");
                return Ok(Some(entry.payload));
            }
        }

        let durable_key = Self::durable_key(key);
        let raw = match self.store.get(&durable_key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let entry: CacheEntry = serde_json::from_str(&raw).map_err(|source| CacheError::Malformed {
            key: durable_key,
            source,
        })?;

        if !entry.is_fresh(now_ms) {
            debug!("Durable cache entry expired");
            return Ok(None);
        }

        debug!("Durable cache hit, promoting");
        let payload = entry.payload.clone();
        self.volatile.insert(key.to_string(), entry).await;
        Ok(Some(payload))
    }

    /// Store a pair against the wall clock.
    pub async fn put(&self, key: &str, pair: &PairSnapshot) -> Result<(), CacheError> {
        self.put_at(key, pair, chrono::Utc::now().timestamp_millis()).await
    }

    /// Write through to both tiers with expiry `now + ttl`. The volatile write
    /// always lands; a durable failure is returned after it.
    #[instrument(skip(self, pair))]
    pub async fn put_at(&self, key: &str, pair: &PairSnapshot, now_ms: i64) -> Result<(), CacheError> {
        let entry = CacheEntry {
            key: key.to_string(),
            payload: pair.clone(),
            expires_at: now_ms.saturating_add(i64::try_from(self.ttl_ms).unwrap_or(i64::MAX)),
        };

        self.volatile.insert(key.to_string(), entry.clone()).await;

        let raw = serde_json::to_string(&entry)
            .map_err(|e| CacheError::Storage(anyhow::Error::new(e)))?;
        self.store.set(&Self::durable_key(key), &raw).await?;

        debug!("Cached pair until {}", entry.expires_at);
        Ok(())
    }

    /// Drop the volatile tier. The durable tier is left alone and will
    /// repopulate the volatile tier on the next read.
    pub fn clear(&self) {
        self.volatile.invalidate_all();
    }

    /// Entries currently held in the volatile tier (stale ones included).
    pub async fn volatile_len(&self) -> u64 {
        self.volatile.run_pending_tasks().await;
        self.volatile.entry_count()
    }
}
