//! Recent scans history: most-recent-first, one entry per mint, capped.

use crate::oracle::storage::KeyValueStore;
use crate::oracle::types::RecentScan;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Storage key for the serialized list.
pub const RECENT_SCANS_KEY: &str = "recentScans";

pub struct RecentScans {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    /// Serializes read-modify-write cycles on the stored list
    write_lock: Mutex<()>,
}

impl RecentScans {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    /// Current list. Unreadable or unparsable history reads as empty.
    pub async fn load(&self) -> Vec<RecentScan> {
        let raw = match self.store.get(RECENT_SCANS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read recent scans: {:#}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!("Discarding unparsable recent scans: {}", e);
                Vec::new()
            }
        }
    }

    /// Put `entry` at the front, dropping any older entry for the same mint.
    pub async fn record(&self, entry: RecentScan) -> Result<Vec<RecentScan>> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await;
        list.retain(|item| item.mint != entry.mint);
        list.insert(0, entry);
        list.truncate(self.limit);

        self.persist(&list).await?;
        debug!("Recent scans now hold {} entries", list.len());
        Ok(list)
    }

    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist(&[]).await
    }

    async fn persist(&self, list: &[RecentScan]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        self.store
            .set(RECENT_SCANS_KEY, &raw)
            .await
            .context("Failed to persist recent scans")
    }
}
