//! Scan orchestrator.
//!
//! Ties the pieces together for one request: mint validation, cache-then-fetch,
//! scoring, history and metrics.

use crate::oracle::cache::PairCache;
use crate::oracle::data_sources::PairSource;
use crate::oracle::errors::{FetchError, ScanError};
use crate::oracle::history::RecentScans;
use crate::oracle::metrics::{
    MetricsSnapshot, ScanMetricsCollector, CACHE_ERRORS_TOTAL, CACHE_HITS_TOTAL,
    CACHE_MISSES_TOTAL, UPSTREAM_ERRORS_TOTAL, UPSTREAM_NOT_FOUND_TOTAL,
};
use crate::oracle::scorer::RiskScorer;
use crate::oracle::storage::KeyValueStore;
use crate::oracle::types::{RecentScan, RiskConfig, ScanReport};
use crate::types::PairSnapshot;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Base58 alphabet, 32-44 characters.
static MINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("Invalid mint pattern regex"));

/// Trim `input` and check it looks like a Solana mint.
pub fn validate_mint(input: &str) -> Result<String, ScanError> {
    let mint = input.trim();
    if MINT_PATTERN.is_match(mint) {
        Ok(mint.to_string())
    } else {
        Err(ScanError::InvalidMint(mint.to_string()))
    }
}

/// Risk oracle: scores the primary pair of a mint on demand.
pub struct RiskOracle {
    config: RiskConfig,
    source: Arc<dyn PairSource>,
    cache: PairCache,
    history: RecentScans,
    scorer: RiskScorer,
    metrics: ScanMetricsCollector,
}

impl RiskOracle {
    pub fn new(
        config: RiskConfig,
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn PairSource>,
    ) -> Self {
        let cache = PairCache::new(store.clone(), config.cache_ttl_ms, config.max_cache_entries);
        let history = RecentScans::new(store, config.recent_limit);
        let scorer = RiskScorer::new(&config);

        info!(
            "Created risk oracle (cache ttl {}ms, recent limit {})",
            config.cache_ttl_ms, config.recent_limit
        );

        Self {
            config,
            source,
            cache,
            history,
            scorer,
            metrics: ScanMetricsCollector::new(),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Validate, fetch (through the cache) and score one mint.
    #[instrument(skip(self), fields(mint = %input.trim()))]
    pub async fn scan(&self, input: &str) -> Result<ScanReport, ScanError> {
        let mint = validate_mint(input)?;
        let pair = self.load_pair(&mint).await?;

        let started = Instant::now();
        let result = self.scorer.score(&pair);
        self.metrics.record_scoring_time(started.elapsed()).await;

        debug!(
            "Scored {} at {} ({:?})",
            mint, result.score, result.triggers
        );

        let entry = RecentScan {
            mint: mint.clone(),
            label: result.label,
            score: result.score,
            ts: chrono::Utc::now().timestamp_millis(),
        };
        if let Err(e) = self.history.record(entry).await {
            warn!("Failed to record recent scan: {:#}", e);
        }

        self.metrics.record_verdict(result.label).await;
        info!("{} -> {} (score {})", mint, result.label, result.score);

        Ok(ScanReport::new(mint, result))
    }

    /// Cache-then-fetch. Cache failures degrade to a miss.
    async fn load_pair(&self, mint: &str) -> Result<PairSnapshot, ScanError> {
        match self.cache.get(mint).await {
            Ok(Some(pair)) => {
                self.metrics.increment_counter(CACHE_HITS_TOTAL).await;
                return Ok(pair);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Cache read failed, treating as miss: {}", e);
                self.metrics.increment_counter(CACHE_ERRORS_TOTAL).await;
            }
        }
        self.metrics.increment_counter(CACHE_MISSES_TOTAL).await;

        let pair = match self.source.fetch_pair(mint).await {
            Ok(pair) => pair,
            Err(e) => {
                let counter = match e {
                    FetchError::NotFound(_) => UPSTREAM_NOT_FOUND_TOTAL,
                    FetchError::Transport(_) => UPSTREAM_ERRORS_TOTAL,
                };
                self.metrics.increment_counter(counter).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.cache.put(mint, &pair).await {
            warn!("Failed to cache pair: {}", e);
        }
        Ok(pair)
    }

    pub async fn recent_scans(&self) -> Vec<RecentScan> {
        self.history.load().await
    }

    pub async fn clear_recent(&self) -> Result<()> {
        self.history.clear().await
    }

    /// Drop the in-memory cache tier.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub async fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.get_metrics_snapshot().await
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::storage::MemoryStore;
    use crate::oracle::types::RiskLabel;
    use crate::types::PairLiquidity;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MINT: &str = "So11111111111111111111111111111111111111112";

    struct FixedSource {
        pair: PairSnapshot,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PairSource for FixedSource {
        async fn fetch_pair(&self, _mint: &str) -> Result<PairSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pair.clone())
        }
    }

    fn thin_pair() -> PairSnapshot {
        PairSnapshot {
            liquidity: Some(PairLiquidity {
                usd: Some(100.0),
                base: None,
                quote: None,
            }),
            ..Default::default()
        }
    }

    fn create_oracle(source: Arc<FixedSource>) -> RiskOracle {
        RiskOracle::new(RiskConfig::default(), Arc::new(MemoryStore::new()), source)
    }

    #[test]
    fn test_validate_mint() {
        assert_eq!(validate_mint(&format!("  {}\n", MINT)).unwrap(), MINT);
        assert!(validate_mint("").is_err());
        assert!(validate_mint("short").is_err());
        // 0, O, I and l are outside base58.
        assert!(validate_mint("0o11111111111111111111111111111111111111112").is_err());
        assert!(validate_mint(&"1".repeat(45)).is_err());
        assert!(validate_mint(&"1".repeat(32)).is_ok());
    }

    #[tokio::test]
    async fn test_scan_scores_and_records() {
        let source = Arc::new(FixedSource {
            pair: thin_pair(),
            calls: AtomicUsize::new(0),
        });
        let oracle = create_oracle(source.clone());

        let report = oracle.scan(MINT).await.unwrap();
        assert_eq!(report.mint, MINT);
        assert_eq!(report.result.label, RiskLabel::RugVibes);

        let recent = oracle.recent_scans().await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].score, report.result.score);
    }

    #[tokio::test]
    async fn test_second_scan_hits_cache() {
        let source = Arc::new(FixedSource {
            pair: thin_pair(),
            calls: AtomicUsize::new(0),
        });
        let oracle = create_oracle(source.clone());

        let first = oracle.scan(MINT).await.unwrap();
        let second = oracle.scan(MINT).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.result.score, second.result.score);

        let metrics = oracle.get_metrics().await;
        assert_eq!(metrics.counters.get(CACHE_HITS_TOTAL), Some(&1));
        assert_eq!(metrics.counters.get(CACHE_MISSES_TOTAL), Some(&1));
    }

    #[tokio::test]
    async fn test_invalid_mint_never_reaches_source() {
        let source = Arc::new(FixedSource {
            pair: thin_pair(),
            calls: AtomicUsize::new(0),
        });
        let oracle = create_oracle(source.clone());

        let err = oracle.scan("not a mint").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidMint(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(oracle.recent_scans().await.is_empty());
    }
}
