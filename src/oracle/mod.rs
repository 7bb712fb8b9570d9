//! Oracle module - pair risk scoring.
//!
//! Liquidity normalization and rule-based scoring sit at the core; the
//! two-tier cache, the market-data source and the recent-scans history are
//! the collaborators the [`RiskOracle`] orchestrates.

pub mod types;
pub mod errors;
pub mod liquidity;
pub mod scorer;
pub mod storage;
pub mod cache;
pub mod data_sources;
pub mod history;
pub mod metrics;
pub mod format;
pub mod risk_oracle;

// Re-export main public types and the orchestrator
pub use risk_oracle::{validate_mint, RiskOracle};
pub use types::{
    DisplayUnit, LiquidityEstimate, Magnitude, PairAnalysis, RecentScan, RiskConfig, RiskLabel,
    ScanReport, ScoreResult, ScoreThresholds, Trigger,
};

// Re-export other key components for advanced usage
pub use cache::PairCache;
pub use data_sources::{DexScreenerClient, PairSource};
pub use errors::{CacheError, FetchError, ScanError};
pub use history::RecentScans;
pub use liquidity::LiquidityNormalizer;
pub use metrics::{MetricsSnapshot, ScanMetricsCollector};
pub use scorer::RiskScorer;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

use std::sync::Arc;

/// Builder for [`RiskOracle`] with sensible defaults.
pub struct RiskOracleBuilder {
    config: RiskConfig,
}

impl RiskOracleBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: RiskConfig::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from disk.
    pub fn from_config(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Set score thresholds.
    pub fn with_thresholds(mut self, thresholds: ScoreThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Set the SOL price used when the pair carries none.
    pub fn with_default_sol_price(mut self, price_usd: f64) -> Self {
        self.config.default_sol_price_usd = price_usd;
        self
    }

    /// Set cache TTL in milliseconds.
    pub fn with_cache_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.config.cache_ttl_ms = ttl_ms;
        self
    }

    /// Set max volatile cache entries.
    pub fn with_max_cache_entries(mut self, max_entries: u64) -> Self {
        self.config.max_cache_entries = max_entries;
        self
    }

    /// Set how many recent scans are kept.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.config.recent_limit = limit;
        self
    }

    /// Set the market-data API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Set HTTP timeout in seconds.
    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.config.http_timeout_seconds = seconds;
        self
    }

    /// Build the oracle configuration.
    pub fn build_config(self) -> RiskConfig {
        self.config
    }

    /// Build the oracle over the given store and pair source.
    pub fn build(self, store: Arc<dyn KeyValueStore>, source: Arc<dyn PairSource>) -> RiskOracle {
        RiskOracle::new(self.config, store, source)
    }

    /// Build the oracle against the live DexScreener API.
    pub fn build_with_dexscreener(self, store: Arc<dyn KeyValueStore>) -> anyhow::Result<RiskOracle> {
        let source = Arc::new(DexScreenerClient::from_config(&self.config)?);
        Ok(self.build(store, source))
    }
}

impl Default for RiskOracleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
