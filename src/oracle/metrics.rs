//! In-process metrics for the scan pipeline.
//!
//! Counters for cache behavior, verdicts and upstream failures, plus a gauge
//! for the last scoring time.

use crate::oracle::types::RiskLabel;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub const SCANS_TOTAL: &str = "scans_total";
pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
pub const CACHE_ERRORS_TOTAL: &str = "cache_errors_total";
pub const UPSTREAM_NOT_FOUND_TOTAL: &str = "upstream_not_found_total";
pub const UPSTREAM_ERRORS_TOTAL: &str = "upstream_errors_total";
pub const LAST_SCORING_TIME: &str = "last_scoring_time_seconds";

/// Counter name for verdicts with a given label.
pub fn label_counter(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::Safe => "label_safe_total",
        RiskLabel::Risky => "label_risky_total",
        RiskLabel::RugVibes => "label_rug_vibes_total",
    }
}

/// Scan metrics collector.
#[derive(Clone, Default)]
pub struct ScanMetricsCollector {
    metrics: Arc<RwLock<InternalMetrics>>,
}

#[derive(Debug, Default)]
struct InternalMetrics {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, f64>,
}

impl ScanMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter metric.
    #[instrument(skip(self), fields(metric = %name))]
    pub async fn increment_counter(&self, name: &str) {
        let mut metrics = self.metrics.write().await;
        *metrics.counters.entry(name.to_string()).or_insert(0) += 1;
        debug!("Incremented counter: {}", name);
    }

    /// Set a gauge metric.
    pub async fn set_gauge(&self, name: &str, value: f64) {
        let mut metrics = self.metrics.write().await;
        metrics.gauges.insert(name.to_string(), value);
    }

    pub async fn record_scoring_time(&self, duration: Duration) {
        self.set_gauge(LAST_SCORING_TIME, duration.as_secs_f64()).await;
    }

    /// Record a finished scan and its verdict.
    pub async fn record_verdict(&self, label: RiskLabel) {
        self.increment_counter(SCANS_TOTAL).await;
        self.increment_counter(label_counter(label)).await;
    }

    pub async fn counter(&self, name: &str) -> u64 {
        self.metrics.read().await.counters.get(name).copied().unwrap_or(0)
    }

    pub async fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        let metrics = self.metrics.read().await;
        MetricsSnapshot {
            counters: metrics.counters.clone(),
            gauges: metrics.gauges.clone(),
            timestamp: Instant::now(),
        }
    }
}

/// Snapshot of current metrics.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub gauges: HashMap<String, f64>,
    pub timestamp: Instant,
}

impl MetricsSnapshot {
    /// Share of cache lookups served from cache, if any lookups happened.
    pub fn cache_hit_rate(&self) -> Option<f64> {
        let hits = self.counters.get(CACHE_HITS_TOTAL).copied().unwrap_or(0);
        let misses = self.counters.get(CACHE_MISSES_TOTAL).copied().unwrap_or(0);
        let total = hits + misses;
        if total == 0 {
            None
        } else {
            Some(hits as f64 / total as f64)
        }
    }
}
