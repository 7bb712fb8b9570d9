//! Risk scorer - turns a pair snapshot into a score, triggers and a label.
//!
//! Each trigger independently adds its weight to the running score. The
//! order of evaluation only affects display order.

use crate::oracle::liquidity::LiquidityNormalizer;
use crate::oracle::types::{
    Magnitude, PairAnalysis, RiskConfig, RiskLabel, ScoreResult, ScoreThresholds, Trigger,
};
use crate::types::PairSnapshot;
use tracing::debug;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Deterministic, stateless pair scorer.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    thresholds: ScoreThresholds,
    normalizer: LiquidityNormalizer,
}

impl RiskScorer {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            normalizer: LiquidityNormalizer::new(config.default_sol_price_usd),
        }
    }

    pub fn thresholds(&self) -> &ScoreThresholds {
        &self.thresholds
    }

    /// Score against the wall clock.
    pub fn score(&self, pair: &PairSnapshot) -> ScoreResult {
        self.score_at(pair, chrono::Utc::now().timestamp_millis())
    }

    /// Score with a fixed "now" (epoch ms) for pair-age computation.
    pub fn score_at(&self, pair: &PairSnapshot, now_ms: i64) -> ScoreResult {
        let t = &self.thresholds;
        let liquidity = self.normalizer.normalize(pair);

        let liquidity_usd = pair.liquidity_usd();
        let fdv = pair.fdv();
        let volume_5m = pair.volume_5m();
        let volume_1h = pair.volume_1h();
        let buys_5m = pair.buys_5m();
        let sells_5m = pair.sells_5m();
        let txns_5m = buys_5m + sells_5m;

        let fdv_to_liquidity = Magnitude::from_ratio(fdv, liquidity_usd);
        let volume_to_liquidity_1h = if liquidity_usd > 0.0 {
            // Saturate so the figure stays finite and serializable.
            (volume_1h / liquidity_usd).min(f64::MAX)
        } else {
            0.0
        };
        let sell_ratio_5m = if txns_5m > 0.0 { sells_5m / txns_5m } else { 0.0 };
        let pair_age_hours = pair_age_hours(pair, now_ms);

        let mut triggers = Vec::new();

        if liquidity.sol_equivalent < t.min_liquidity_sol {
            triggers.push(Trigger::ThinLiquidity);
        }
        if fdv_to_liquidity.exceeds(t.max_fdv_to_liquidity) {
            triggers.push(Trigger::FdvLiquiditySkewed);
        }
        if txns_5m < t.min_transactions_5m {
            triggers.push(Trigger::LowRecentActivity);
        }
        if volume_5m < t.min_volume_5m_usd {
            triggers.push(Trigger::Weak5mVolume);
        }
        if pair_age_hours.is_below(t.min_pair_age_hours) {
            triggers.push(Trigger::FreshLaunch);
        }
        if volume_to_liquidity_1h > t.volume_liquidity_alert && volume_1h > t.min_volume_5m_usd {
            triggers.push(Trigger::VolumeLiquidityImbalance);
        }
        // Zero trades never count as pressure, whatever the thresholds say.
        if txns_5m > 0.0
            && txns_5m >= t.min_trades_for_pressure
            && sell_ratio_5m > t.sell_pressure_ratio
        {
            triggers.push(Trigger::SellPressure);
        }

        let score = triggers.iter().map(Trigger::weight).sum();
        let label = RiskLabel::from_score(score);

        debug!("Scored pair: {} ({}) triggers={:?}", label, score, triggers);

        ScoreResult {
            score,
            label,
            triggers,
            liquidity,
            fdv_to_liquidity,
            analysis: PairAnalysis {
                pair_age_hours,
                volume_to_liquidity_1h,
                volume_1h,
                buys_5m,
                sells_5m,
                sell_ratio_5m,
            },
            liquidity_usd,
            fdv,
            volume_5m,
            txns_5m,
        }
    }

    /// Human-readable trigger summary for a result.
    pub fn explain(&self, result: &ScoreResult) -> Vec<String> {
        result
            .triggers
            .iter()
            .map(|trigger| trigger.describe(&self.thresholds))
            .collect()
    }
}

/// Hours since pair creation. Missing, zero or future timestamps are
/// infinite, so they never count as a fresh launch.
pub fn pair_age_hours(pair: &PairSnapshot, now_ms: i64) -> Magnitude {
    match pair.created_at_ms() {
        Some(created) => {
            let age_ms = now_ms as f64 - created;
            if age_ms.is_finite() && age_ms > 0.0 {
                Magnitude::Finite(age_ms / MS_PER_HOUR)
            } else {
                Magnitude::Infinite
            }
        }
        None => Magnitude::Infinite,
    }
}
