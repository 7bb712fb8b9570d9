//! Core types and data structures for the risk engine.

use crate::types::Mint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Named risk conditions. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// SOL-equivalent liquidity below the minimum
    ThinLiquidity,
    /// FDV far above the pooled liquidity
    FdvLiquiditySkewed,
    /// Too few transactions in the last 5 minutes
    LowRecentActivity,
    /// Too little USD volume in the last 5 minutes
    Weak5mVolume,
    /// Pair younger than the freshness threshold
    FreshLaunch,
    /// 1h volume churning through the pool
    VolumeLiquidityImbalance,
    /// Sells dominating recent trades
    SellPressure,
}

impl Trigger {
    /// Stable identifier used in serialized results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::ThinLiquidity => "thin-liquidity",
            Trigger::FdvLiquiditySkewed => "fdv-liquidity-skewed",
            Trigger::LowRecentActivity => "low-recent-activity",
            Trigger::Weak5mVolume => "weak-5m-volume",
            Trigger::FreshLaunch => "fresh-launch",
            Trigger::VolumeLiquidityImbalance => "volume-liquidity-imbalance",
            Trigger::SellPressure => "sell-pressure",
        }
    }

    /// Score contribution when the trigger fires.
    pub fn weight(&self) -> u32 {
        match self {
            Trigger::ThinLiquidity => 3,
            Trigger::FdvLiquiditySkewed => 2,
            Trigger::LowRecentActivity => 1,
            Trigger::Weak5mVolume => 1,
            Trigger::FreshLaunch => 2,
            Trigger::VolumeLiquidityImbalance => 1,
            Trigger::SellPressure => 1,
        }
    }

    /// Human-readable explanation, with thresholds filled in where useful.
    pub fn describe(&self, thresholds: &ScoreThresholds) -> String {
        match self {
            Trigger::ThinLiquidity => {
                format!("thin liquidity (<{} SOL)", thresholds.min_liquidity_sol)
            }
            Trigger::FdvLiquiditySkewed => "FDV/liquidity skewed".to_string(),
            Trigger::LowRecentActivity => "low recent activity".to_string(),
            Trigger::Weak5mVolume => "weak 5m volume".to_string(),
            Trigger::FreshLaunch => {
                format!("fresh launch (<{}h old)", thresholds.min_pair_age_hours)
            }
            Trigger::VolumeLiquidityImbalance => "1h volume vs liquidity imbalance".to_string(),
            Trigger::SellPressure => "sell pressure in last 5m".to_string(),
        }
    }

    /// All triggers in evaluation order.
    pub fn all() -> Vec<Trigger> {
        vec![
            Trigger::ThinLiquidity,
            Trigger::FdvLiquiditySkewed,
            Trigger::LowRecentActivity,
            Trigger::Weak5mVolume,
            Trigger::FreshLaunch,
            Trigger::VolumeLiquidityImbalance,
            Trigger::SellPressure,
        ]
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity label derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    Risky,
    #[serde(rename = "Rug Vibes")]
    RugVibes,
}

impl RiskLabel {
    /// Threshold ladder: >= 5 rug vibes, >= 3 risky, else safe.
    pub fn from_score(score: u32) -> Self {
        if score >= 5 {
            RiskLabel::RugVibes
        } else if score >= 3 {
            RiskLabel::Risky
        } else {
            RiskLabel::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::Risky => "Risky",
            RiskLabel::RugVibes => "Rug Vibes",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "\u{1F7E2}",
            RiskLabel::Risky => "\u{1F7E0}",
            RiskLabel::RugVibes => "\u{1F534}",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-negative figure that may be unbounded (zero-liquidity ratios,
/// unknown pair age).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    Finite(f64),
    Infinite,
}

impl Magnitude {
    /// `numerator / denominator`, with a zero denominator or an overflowing
    /// quotient mapped to `Infinite`.
    pub fn from_ratio(numerator: f64, denominator: f64) -> Self {
        if denominator <= 0.0 {
            return Magnitude::Infinite;
        }
        let ratio = numerator / denominator;
        if ratio.is_finite() {
            Magnitude::Finite(ratio)
        } else {
            Magnitude::Infinite
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Magnitude::Infinite)
    }

    /// Strict `>`; infinity exceeds every threshold.
    pub fn exceeds(&self, threshold: f64) -> bool {
        match self {
            Magnitude::Finite(v) => *v > threshold,
            Magnitude::Infinite => true,
        }
    }

    /// Strict `<`; infinity is never below a threshold.
    pub fn is_below(&self, threshold: f64) -> bool {
        match self {
            Magnitude::Finite(v) => *v < threshold,
            Magnitude::Infinite => false,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Magnitude::Finite(v) => *v,
            Magnitude::Infinite => f64::INFINITY,
        }
    }
}

impl Serialize for Magnitude {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Magnitude::Finite(v) => serializer.serialize_f64(*v),
            Magnitude::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl<'de> Deserialize<'de> for Magnitude {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Magnitude::Finite(v)),
            Repr::Text(s) if s == "infinite" => Ok(Magnitude::Infinite),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"infinite\", got {:?}",
                s
            ))),
        }
    }
}

/// Unit the display amount is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUnit {
    Sol,
    /// USD liquidity; carries the quote symbol (if any) as a label hint.
    Usd { quote_symbol: Option<String> },
    Quote(String),
}

impl DisplayUnit {
    /// Label for the liquidity stat, e.g. "LP (SOL)" or "LP (USDC)".
    pub fn label(&self) -> String {
        match self {
            DisplayUnit::Sol => "LP (SOL)".to_string(),
            DisplayUnit::Usd { quote_symbol } => {
                format!("LP ({})", quote_symbol.as_deref().unwrap_or("USD"))
            }
            DisplayUnit::Quote(symbol) => format!("LP ({})", symbol),
        }
    }
}

/// Normalized liquidity for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityEstimate {
    /// Always SOL-denominated; used only for scoring
    pub sol_equivalent: f64,
    /// Amount to show, in `display_unit`
    pub display_amount: f64,
    pub display_unit: DisplayUnit,
}

/// Secondary figures shown next to the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAnalysis {
    pub pair_age_hours: Magnitude,
    pub volume_to_liquidity_1h: f64,
    pub volume_1h: f64,
    pub buys_5m: f64,
    pub sells_5m: f64,
    pub sell_ratio_5m: f64,
}

/// Outcome of scoring one pair. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub label: RiskLabel,
    /// Fired triggers in evaluation order
    pub triggers: Vec<Trigger>,
    pub liquidity: LiquidityEstimate,
    pub fdv_to_liquidity: Magnitude,
    pub analysis: PairAnalysis,
    /// Reported USD liquidity (raw, coerced)
    pub liquidity_usd: f64,
    pub fdv: f64,
    pub volume_5m: f64,
    pub txns_5m: f64,
}

/// Tunable scoring thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// Minimum SOL-equivalent liquidity before flagging
    pub min_liquidity_sol: f64,
    /// FDV / liquidity above this is skewed
    pub max_fdv_to_liquidity: f64,
    /// Minimum transaction count in 5 minutes
    pub min_transactions_5m: f64,
    /// Minimum USD volume in 5 minutes; also gates the 1h imbalance check
    pub min_volume_5m_usd: f64,
    /// Pairs younger than this are fresh launches
    pub min_pair_age_hours: f64,
    /// 1h volume / liquidity above this is churn
    pub volume_liquidity_alert: f64,
    /// sells / (buys + sells) above this is dump pressure
    pub sell_pressure_ratio: f64,
    /// Trades needed before sell pressure is evaluated
    pub min_trades_for_pressure: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            min_liquidity_sol: 2.0,
            max_fdv_to_liquidity: 50.0,
            min_transactions_5m: 10.0,
            min_volume_5m_usd: 500.0,
            min_pair_age_hours: 12.0,
            volume_liquidity_alert: 1.5,
            sell_pressure_ratio: 0.7,
            min_trades_for_pressure: 20.0,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub thresholds: ScoreThresholds,
    /// Used when no SOL price can be read off the pair
    pub default_sol_price_usd: f64,
    /// Pair cache time-to-live in milliseconds
    pub cache_ttl_ms: u64,
    /// Maximum entries in the volatile cache tier
    pub max_cache_entries: u64,
    /// Number of recent scans kept
    pub recent_limit: usize,
    /// Market-data API base URL
    pub api_base_url: String,
    /// HTTP timeout in seconds
    pub http_timeout_seconds: u64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            thresholds: ScoreThresholds::default(),
            default_sol_price_usd: 150.0,
            cache_ttl_ms: 10_000,
            max_cache_entries: 1_000,
            recent_limit: 8,
            api_base_url: "https://api.dexscreener.com".to_string(),
            http_timeout_seconds: 10,
        }
    }
}

/// One entry of the recent-scans history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentScan {
    pub mint: Mint,
    pub label: RiskLabel,
    pub score: u32,
    /// Epoch milliseconds
    pub ts: i64,
}

/// Result of a full scan, ready for a rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub mint: Mint,
    pub result: ScoreResult,
    pub dexscreener_url: String,
    pub pump_url: String,
}

impl ScanReport {
    pub fn new(mint: Mint, result: ScoreResult) -> Self {
        Self {
            dexscreener_url: format!("https://dexscreener.com/solana/{}", mint),
            pump_url: format!("https://pump.fun/{}", mint),
            mint,
            result,
        }
    }
}
