//! Core types and data structures for the pair snapshots consumed by the risk engine.
//!
//! Upstream market-data APIs are loose about types: prices arrive as strings,
//! counts may be missing, and any field can be `null` or of the wrong type.
//! Every field is therefore optional: numeric leaves are read through
//! [`lenient_f64`], everything else through [`lenient`], and all coercion to
//! zero happens in the accessor methods on [`PairSnapshot`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A token mint address (base58 string).
pub type Mint = String;

/// Canonical wrapped-SOL mint.
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Raw snapshot of one trading pair as reported by the market-data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PairSnapshot {
    /// Chain identifier (e.g. "solana")
    #[serde(deserialize_with = "lenient")]
    pub chain_id: Option<String>,
    /// DEX identifier (e.g. "raydium")
    #[serde(deserialize_with = "lenient")]
    pub dex_id: Option<String>,
    /// Address of the pair/pool account
    #[serde(deserialize_with = "lenient")]
    pub pair_address: Option<String>,
    /// The traded token
    #[serde(deserialize_with = "lenient")]
    pub base_token: Option<PairToken>,
    /// The token the pair is priced in
    #[serde(deserialize_with = "lenient")]
    pub quote_token: Option<PairToken>,
    /// Base token price expressed in quote token units
    #[serde(deserialize_with = "lenient_f64")]
    pub price_native: Option<f64>,
    /// Base token price in USD
    #[serde(deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    /// Pooled liquidity
    #[serde(deserialize_with = "lenient")]
    pub liquidity: Option<PairLiquidity>,
    /// Fully-diluted valuation in USD
    #[serde(deserialize_with = "lenient_f64")]
    pub fdv: Option<f64>,
    /// Trailing traded volume in USD
    #[serde(deserialize_with = "lenient")]
    pub volume: Option<PairVolume>,
    /// Trailing transaction counts
    #[serde(deserialize_with = "lenient")]
    pub txns: Option<PairTxns>,
    /// Pair creation time in epoch milliseconds
    #[serde(deserialize_with = "lenient_f64")]
    pub pair_created_at: Option<f64>,
}

/// Token identity within a pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PairToken {
    #[serde(deserialize_with = "lenient")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub symbol: Option<String>,
    /// Only some sources report a USD price for the quote token.
    #[serde(deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairLiquidity {
    #[serde(deserialize_with = "lenient_f64")]
    pub usd: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub base: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub quote: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairVolume {
    #[serde(deserialize_with = "lenient_f64")]
    pub m5: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub h1: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub h6: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairTxns {
    #[serde(deserialize_with = "lenient")]
    pub m5: Option<TxnCounts>,
    #[serde(deserialize_with = "lenient")]
    pub h1: Option<TxnCounts>,
    #[serde(deserialize_with = "lenient")]
    pub h24: Option<TxnCounts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxnCounts {
    #[serde(deserialize_with = "lenient_f64")]
    pub buys: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub sells: Option<f64>,
}

/// Reads any value as `T`, mapping `null` or a type mismatch to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| T::deserialize(v).ok()))
}

/// Accepts a JSON number or a numeric string. Anything else (null, bools,
/// objects, unparsable strings, non-finite values) maps to `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// Zero for missing or non-finite values.
fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl PairSnapshot {
    pub fn liquidity_usd(&self) -> f64 {
        or_zero(self.liquidity.as_ref().and_then(|l| l.usd))
    }

    pub fn liquidity_quote(&self) -> f64 {
        or_zero(self.liquidity.as_ref().and_then(|l| l.quote))
    }

    pub fn liquidity_base(&self) -> f64 {
        or_zero(self.liquidity.as_ref().and_then(|l| l.base))
    }

    pub fn price_native(&self) -> f64 {
        or_zero(self.price_native)
    }

    pub fn price_usd(&self) -> f64 {
        or_zero(self.price_usd)
    }

    pub fn fdv(&self) -> f64 {
        or_zero(self.fdv)
    }

    pub fn volume_5m(&self) -> f64 {
        or_zero(self.volume.as_ref().and_then(|v| v.m5))
    }

    pub fn volume_1h(&self) -> f64 {
        or_zero(self.volume.as_ref().and_then(|v| v.h1))
    }

    pub fn buys_5m(&self) -> f64 {
        or_zero(self.txns.as_ref().and_then(|t| t.m5.as_ref()).and_then(|c| c.buys))
    }

    pub fn sells_5m(&self) -> f64 {
        or_zero(self.txns.as_ref().and_then(|t| t.m5.as_ref()).and_then(|c| c.sells))
    }

    /// Quote symbol, uppercased; empty when unknown.
    pub fn quote_symbol(&self) -> String {
        self.quote_token
            .as_ref()
            .and_then(|t| t.symbol.as_deref())
            .map(str::to_uppercase)
            .unwrap_or_default()
    }

    /// Quote address as reported; empty when unknown.
    pub fn quote_address(&self) -> &str {
        self.quote_token
            .as_ref()
            .and_then(|t| t.address.as_deref())
            .unwrap_or("")
    }

    pub fn quote_price_usd(&self) -> f64 {
        or_zero(self.quote_token.as_ref().and_then(|t| t.price_usd))
    }

    /// Creation timestamp in epoch ms. Zero counts as missing.
    pub fn created_at_ms(&self) -> Option<f64> {
        self.pair_created_at.filter(|t| t.is_finite() && *t != 0.0)
    }
}
