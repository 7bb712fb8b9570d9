//! Liquidity normalization.
//!
//! Sources report pool depth inconsistently: sometimes only in USD, sometimes
//! only as a quote-token amount, sometimes only as the base side. This module
//! walks a fallback chain to recover a SOL-equivalent figure for scoring and a
//! display amount for presentation.

use crate::oracle::types::{DisplayUnit, LiquidityEstimate};
use crate::types::{PairSnapshot, SOL_MINT};
use tracing::debug;

/// A quote price above this is taken as a real USD price rather than a
/// near-zero memecoin quote.
const QUOTE_PRICE_SANITY_USD: f64 = 10.0;

/// Converts raw pair liquidity into a [`LiquidityEstimate`].
#[derive(Debug, Clone)]
pub struct LiquidityNormalizer {
    default_sol_price_usd: f64,
}

impl LiquidityNormalizer {
    pub fn new(default_sol_price_usd: f64) -> Self {
        Self { default_sol_price_usd }
    }

    pub fn normalize(&self, pair: &PairSnapshot) -> LiquidityEstimate {
        normalize(pair, self.default_sol_price_usd)
    }
}

/// Whether the quote asset is SOL (or wrapped SOL).
pub fn is_sol_quoted(pair: &PairSnapshot) -> bool {
    let address = pair.quote_address();
    if !address.is_empty() && address.eq_ignore_ascii_case(SOL_MINT) {
        return true;
    }
    matches!(pair.quote_symbol().as_str(), "SOL" | "WSOL")
}

/// Maps non-finite or non-positive values to zero.
fn clamp_positive(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Normalize pair liquidity. Never fails; missing data degrades to zero.
pub fn normalize(pair: &PairSnapshot, default_sol_price_usd: f64) -> LiquidityEstimate {
    let sol_pool = is_sol_quoted(pair);
    let quote_price_usd = pair.quote_price_usd();

    let sol_price_usd = if (sol_pool && quote_price_usd > 0.0)
        || quote_price_usd > QUOTE_PRICE_SANITY_USD
    {
        quote_price_usd
    } else {
        default_sol_price_usd
    };

    let liquidity_quote = pair.liquidity_quote();
    let liquidity_base = pair.liquidity_base();
    let price_native = pair.price_native();

    let quote_amount = if liquidity_quote > 0.0 {
        liquidity_quote
    } else if liquidity_base > 0.0 && price_native > 0.0 {
        liquidity_base * price_native
    } else {
        0.0
    };

    let reported_usd = pair.liquidity_usd();
    let price_usd = pair.price_usd();
    let usd_liquidity = if reported_usd > 0.0 {
        reported_usd
    } else if quote_amount > 0.0 && quote_price_usd > 0.0 {
        quote_amount * quote_price_usd
    } else if liquidity_base > 0.0 && price_usd > 0.0 {
        liquidity_base * price_usd
    } else {
        0.0
    };

    let usd_in_sol = if usd_liquidity > 0.0 {
        usd_liquidity / sol_price_usd
    } else {
        0.0
    };

    let sol_equivalent = if sol_pool && quote_amount > 0.0 {
        quote_amount
    } else {
        usd_in_sol
    };

    let (display_amount, display_unit) = if sol_pool {
        let amount = if quote_amount > 0.0 { quote_amount } else { sol_equivalent };
        (amount, DisplayUnit::Sol)
    } else {
        let symbol = pair.quote_symbol();
        let quote_symbol = if symbol.is_empty() { None } else { Some(symbol) };
        (usd_liquidity, DisplayUnit::Usd { quote_symbol })
    };

    let estimate = LiquidityEstimate {
        sol_equivalent: clamp_positive(sol_equivalent),
        display_amount: clamp_positive(display_amount),
        display_unit,
    };

    debug!(
        "Liquidity: sol_pool={} sol_price=${:.2} quote={:.4} usd={:.2} -> {:.4} SOL",
        sol_pool, sol_price_usd, quote_amount, usd_liquidity, estimate.sol_equivalent
    );

    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PairLiquidity, PairToken};

    fn pair_with(
        quote: Option<PairToken>,
        liquidity: PairLiquidity,
        price_native: Option<f64>,
        price_usd: Option<f64>,
    ) -> PairSnapshot {
        PairSnapshot {
            quote_token: quote,
            liquidity: Some(liquidity),
            price_native,
            price_usd,
            ..Default::default()
        }
    }

    fn sol_quote(price_usd: Option<f64>) -> PairToken {
        PairToken {
            address: Some(SOL_MINT.to_string()),
            symbol: Some("SOL".to_string()),
            price_usd,
            ..Default::default()
        }
    }

    fn usdc_quote() -> PairToken {
        PairToken {
            address: Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string()),
            symbol: Some("usdc".to_string()),
            price_usd: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_sol_detection() {
        let by_mint = PairSnapshot {
            quote_token: Some(PairToken {
                address: Some(SOL_MINT.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(is_sol_quoted(&by_mint));

        let by_symbol = PairSnapshot {
            quote_token: Some(PairToken {
                symbol: Some("wSol".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(is_sol_quoted(&by_symbol));

        assert!(!is_sol_quoted(&pair_with(Some(usdc_quote()), PairLiquidity::default(), None, None)));
        assert!(!is_sol_quoted(&PairSnapshot::default()));
    }

    #[test]
    fn test_sol_pool_uses_quote_amount_directly() {
        let pair = pair_with(
            Some(sol_quote(None)),
            PairLiquidity { usd: Some(9_000.0), base: None, quote: Some(30.0) },
            None,
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert_eq!(estimate.sol_equivalent, 30.0);
        assert_eq!(estimate.display_amount, 30.0);
        assert_eq!(estimate.display_unit, DisplayUnit::Sol);
    }

    #[test]
    fn test_sol_pool_derives_quote_from_base_side() {
        let pair = pair_with(
            Some(sol_quote(None)),
            PairLiquidity { usd: None, base: Some(1_000_000.0), quote: None },
            Some(0.00002),
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert!((estimate.sol_equivalent - 20.0).abs() < 1e-9);
        assert!((estimate.display_amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_sol_pool_falls_back_to_usd_over_quote_price() {
        let pair = pair_with(
            Some(sol_quote(Some(200.0))),
            PairLiquidity { usd: Some(4_000.0), base: None, quote: None },
            None,
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert!((estimate.sol_equivalent - 20.0).abs() < 1e-9);
        // No quote amount, so SOL display shows the SOL-equivalent.
        assert!((estimate.display_amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_usd_pool_uses_default_sol_price() {
        let pair = pair_with(
            Some(usdc_quote()),
            PairLiquidity { usd: Some(1_000.0), base: None, quote: Some(1_000.0) },
            None,
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert!((estimate.sol_equivalent - 6.666_666).abs() < 1e-3);
        assert_eq!(estimate.display_amount, 1_000.0);
        assert_eq!(
            estimate.display_unit,
            DisplayUnit::Usd { quote_symbol: Some("USDC".to_string()) }
        );
    }

    #[test]
    fn test_high_quote_price_is_treated_as_sol_price() {
        let quote = PairToken {
            symbol: Some("JUPSOL".to_string()),
            price_usd: Some(100.0),
            ..Default::default()
        };
        let pair = pair_with(
            Some(quote),
            PairLiquidity { usd: Some(1_000.0), base: None, quote: None },
            None,
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert!((estimate.sol_equivalent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_usd_derived_from_quote_side() {
        let pair = pair_with(
            Some(usdc_quote()),
            PairLiquidity { usd: None, base: None, quote: Some(3_000.0) },
            None,
            None,
        );

        let estimate = normalize(&pair, 150.0);
        assert_eq!(estimate.display_amount, 3_000.0);
        assert!((estimate.sol_equivalent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_usd_derived_from_base_side() {
        let pair = pair_with(
            None,
            PairLiquidity { usd: None, base: Some(500_000.0), quote: None },
            None,
            Some(0.003),
        );

        let estimate = normalize(&pair, 150.0);
        assert!((estimate.display_amount - 1_500.0).abs() < 1e-9);
        assert!((estimate.sol_equivalent - 10.0).abs() < 1e-9);
        assert_eq!(estimate.display_unit, DisplayUnit::Usd { quote_symbol: None });
    }

    #[test]
    fn test_empty_pair_degrades_to_zero() {
        let estimate = normalize(&PairSnapshot::default(), 150.0);
        assert_eq!(estimate.sol_equivalent, 0.0);
        assert_eq!(estimate.display_amount, 0.0);
        assert_eq!(estimate.display_unit, DisplayUnit::Usd { quote_symbol: None });
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        let pair = pair_with(
            Some(usdc_quote()),
            PairLiquidity { usd: Some(-50.0), base: Some(-1.0), quote: Some(-2.0) },
            Some(-1.0),
            Some(-1.0),
        );

        let estimate = normalize(&pair, 150.0);
        assert_eq!(estimate.sol_equivalent, 0.0);
        assert_eq!(estimate.display_amount, 0.0);
    }

    #[test]
    fn test_normalizer_wraps_configured_price() {
        let normalizer = LiquidityNormalizer::new(100.0);
        let pair = pair_with(
            None,
            PairLiquidity { usd: Some(1_000.0), base: None, quote: None },
            None,
            None,
        );
        assert!((normalizer.normalize(&pair).sol_equivalent - 10.0).abs() < 1e-9);
    }
}
