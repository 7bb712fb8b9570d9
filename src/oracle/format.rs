//! Display helpers for scan results.
//!
//! Everything here is presentation only. Invalid or missing figures render
//! as `--`.

use crate::oracle::types::{DisplayUnit, Magnitude, RecentScan, ScanReport, ScoreThresholds, Trigger};

const PLACEHOLDER: &str = "--";

/// `$1.2b`, `$3.4m`, `$5.6k`, `$123`.
pub fn format_usd_short(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    if value >= 1_000_000_000.0 {
        format!("${:.1}b", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.1}m", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}k", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// `1.2m`, `3.4k`, `12.34`.
pub fn format_token_amount(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    if value >= 1_000_000.0 {
        format!("{:.1}m", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{:.2}", value)
    }
}

/// Ratio as a multiple: `>1000x`, `42x`, `1.5x`.
pub fn format_multiple(value: Magnitude) -> String {
    match value {
        Magnitude::Infinite => ">1000x".to_string(),
        Magnitude::Finite(v) if !v.is_finite() || v <= 0.0 => PLACEHOLDER.to_string(),
        Magnitude::Finite(v) if v >= 1000.0 => ">1000x".to_string(),
        Magnitude::Finite(v) if v >= 10.0 => format!("{:.0}x", v),
        Magnitude::Finite(v) => format!("{:.1}x", v),
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}%", (value * 100.0).round() as i64)
}

/// Pair age: `<1h`, `5.5h`, `3.2d`; unknown age renders as `--`.
pub fn format_age(hours: Magnitude) -> String {
    match hours {
        Magnitude::Infinite => PLACEHOLDER.to_string(),
        Magnitude::Finite(h) if !h.is_finite() => PLACEHOLDER.to_string(),
        Magnitude::Finite(h) if h < 1.0 => "<1h".to_string(),
        Magnitude::Finite(h) if h < 24.0 => format!("{:.1}h", h),
        Magnitude::Finite(h) => format!("{:.1}d", h / 24.0),
    }
}

/// `12/30 (71% sells)`.
pub fn format_buy_sell(buys: f64, sells: f64) -> String {
    let total = buys + sells;
    if total <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    format!("{}/{} ({} sells)", buys, sells, format_percent(sells / total))
}

/// Liquidity stat in its display unit.
pub fn format_liquidity(amount: f64, unit: &DisplayUnit) -> String {
    match unit {
        DisplayUnit::Usd { .. } => format_usd_short(amount),
        DisplayUnit::Sol | DisplayUnit::Quote(_) => format_token_amount(amount),
    }
}

/// One-line explanation of the fired triggers.
pub fn describe_triggers(triggers: &[Trigger], thresholds: &ScoreThresholds) -> String {
    if triggers.is_empty() {
        return "No major red flags detected.".to_string();
    }
    triggers
        .iter()
        .map(|t| t.describe(thresholds))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Relative time for history entries.
pub fn time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms).div_euclid(1000);
    if seconds < 60 {
        return "just now".to_string();
    }
    if seconds < 3600 {
        return format!("{}m ago", seconds / 60);
    }
    let hours = seconds / 3600;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Text card for a finished scan.
pub fn render_report(report: &ScanReport, thresholds: &ScoreThresholds) -> String {
    let result = &report.result;
    let analysis = &result.analysis;
    let liquidity = &result.liquidity;

    let rows = [
        (
            liquidity.display_unit.label(),
            format_liquidity(liquidity.display_amount, &liquidity.display_unit),
        ),
        ("FDV".to_string(), format_usd_short(result.fdv)),
        ("Vol 5m".to_string(), format_usd_short(result.volume_5m)),
        ("Txns 5m".to_string(), format!("{}", result.txns_5m)),
        ("Pair age".to_string(), format_age(analysis.pair_age_hours)),
        ("FDV / Liquidity".to_string(), format_multiple(result.fdv_to_liquidity)),
        (
            "1h volume vs LP".to_string(),
            format_multiple(Magnitude::Finite(analysis.volume_to_liquidity_1h)),
        ),
        (
            "5m buys / sells".to_string(),
            format_buy_sell(analysis.buys_5m, analysis.sells_5m),
        ),
    ];

    let mut out = String::new();
    out.push_str(&format!(
        "{} {} (score {})\n",
        result.label.emoji(),
        result.label,
        result.score
    ));
    out.push_str(&format!("{}\n", describe_triggers(&result.triggers, thresholds)));
    out.push_str(&format!("mint: {}\n", report.mint));
    for (label, value) in rows.iter() {
        out.push_str(&format!("  {:<16} {}\n", label, value));
    }
    out.push_str(&format!("  {}\n", report.dexscreener_url));
    out.push_str(&format!("  {}\n", report.pump_url));
    out
}

/// One line per history entry.
pub fn render_recent(list: &[RecentScan], now_ms: i64) -> String {
    if list.is_empty() {
        return "No recent scans.\n".to_string();
    }
    list.iter()
        .map(|item| {
            format!(
                "{}  {:<10} {} ({})\n",
                item.mint,
                time_ago(item.ts, now_ms),
                item.label,
                item.score
            )
        })
        .collect()
}
