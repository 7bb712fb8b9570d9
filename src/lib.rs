//! rug-vibes - quick risk verdicts for Solana token pairs
//!
//! This crate scores the primary DexScreener pair of a token mint against a
//! fixed set of weighted red flags and labels it Safe, Risky or Rug Vibes.

pub mod types;
pub mod oracle;

// Re-export main types for convenience
pub use oracle::{RiskOracle, RiskOracleBuilder, ScanReport, ScoreResult};
pub use types::{Mint, PairSnapshot};
