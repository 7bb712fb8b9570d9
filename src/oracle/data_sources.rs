//! Data sources for fetching pair snapshots.
//!
//! The engine only depends on [`PairSource`]; [`DexScreenerClient`] is the
//! production implementation against the public DexScreener API. No retries
//! happen here: the caller decides whether a transport failure is worth
//! another attempt.

use crate::oracle::errors::FetchError;
use crate::oracle::types::RiskConfig;
use crate::types::PairSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Upstream provider of pair snapshots.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Fetch the primary live pair for a mint.
    async fn fetch_pair(&self, mint: &str) -> Result<PairSnapshot, FetchError>;
}

/// `GET /latest/dex/tokens/{mint}` response body.
#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<PairSnapshot>>,
}

/// HTTP client for the DexScreener API.
pub struct DexScreenerClient {
    http_client: Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client with its own HTTP connection pool from config.
    pub fn from_config(config: &RiskConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self::new(http_client, config.api_base_url.clone()))
    }

    pub fn token_url(&self, mint: &str) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, mint)
    }
}

#[async_trait]
impl PairSource for DexScreenerClient {
    #[instrument(skip(self))]
    async fn fetch_pair(&self, mint: &str) -> Result<PairSnapshot, FetchError> {
        let url = self.token_url(mint);

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| {
                warn!("DexScreener request failed: {}", e);
                FetchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("DexScreener returned {}", status);
            return Err(FetchError::Transport(format!("HTTP {}", status)));
        }

        let body: TokenPairsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to parse response: {}", e)))?;

        let pair = body
            .pairs
            .and_then(|pairs| pairs.into_iter().next())
            .ok_or_else(|| FetchError::NotFound(mint.to_string()))?;

        debug!("Fetched pair {:?} on {:?}", pair.pair_address, pair.dex_id);
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_strips_trailing_slash() {
        let client = DexScreenerClient::new(Client::new(), "https://api.example.com/");
        assert_eq!(
            client.token_url("MintX"),
            "https://api.example.com/latest/dex/tokens/MintX"
        );
    }

    #[test]
    fn test_client_from_default_config() {
        let client = DexScreenerClient::from_config(&RiskConfig::default()).unwrap();
        assert!(client.token_url("M").starts_with("https://api.dexscreener.com/"));
    }

    #[test]
    fn test_response_with_null_pairs_parses() {
        let body: TokenPairsResponse =
            serde_json::from_str(r#"{"schemaVersion": "1.0.0", "pairs": null}"#).unwrap();
        assert!(body.pairs.is_none());

        let body: TokenPairsResponse = serde_json::from_str(r#"{"pairs": []}"#).unwrap();
        assert_eq!(body.pairs.map(|p| p.len()), Some(0));
    }

    #[test]
    fn test_first_pair_is_primary() {
        let body: TokenPairsResponse = serde_json::from_str(
            r#"{"pairs": [{"pairAddress": "first", "fdv": 10}, {"pairAddress": "second"}]}"#,
        )
        .unwrap();
        let first = body.pairs.unwrap().into_iter().next().unwrap();
        assert_eq!(first.pair_address.as_deref(), Some("first"));
        assert_eq!(first.fdv(), 10.0);
    }

    #[test]
    fn test_mistyped_pair_fields_still_parse() {
        let body: TokenPairsResponse = serde_json::from_str(
            r#"{"pairs": [{"liquidity": "n/a", "fdv": 10, "quoteToken": {"symbol": 5}}]}"#,
        )
        .unwrap();
        let pair = body.pairs.unwrap().into_iter().next().unwrap();
        assert_eq!(pair.liquidity, None);
        assert_eq!(pair.fdv(), 10.0);
        assert_eq!(pair.quote_symbol(), "");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        // Port 9 (discard) on localhost is almost never listening.
        let client = DexScreenerClient::new(http_client, "http://127.0.0.1:9");

        let err = client.fetch_pair("MintX").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
