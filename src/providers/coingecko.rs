use crate::core::asset::{CatalogProvider, RawAsset};
use crate::core::convert::DEFAULT_TIMEOUT;
use crate::core::quote::{QuoteProvider, Quotes};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// CoinGecko-style public API serving both the coin catalog and spot prices.
pub struct CoinGeckoProvider {
    base_url: String,
    timeout: Duration,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .user_agent("xconv/1.0")
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        debug!(status = %response.status(), "Received CoinGecko response");

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for URL: {url}"))
    }
}

#[async_trait]
impl CatalogProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoCatalogFetch", skip(self))]
    async fn fetch_catalog(&self) -> Result<Vec<RawAsset>> {
        let url = format!("{}/coins/list", self.base_url);
        debug!("Requesting coin list from {}", url);

        let text = self.get_text(&url).await?;
        let entries: Vec<RawAsset> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse coin list from {url}"))?;

        debug!(count = entries.len(), "Fetched coin list");
        Ok(entries)
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self, ids, currencies),
        fields(ids = %ids.join(","), currencies = %currencies.join(","))
    )]
    async fn fetch_quotes(&self, ids: &[&str], currencies: &[&str]) -> Result<Quotes> {
        if ids.is_empty() || currencies.is_empty() {
            return Ok(Quotes::new());
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url,
            ids.join(","),
            currencies.join(",")
        );
        debug!("Requesting prices from {}", url);

        let text = self.get_text(&url).await?;
        let quotes: Quotes = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse price response for {}", ids.join(",")))?;
        Ok(quotes)
    }
}
