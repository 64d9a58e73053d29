//! Asset catalog and local search

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maximum number of results returned by [`AssetDirectory::search`].
pub const SEARCH_LIMIT: usize = 12;

/// Fiat codes known when the configuration does not override them.
pub const DEFAULT_FIAT_CODES: [&str; 7] = ["usd", "eur", "uzs", "rub", "gbp", "try", "kzt"];

/// A priceable catalog entry. `id` is the only key sent to price providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Catalog record as received from the wire; any field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAsset {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<RawAsset>>;
}

/// In-memory, unsorted catalog of assets plus the fixed fiat code set.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    assets: Vec<Asset>,
    fiat_codes: Vec<String>,
}

impl Default for AssetDirectory {
    fn default() -> Self {
        Self::with_fiat_codes(DEFAULT_FIAT_CODES)
    }
}

impl AssetDirectory {
    pub fn with_fiat_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fiat_codes: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_lowercase();
            if !code.is_empty() && !fiat_codes.contains(&code) {
                fiat_codes.push(code);
            }
        }
        AssetDirectory {
            assets: Vec::new(),
            fiat_codes,
        }
    }

    /// Replaces the catalog with `entries`, dropping records without a symbol or id.
    pub fn load<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = RawAsset>,
    {
        self.assets = entries
            .into_iter()
            .filter_map(|raw| {
                let symbol = raw.symbol.filter(|s| !s.trim().is_empty())?;
                let id = raw.id.filter(|s| !s.trim().is_empty())?;
                Some(Asset {
                    id,
                    symbol,
                    name: raw.name.unwrap_or_default(),
                })
            })
            .collect();
        debug!(count = self.assets.len(), "Loaded asset catalog");
    }

    /// Best-effort catalog fetch. A provider failure leaves the directory empty.
    pub async fn refresh(&mut self, provider: &dyn CatalogProvider) {
        match provider.fetch_catalog().await {
            Ok(entries) => self.load(entries),
            Err(e) => {
                warn!(error = %e, "Failed to load asset catalog; continuing without it");
                self.assets.clear();
            }
        }
    }

    /// Matches in catalog order, capped at [`SEARCH_LIMIT`].
    ///
    /// An asset matches when the upper-cased query prefixes its symbol or id,
    /// or occurs anywhere in its name. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Asset> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.assets
            .iter()
            .filter(|asset| {
                asset.symbol.to_uppercase().starts_with(&needle)
                    || asset.id.to_uppercase().starts_with(&needle)
                    || asset.name.to_uppercase().contains(&needle)
            })
            .take(SEARCH_LIMIT)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn contains_asset(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_fiat(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.fiat_codes.iter().any(|c| *c == code)
    }

    pub fn fiat_codes(&self) -> &[String] {
        &self.fiat_codes
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
