//! Price quote abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// `asset_id -> { currency_code -> price }`. A `null` price decodes to `None`.
pub type Quotes = HashMap<String, HashMap<String, Option<f64>>>;

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches the price of every asset in `ids` in every currency in
    /// `currencies` with a single request. Pairs the provider does not quote
    /// are simply absent from the result.
    async fn fetch_quotes(&self, ids: &[&str], currencies: &[&str]) -> Result<Quotes>;
}

/// Looks up a positive, finite price for `id` in `currency`.
pub fn lookup(quotes: &Quotes, id: &str, currency: &str) -> Option<f64> {
    quotes
        .get(id)
        .and_then(|prices| prices.get(currency))
        .copied()
        .flatten()
        .filter(|price| price.is_finite() && *price > 0.0)
}
