//! Amount conversion with direct and reference-asset bridged rates

use crate::core::asset::AssetDirectory;
use crate::core::error::ConversionError;
use crate::core::quote::{QuoteProvider, Quotes, lookup};
use std::time::Duration;
use tracing::{debug, instrument};

/// Reference asset used to bridge two fiat currencies.
pub const DEFAULT_REFERENCE_ASSET: &str = "bitcoin";

/// Upper bound on a single provider round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parses a user-entered amount. Accepts `,` as the decimal separator.
pub fn parse_amount(text: &str) -> Result<f64, ConversionError> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(ConversionError::invalid_input("amount is empty"));
    }
    let amount: f64 = normalized
        .parse()
        .map_err(|_| ConversionError::invalid_input(format!("'{text}' is not a number")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ConversionError::invalid_input(format!(
            "amount must be positive, got {text}"
        )));
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source_id: String,
    pub target_code: String,
    pub amount: f64,
}

impl ConversionRequest {
    /// Builds a request from raw user selections, failing fast on bad input.
    pub fn parse(
        source: Option<&str>,
        target: Option<&str>,
        amount_text: &str,
    ) -> Result<Self, ConversionError> {
        let request = ConversionRequest {
            source_id: source.unwrap_or_default().trim().to_string(),
            target_code: target.unwrap_or_default().trim().to_lowercase(),
            amount: parse_amount(amount_text)?,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.source_id.is_empty() {
            return Err(ConversionError::invalid_input("no source selected"));
        }
        if self.target_code.is_empty() {
            return Err(ConversionError::invalid_input("no target currency selected"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ConversionError::invalid_input(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub target_code: String,
}

/// Lifecycle of one conversion request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConversionState {
    #[default]
    Idle,
    Fetching,
    Succeeded(ConversionResult),
    Failed(ConversionError),
}

impl From<Result<ConversionResult, ConversionError>> for ConversionState {
    fn from(result: Result<ConversionResult, ConversionError>) -> Self {
        match result {
            Ok(r) => ConversionState::Succeeded(r),
            Err(e) => ConversionState::Failed(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Source is a catalog asset quoted straight in the target currency.
    Direct,
    /// Source is fiat; both legs are quoted against the reference asset.
    Bridged,
}

pub struct RateConverter<P: QuoteProvider> {
    provider: P,
    reference_asset: String,
    timeout: Duration,
}

impl<P: QuoteProvider> RateConverter<P> {
    pub fn new(provider: P) -> Self {
        RateConverter {
            provider,
            reference_asset: DEFAULT_REFERENCE_ASSET.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_reference_asset(mut self, reference_asset: &str) -> Self {
        self.reference_asset = reference_asset.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn reference_asset(&self) -> &str {
        &self.reference_asset
    }

    /// Converts `request.amount` of the source into the target currency.
    ///
    /// Makes at most one provider call. No retries.
    #[instrument(
        name = "Convert",
        skip(self, directory),
        fields(source = %request.source_id, target = %request.target_code)
    )]
    pub async fn convert(
        &self,
        directory: &AssetDirectory,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        request.validate()?;
        let route = classify(directory, &request.source_id)?;
        debug!(?route, "Fetching rate");

        // Provider currency keys are lowercase
        let target = request.target_code.to_lowercase();
        let rate = match route {
            Route::Direct => self.direct_rate(&request.source_id, &target).await?,
            Route::Bridged => self.bridged_rate(&request.source_id, &target).await?,
        };

        let value = request.amount * rate;
        debug!(rate, value, "Conversion succeeded");
        Ok(ConversionResult {
            value,
            target_code: target,
        })
    }

    async fn direct_rate(&self, id: &str, target: &str) -> Result<f64, ConversionError> {
        let quotes = self.quote(&[id], &[target]).await?;
        lookup(&quotes, id, target).ok_or_else(|| ConversionError::rate_unavailable(id, target))
    }

    async fn bridged_rate(&self, source: &str, target: &str) -> Result<f64, ConversionError> {
        let source = source.to_lowercase();
        if source == target {
            return Ok(1.0);
        }

        let reference = self.reference_asset.as_str();
        let quotes = self.quote(&[reference], &[source.as_str(), target]).await?;
        let in_source = lookup(&quotes, reference, &source)
            .ok_or_else(|| ConversionError::rate_unavailable(reference, &source))?;
        let in_target = lookup(&quotes, reference, target)
            .ok_or_else(|| ConversionError::rate_unavailable(reference, target))?;

        let rate = in_target / in_source;
        if !rate.is_finite() {
            return Err(ConversionError::rate_unavailable(&source, target));
        }
        Ok(rate)
    }

    async fn quote(&self, ids: &[&str], currencies: &[&str]) -> Result<Quotes, ConversionError> {
        match tokio::time::timeout(self.timeout, self.provider.fetch_quotes(ids, currencies)).await
        {
            Ok(Ok(quotes)) => Ok(quotes),
            Ok(Err(e)) => Err(ConversionError::unreachable(format!("{e:#}"))),
            Err(_) => Err(ConversionError::unreachable(format!(
                "no response within {:?}",
                self.timeout
            ))),
        }
    }
}

fn classify(directory: &AssetDirectory, source_id: &str) -> Result<Route, ConversionError> {
    if directory.contains_asset(source_id) {
        Ok(Route::Direct)
    } else if directory.is_fiat(source_id) {
        Ok(Route::Bridged)
    } else {
        Err(ConversionError::invalid_input(format!(
            "'{source_id}' is neither a known asset nor a supported fiat currency"
        )))
    }
}
