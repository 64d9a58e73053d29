//! Conversion failure taxonomy

use thiserror::Error;

/// Message shown to the user for any conversion failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Could not fetch the exchange rate. Please check your input and try again.";

/// Typed failure of a single conversion request.
///
/// All variants are recoverable by retrying. `InvalidInput` is raised before
/// any network access.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("price provider unreachable: {reason}")]
    ProviderUnreachable { reason: String },

    #[error("no rate available for {asset} in {currency}")]
    RateUnavailable { asset: String, currency: String },
}

impl ConversionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        ConversionError::ProviderUnreachable {
            reason: reason.into(),
        }
    }

    pub fn rate_unavailable(asset: &str, currency: &str) -> Self {
        ConversionError::RateUnavailable {
            asset: asset.to_string(),
            currency: currency.to_string(),
        }
    }

    /// The advisory text for end users. Identical for every variant.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}
