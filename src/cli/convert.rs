use crate::cli::ui::{self, StyleType};
use crate::core::{
    Action, AssetDirectory, ConversionResult, ConversionState, Effect, QuoteProvider,
    RateConverter, Session,
};
use anyhow::{Result, anyhow};
use tracing::error;

/// Drives one conversion through the session and returns its final state.
pub async fn convert<P: QuoteProvider>(
    directory: &AssetDirectory,
    converter: &RateConverter<P>,
    amount: &str,
    from: &str,
    to: &str,
) -> ConversionState {
    let session = [
        Action::SourceSelected(from.to_string()),
        Action::TargetSelected(to.to_string()),
        Action::AmountChanged(amount.to_string()),
    ]
    .into_iter()
    .fold(Session::default(), |session, action| session.reduce(action).0);

    let (session, effect) = session.reduce(Action::ConvertRequested);
    let session = match effect {
        Some(Effect::Convert { token, request }) => {
            let spinner = ui::new_spinner(&format!(
                "Fetching {} rate for {}",
                request.target_code.to_uppercase(),
                request.source_id
            ));
            let result = converter.convert(directory, &request).await;
            spinner.finish_and_clear();
            session
                .reduce(Action::ConversionFinished { token, result })
                .0
        }
        _ => session,
    };

    session.conversion().clone()
}

/// Renders `amount FROM = value TO`, naming catalog assets by symbol.
pub fn format_conversion(
    directory: &AssetDirectory,
    amount: &str,
    from: &str,
    result: &ConversionResult,
) -> String {
    let source = directory
        .get(from)
        .map(|asset| format!("{} ({})", asset.symbol.to_uppercase(), asset.id))
        .unwrap_or_else(|| from.to_uppercase());
    format!(
        "{} {} = {} {}",
        amount.trim(),
        source,
        ui::style_text(&ui::format_amount(result.value), StyleType::Value),
        result.target_code.to_uppercase()
    )
}

pub async fn run<P: QuoteProvider>(
    directory: &AssetDirectory,
    converter: &RateConverter<P>,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    match convert(directory, converter, amount, from, to).await {
        ConversionState::Succeeded(result) => {
            println!("{}", format_conversion(directory, amount, from, &result));
            Ok(())
        }
        ConversionState::Failed(e) => {
            error!(error = %e, "Conversion failed");
            eprintln!("{}", ui::style_text(e.user_message(), StyleType::Error));
            Err(e.into())
        }
        state => Err(anyhow!("Conversion did not complete: {state:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionError, Quotes, RawAsset};
    use async_trait::async_trait;

    struct FixedQuotes(&'static str);

    #[async_trait]
    impl QuoteProvider for FixedQuotes {
        async fn fetch_quotes(&self, _ids: &[&str], _currencies: &[&str]) -> anyhow::Result<Quotes> {
            Ok(serde_json::from_str(self.0)?)
        }
    }

    fn directory() -> AssetDirectory {
        let mut directory = AssetDirectory::default();
        directory.load(vec![RawAsset {
            id: Some("bitcoin".to_string()),
            symbol: Some("btc".to_string()),
            name: Some("Bitcoin".to_string()),
        }]);
        directory
    }

    #[tokio::test]
    async fn test_convert_succeeds() {
        let converter = RateConverter::new(FixedQuotes(r#"{"bitcoin": {"usd": 65000}}"#));
        let state = convert(&directory(), &converter, "2", "bitcoin", "USD").await;
        assert_eq!(
            state,
            ConversionState::Succeeded(ConversionResult {
                value: 130000.0,
                target_code: "usd".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_convert_reports_invalid_amount() {
        let converter = RateConverter::new(FixedQuotes(r#"{"bitcoin": {"usd": 65000}}"#));
        let state = convert(&directory(), &converter, "-1", "bitcoin", "usd").await;
        assert!(matches!(
            state,
            ConversionState::Failed(ConversionError::InvalidInput { .. })
        ));

        let result = run(&directory(), &converter, "-1", "bitcoin", "usd").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_format_conversion() {
        console::set_colors_enabled(false);
        let result = ConversionResult {
            value: 130000.0,
            target_code: "usd".to_string(),
        };
        assert_eq!(
            format_conversion(&directory(), "2", "bitcoin", &result),
            "2 BTC (bitcoin) = 130000.00 USD"
        );
        assert_eq!(
            format_conversion(&directory(), "100", "eur", &result),
            "100 EUR = 130000.00 USD"
        );
    }
}
