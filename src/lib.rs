pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::{AssetDirectory, RateConverter};
use crate::providers::CoinGeckoProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Search {
        query: String,
    },
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Fiats,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = CoinGeckoProvider::new(&config.providers.coingecko.base_url)
        .with_timeout(config.request_timeout());
    let mut directory = AssetDirectory::with_fiat_codes(&config.fiat_currencies);

    match command {
        AppCommand::Fiats => {
            cli::fiats::run(&directory, &config.reference_asset);
            Ok(())
        }
        AppCommand::Search { query } => {
            directory.refresh(&provider).await;
            cli::search::run(&directory, &query, config.search_debounce());
            Ok(())
        }
        AppCommand::Convert { amount, from, to } => {
            directory.refresh(&provider).await;
            let converter = RateConverter::new(provider)
                .with_reference_asset(&config.reference_asset)
                .with_timeout(config.request_timeout());
            cli::convert::run(&directory, &converter, &amount, &from, &to).await
        }
    }
}
