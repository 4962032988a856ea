use crate::config::{MarketDataEnvConfig, MarketDataMode};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::alpaca::AlpacaMarketDataService;
use crate::infrastructure::csv_market_data::CsvMarketDataService;
use crate::infrastructure::mock::MockMarketDataService;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data(config: &MarketDataEnvConfig) -> Result<Arc<dyn MarketDataService>> {
        let service: Arc<dyn MarketDataService> = match config.mode {
            MarketDataMode::Mock => {
                info!("Using Mock market data (demo tickers)");
                Arc::new(MockMarketDataService::demo())
            }
            MarketDataMode::Alpaca => {
                info!("Using Alpaca market data ({})", config.alpaca_data_url);
                Arc::new(AlpacaMarketDataService::new(config)?)
            }
            MarketDataMode::Csv => {
                info!("Using CSV market data from {:?}", config.csv_dir);
                Arc::new(CsvMarketDataService::new(config.csv_dir.clone()))
            }
        };
        Ok(service)
    }
}
