use super::common::{AlpacaBar, AlpacaBarResponse};
use crate::config::MarketDataEnvConfig;
use crate::domain::errors::InferenceError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ports::MarketDataService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Hard stop on pagination; 1Day bars over the configured lookback fit in one page.
/// Running out of pages with a token still pending fails the fetch.
const MAX_PAGES: usize = 20;

/// Daily stock bars from the Alpaca Data API.
///
/// Each call is a single attempt: transport errors and non-success statuses are reported
/// as `DataUnavailable` without retrying.
pub struct AlpacaMarketDataService {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    bars_url: Url,
    feed: String,
}

impl AlpacaMarketDataService {
    pub fn new(config: &MarketDataEnvConfig) -> Result<Self> {
        let base = Url::parse(&config.alpaca_data_url)
            .with_context(|| format!("Invalid ALPACA_DATA_URL {:?}", config.alpaca_data_url))?;
        let bars_url = base
            .join("/v2/stocks/bars")
            .context("Failed to build Alpaca bars URL")?;

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        if config.alpaca_api_key.is_empty() {
            warn!("AlpacaMarketDataService: ALPACA_API_KEY is empty, requests will be rejected");
        }

        Ok(Self {
            client,
            api_key: config.alpaca_api_key.clone(),
            api_secret: config.alpaca_secret_key.clone(),
            bars_url,
            feed: config.alpaca_feed.clone(),
        })
    }

    async fn fetch_page(
        &self,
        ticker: &str,
        start: &str,
        page_token: Option<&str>,
    ) -> Result<AlpacaBarResponse, InferenceError> {
        let mut query_params = vec![
            ("symbols", ticker),
            ("timeframe", "1Day"),
            ("start", start),
            ("adjustment", "raw"),
            ("feed", self.feed.as_str()),
            ("limit", "10000"),
        ];
        if let Some(token) = page_token {
            query_params.push(("page_token", token));
        }

        let response = self
            .client
            .get(self.bars_url.clone())
            .query(&query_params)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret)
            .send()
            .await
            .map_err(|e| {
                error!("AlpacaMarketDataService: request for {} failed: {}", ticker, e);
                InferenceError::data_unavailable(ticker, format!("provider unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "AlpacaMarketDataService: API error {} for {}: {}",
                status, ticker, error_text
            );
            return Err(InferenceError::data_unavailable(
                ticker,
                format!("provider returned {}", status),
            ));
        }

        response.json().await.map_err(|e| {
            InferenceError::data_unavailable(ticker, format!("malformed bars response: {}", e))
        })
    }
}

#[async_trait]
impl MarketDataService for AlpacaMarketDataService {
    async fn get_historical_bars(
        &self,
        ticker: &str,
        lookback: chrono::Duration,
    ) -> Result<BarSeries, InferenceError> {
        let start = (chrono::Utc::now() - lookback).to_rfc3339();
        let mut raw: Vec<AlpacaBar> = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self
                .fetch_page(ticker, &start, page_token.as_deref())
                .await?;

            if let Some(mut bars) = page.bars {
                if let Some(ticker_bars) = bars.remove(ticker) {
                    raw.extend(ticker_bars);
                }
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        // Pages run oldest first; a cut-off series would be missing the newest bars.
        if page_token.is_some() {
            return Err(InferenceError::data_unavailable(
                ticker,
                format!("more than {} pages of bars", MAX_PAGES),
            ));
        }

        if raw.is_empty() {
            return Err(InferenceError::data_unavailable(ticker, "no bars returned"));
        }

        let bars = raw
            .iter()
            .map(|b| {
                b.to_bar().ok_or_else(|| {
                    InferenceError::data_unavailable(
                        ticker,
                        format!("bad bar timestamp {:?}", b.timestamp),
                    )
                })
            })
            .collect::<Result<Vec<Bar>, _>>()?;

        debug!(
            "AlpacaMarketDataService: Fetched {} bars for {}",
            bars.len(),
            ticker
        );
        BarSeries::new(ticker, bars)
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}
